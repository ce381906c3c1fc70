//! Static interface description of the CampaignTreasuryManager program.
//!
//! One [`OperationDescriptor`] per instruction: the Anchor discriminator, the
//! account roles in the exact order the program reads them, and the argument
//! list. Both the instruction builders and the decoder read from this table,
//! so it must change together with the deployed program.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::DISCRIMINATOR_LEN;
use crate::error::SdkError;

/// The twelve instructions the program exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    CloseDepositEscrow,
    CloseDepositRecord,
    CloseEscrow,
    CreateDeposit,
    CreateDepositEscrow,
    CreateEscrow,
    PayOutFunds,
    ProcessDeposit,
    ProcessFullRefund,
    ProcessPartialRefund,
    UpdateEscrow,
    VetoPayoutPhase,
}

/// One account slot of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRole {
    pub name: &'static str,
    pub is_mut: bool,
    pub is_signer: bool,
}

/// One instruction argument, with its interface type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArgField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub discriminator: [u8; DISCRIMINATOR_LEN],
    pub accounts: &'static [AccountRole],
    pub args: &'static [ArgField],
}

impl OperationDescriptor {
    pub fn role(&self, name: &str) -> Option<&'static AccountRole> {
        self.accounts.iter().find(|r| r.name == name)
    }

    pub fn role_position(&self, name: &str) -> Option<usize> {
        self.accounts.iter().position(|r| r.name == name)
    }
}

const fn ro(name: &'static str) -> AccountRole {
    AccountRole { name, is_mut: false, is_signer: false }
}

const fn w(name: &'static str) -> AccountRole {
    AccountRole { name, is_mut: true, is_signer: false }
}

const fn s(name: &'static str) -> AccountRole {
    AccountRole { name, is_mut: false, is_signer: true }
}

const fn ws(name: &'static str) -> AccountRole {
    AccountRole { name, is_mut: true, is_signer: true }
}

const fn arg(name: &'static str, ty: &'static str) -> ArgField {
    ArgField { name, ty }
}

const PROCESS_ACCOUNTS: &[AccountRole] = &[w("campaignEscrow"), ro("treasuryEscrow"), ws("payer")];

/// Indexed by `Operation as usize`.
pub static OPERATIONS: [OperationDescriptor; 12] = [
    OperationDescriptor {
        operation: Operation::CloseDepositEscrow,
        discriminator: [57, 170, 9, 76, 192, 63, 249, 52],
        accounts: &[
            ro("campaignEscrow"),
            w("depositEscrow"),
            ro("depositEscrowMint"),
            w("receiver"),
            s("authority"),
            ro("tokenProgram"),
            ro("systemProgram"),
        ],
        args: &[],
    },
    OperationDescriptor {
        operation: Operation::CloseDepositRecord,
        discriminator: [53, 13, 94, 74, 42, 162, 97, 224],
        accounts: PROCESS_ACCOUNTS,
        args: &[],
    },
    OperationDescriptor {
        operation: Operation::CloseEscrow,
        discriminator: [139, 171, 94, 146, 191, 91, 144, 50],
        accounts: &[
            w("campaignEscrow"),
            w("treasuryEscrow"),
            w("receiver"),
            ws("payer"),
            s("authority"),
            ro("creator"),
            ro("tokenProgram"),
            ro("systemProgram"),
        ],
        args: &[],
    },
    OperationDescriptor {
        operation: Operation::CreateDeposit,
        discriminator: [157, 30, 11, 129, 16, 166, 115, 75],
        accounts: &[
            w("campaignEscrow"),
            w("depositRecord"),
            w("depositEscrow"),
            ro("depositEscrowMint"),
            ws("depositor"),
            w("depositorPaymentAccount"),
            ro("mint"),
            ro("systemProgram"),
            ro("tokenProgram"),
            ro("instructionSysvarAccount"),
        ],
        args: &[arg("depositAmount", "u64")],
    },
    OperationDescriptor {
        operation: Operation::CreateDepositEscrow,
        discriminator: [125, 40, 234, 220, 61, 65, 140, 33],
        accounts: &[
            w("campaignEscrow"),
            s("authority"),
            w("depositEscrow"),
            ro("depositEscrowMint"),
            ro("systemProgram"),
            ro("tokenProgram"),
            ro("rent"),
        ],
        args: &[arg("depositEscrowBump", "u8")],
    },
    OperationDescriptor {
        operation: Operation::CreateEscrow,
        discriminator: [253, 215, 165, 116, 36, 108, 68, 80],
        accounts: &[
            w("campaignEscrow"),
            ws("payer"),
            ro("authority"),
            ro("creator"),
            ro("treasuryMint"),
            w("treasuryEscrow"),
            w("payoutWallet"),
            ro("payoutWalletOwner"),
            ro("tokenProgram"),
            ro("ataProgram"),
            ro("systemProgram"),
            ro("rent"),
        ],
        args: &[
            arg("campaignUuid", "string"),
            arg("treasuryBump", "u8"),
            arg("campaignEscrowInput", "CreateCampaignEscrowInput"),
        ],
    },
    OperationDescriptor {
        operation: Operation::PayOutFunds,
        discriminator: [196, 117, 248, 242, 91, 146, 209, 95],
        accounts: &[
            w("campaignEscrow"),
            w("treasuryEscrow"),
            ws("payer"),
            w("payoutWallet"),
            ro("tokenProgram"),
            ro("systemProgram"),
        ],
        args: &[],
    },
    OperationDescriptor {
        operation: Operation::ProcessDeposit,
        discriminator: [136, 162, 64, 35, 84, 200, 254, 136],
        accounts: PROCESS_ACCOUNTS,
        args: &[],
    },
    OperationDescriptor {
        operation: Operation::ProcessFullRefund,
        discriminator: [107, 134, 116, 139, 199, 55, 170, 41],
        accounts: PROCESS_ACCOUNTS,
        args: &[],
    },
    OperationDescriptor {
        operation: Operation::ProcessPartialRefund,
        discriminator: [91, 2, 45, 239, 179, 132, 197, 213],
        accounts: PROCESS_ACCOUNTS,
        args: &[],
    },
    OperationDescriptor {
        operation: Operation::UpdateEscrow,
        discriminator: [252, 228, 127, 1, 60, 43, 54, 28],
        accounts: &[
            w("campaignEscrow"),
            ws("payer"),
            s("authority"),
            ro("creator"),
            ro("treasuryMint"),
            w("treasuryEscrow"),
            w("payoutWallet"),
            ro("payoutWalletOwner"),
            ro("tokenProgram"),
            ro("ataProgram"),
            ro("systemProgram"),
            ro("rent"),
        ],
        args: &[
            arg("campaignUuid", "string"),
            arg("treasuryBump", "u8"),
            arg("campaignEscrowInput", "UpdateCampaignEscrowInput"),
        ],
    },
    OperationDescriptor {
        operation: Operation::VetoPayoutPhase,
        discriminator: [182, 231, 117, 218, 111, 51, 97, 160],
        accounts: &[w("campaignEscrow"), ws("payer"), s("authority")],
        args: &[arg("payoutPhaseIndex", "u8")],
    },
];

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::CloseDepositEscrow,
        Operation::CloseDepositRecord,
        Operation::CloseEscrow,
        Operation::CreateDeposit,
        Operation::CreateDepositEscrow,
        Operation::CreateEscrow,
        Operation::PayOutFunds,
        Operation::ProcessDeposit,
        Operation::ProcessFullRefund,
        Operation::ProcessPartialRefund,
        Operation::UpdateEscrow,
        Operation::VetoPayoutPhase,
    ];

    /// Interface (camelCase) name, e.g. `createDeposit`.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CloseDepositEscrow => "closeDepositEscrow",
            Operation::CloseDepositRecord => "closeDepositRecord",
            Operation::CloseEscrow => "closeEscrow",
            Operation::CreateDeposit => "createDeposit",
            Operation::CreateDepositEscrow => "createDepositEscrow",
            Operation::CreateEscrow => "createEscrow",
            Operation::PayOutFunds => "payOutFunds",
            Operation::ProcessDeposit => "processDeposit",
            Operation::ProcessFullRefund => "processFullRefund",
            Operation::ProcessPartialRefund => "processPartialRefund",
            Operation::UpdateEscrow => "updateEscrow",
            Operation::VetoPayoutPhase => "vetoPayoutPhase",
        }
    }

    /// Program-side (snake_case) name, the input to the discriminator hash.
    pub fn snake_name(&self) -> &'static str {
        match self {
            Operation::CloseDepositEscrow => "close_deposit_escrow",
            Operation::CloseDepositRecord => "close_deposit_record",
            Operation::CloseEscrow => "close_escrow",
            Operation::CreateDeposit => "create_deposit",
            Operation::CreateDepositEscrow => "create_deposit_escrow",
            Operation::CreateEscrow => "create_escrow",
            Operation::PayOutFunds => "pay_out_funds",
            Operation::ProcessDeposit => "process_deposit",
            Operation::ProcessFullRefund => "process_full_refund",
            Operation::ProcessPartialRefund => "process_partial_refund",
            Operation::UpdateEscrow => "update_escrow",
            Operation::VetoPayoutPhase => "veto_payout_phase",
        }
    }

    pub fn descriptor(&self) -> &'static OperationDescriptor {
        &OPERATIONS[*self as usize]
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        self.descriptor().discriminator
    }

    pub fn accounts(&self) -> &'static [AccountRole] {
        self.descriptor().accounts
    }

    /// Match instruction data against every discriminator in the table.
    pub fn from_instruction_data(data: &[u8]) -> Option<Operation> {
        let prefix = data.get(..DISCRIMINATOR_LEN)?;
        OPERATIONS
            .iter()
            .find(|d| d.discriminator == prefix)
            .map(|d| d.operation)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = SdkError;

    /// Accepts either the interface or the program-side name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s || op.snake_name() == s)
            .ok_or_else(|| SdkError::InstructionBuild(format!("unknown operation: {s}")))
    }
}

/// `sha256("global:<name>")[..8]`
pub fn instruction_discriminator(snake_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_hash("global", snake_name)
}

/// `sha256("account:<TypeName>")[..8]`
pub fn account_discriminator(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_hash("account", type_name)
}

fn namespaced_hash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::new()
        .chain_update(namespace.as_bytes())
        .chain_update(b":")
        .chain_update(name.as_bytes())
        .finalize();
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}
