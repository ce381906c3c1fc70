//! Instruction argument types, Borsh encoded in declared order after the
//! discriminator.

use borsh::{BorshDeserialize, BorshSerialize};
use chain_sol::Pubkey;
use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::idl::Operation;
use crate::state::SharedPayoutPhaseFields;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonVotingPayoutPhaseInput {
    pub shared_fields: SharedPayoutPhaseFields,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingPayoutPhaseInput {
    pub shared_fields: SharedPayoutPhaseFields,
    pub voting_start_time: i64,
    pub veto_votes: u64,
    pub vote_basis_points_veto_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignEscrowInput {
    pub campaign_end_time: i64,
    pub non_voting_payout_phases: Vec<NonVotingPayoutPhaseInput>,
    pub voting_payout_phases: Vec<VotingPayoutPhaseInput>,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignEscrowInput {
    pub authority: Option<Pubkey>,
    pub creator: Option<Pubkey>,
    pub campaign_end_time: Option<i64>,
    pub non_voting_payout_phases: Option<Vec<NonVotingPayoutPhaseInput>>,
    pub voting_payout_phases: Option<Vec<VotingPayoutPhaseInput>>,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEscrowArgs {
    /// Dash-free campaign seed.
    pub campaign_uuid: String,
    pub treasury_bump: u8,
    pub campaign_escrow_input: CreateCampaignEscrowInput,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEscrowArgs {
    pub campaign_uuid: String,
    pub treasury_bump: u8,
    pub campaign_escrow_input: UpdateCampaignEscrowInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositEscrowArgs {
    pub deposit_escrow_bump: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositArgs {
    pub deposit_amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VetoPayoutPhaseArgs {
    pub payout_phase_index: u8,
}

/// Arguments of an instruction, tagged by operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", content = "args", rename_all = "camelCase")]
pub enum InstructionArgs {
    CloseDepositEscrow,
    CloseDepositRecord,
    CloseEscrow,
    CreateDeposit(CreateDepositArgs),
    CreateDepositEscrow(CreateDepositEscrowArgs),
    CreateEscrow(CreateEscrowArgs),
    PayOutFunds,
    ProcessDeposit,
    ProcessFullRefund,
    ProcessPartialRefund,
    UpdateEscrow(UpdateEscrowArgs),
    VetoPayoutPhase(VetoPayoutPhaseArgs),
}

impl InstructionArgs {
    pub fn operation(&self) -> Operation {
        match self {
            InstructionArgs::CloseDepositEscrow => Operation::CloseDepositEscrow,
            InstructionArgs::CloseDepositRecord => Operation::CloseDepositRecord,
            InstructionArgs::CloseEscrow => Operation::CloseEscrow,
            InstructionArgs::CreateDeposit(_) => Operation::CreateDeposit,
            InstructionArgs::CreateDepositEscrow(_) => Operation::CreateDepositEscrow,
            InstructionArgs::CreateEscrow(_) => Operation::CreateEscrow,
            InstructionArgs::PayOutFunds => Operation::PayOutFunds,
            InstructionArgs::ProcessDeposit => Operation::ProcessDeposit,
            InstructionArgs::ProcessFullRefund => Operation::ProcessFullRefund,
            InstructionArgs::ProcessPartialRefund => Operation::ProcessPartialRefund,
            InstructionArgs::UpdateEscrow(_) => Operation::UpdateEscrow,
            InstructionArgs::VetoPayoutPhase(_) => Operation::VetoPayoutPhase,
        }
    }

    /// Borsh-encoded argument bytes, without the discriminator.
    pub fn encode(&self) -> Result<Vec<u8>, SdkError> {
        let encoded = match self {
            InstructionArgs::CreateDeposit(a) => borsh::to_vec(a),
            InstructionArgs::CreateDepositEscrow(a) => borsh::to_vec(a),
            InstructionArgs::CreateEscrow(a) => borsh::to_vec(a),
            InstructionArgs::UpdateEscrow(a) => borsh::to_vec(a),
            InstructionArgs::VetoPayoutPhase(a) => borsh::to_vec(a),
            _ => Ok(Vec::new()),
        };
        encoded.map_err(|e| SdkError::InstructionBuild(format!("{}: {e}", self.operation())))
    }

    /// Decode argument bytes for `operation`. Every byte must be consumed.
    pub fn decode(operation: Operation, bytes: &[u8]) -> Result<Self, SdkError> {
        fn parse<T: BorshDeserialize>(op: Operation, bytes: &[u8]) -> Result<T, SdkError> {
            borsh::from_slice(bytes)
                .map_err(|e| SdkError::TransactionDecode(format!("{op} args: {e}")))
        }

        let no_args = |args: InstructionArgs| {
            if bytes.is_empty() {
                Ok(args)
            } else {
                Err(SdkError::TransactionDecode(format!(
                    "{operation} takes no args, found {} bytes",
                    bytes.len()
                )))
            }
        };

        match operation {
            Operation::CloseDepositEscrow => no_args(InstructionArgs::CloseDepositEscrow),
            Operation::CloseDepositRecord => no_args(InstructionArgs::CloseDepositRecord),
            Operation::CloseEscrow => no_args(InstructionArgs::CloseEscrow),
            Operation::PayOutFunds => no_args(InstructionArgs::PayOutFunds),
            Operation::ProcessDeposit => no_args(InstructionArgs::ProcessDeposit),
            Operation::ProcessFullRefund => no_args(InstructionArgs::ProcessFullRefund),
            Operation::ProcessPartialRefund => no_args(InstructionArgs::ProcessPartialRefund),
            Operation::CreateDeposit => parse(operation, bytes).map(InstructionArgs::CreateDeposit),
            Operation::CreateDepositEscrow => {
                parse(operation, bytes).map(InstructionArgs::CreateDepositEscrow)
            }
            Operation::CreateEscrow => parse(operation, bytes).map(InstructionArgs::CreateEscrow),
            Operation::UpdateEscrow => parse(operation, bytes).map(InstructionArgs::UpdateEscrow),
            Operation::VetoPayoutPhase => {
                parse(operation, bytes).map(InstructionArgs::VetoPayoutPhase)
            }
        }
    }
}
