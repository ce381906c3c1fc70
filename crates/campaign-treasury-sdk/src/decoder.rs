//! Decoding of confirmed transactions back into named operations.

use chain_sol::{deserialize_transaction, Pubkey, ResolvedInstruction, SolTransaction};
use log::{trace, warn};
use serde::Serialize;

use crate::accounts::OperationAccounts;
use crate::args::InstructionArgs;
use crate::constants::DISCRIMINATOR_LEN;
use crate::error::SdkError;
use crate::idl::Operation;

/// An account of a decoded instruction, labelled with its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedAccount {
    pub name: &'static str,
    pub pubkey: Pubkey,
    pub is_mut: bool,
    pub is_signer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedInstruction {
    pub operation: Operation,
    /// Position of the instruction inside its transaction.
    pub instruction_index: usize,
    /// Declared roles in order, each with the address that filled it.
    pub accounts: Vec<DecodedAccount>,
    pub args: InstructionArgs,
}

impl DecodedInstruction {
    /// Address that filled `role` (interface name, e.g. `depositEscrow`).
    pub fn account(&self, role: &str) -> Option<Pubkey> {
        self.accounts
            .iter()
            .find(|a| a.name == role)
            .map(|a| a.pubkey)
    }

    /// The accounts as the typed struct of this operation, `None` if `A`
    /// belongs to a different operation.
    pub fn typed_accounts<A: OperationAccounts>(&self) -> Option<A> {
        if A::OPERATION != self.operation {
            return None;
        }
        let keys: Vec<Pubkey> = self.accounts.iter().map(|a| a.pubkey).collect();
        A::from_keys(&keys)
    }
}

/// Decode one raw instruction already known to target the program.
///
/// Returns `None` when the data does not start with a known discriminator,
/// or when it does but the accounts or args do not fit that operation.
pub fn decode_instruction(instruction: &ResolvedInstruction<'_>) -> Option<DecodedInstruction> {
    let Some(operation) = Operation::from_instruction_data(instruction.data) else {
        trace!(
            "instruction {} has no known discriminator",
            instruction.index
        );
        return None;
    };

    let roles = operation.accounts();
    if instruction.accounts.len() < roles.len() {
        warn!(
            "instruction {} matches {operation} but has {} of {} accounts",
            instruction.index,
            instruction.accounts.len(),
            roles.len()
        );
        return None;
    }

    let args = match InstructionArgs::decode(operation, &instruction.data[DISCRIMINATOR_LEN..]) {
        Ok(args) => args,
        Err(e) => {
            warn!("instruction {} matches {operation} but {e}", instruction.index);
            return None;
        }
    };

    let accounts = roles
        .iter()
        .zip(&instruction.accounts)
        .map(|(role, pubkey)| DecodedAccount {
            name: role.name,
            pubkey: *pubkey,
            is_mut: role.is_mut,
            is_signer: role.is_signer,
        })
        .collect();

    Some(DecodedInstruction {
        operation,
        instruction_index: instruction.index,
        accounts,
        args,
    })
}

/// Every instruction in `tx` that targets `program_id` and decodes cleanly.
pub fn decode_instructions(
    program_id: &Pubkey,
    tx: &SolTransaction,
) -> Result<Vec<DecodedInstruction>, SdkError> {
    let raw = tx.instructions_for_program(program_id)?;
    trace!(
        "{} of {} instructions target {program_id}",
        raw.len(),
        tx.compiled_instructions.len()
    );
    Ok(raw.iter().filter_map(decode_instruction).collect())
}

/// The first instruction in `tx` that targets `program_id` and decodes.
///
/// `Ok(None)` means the transaction does not call this program in a way we
/// recognise. Errors are reserved for a transaction that is itself corrupt.
pub fn decode_transaction(
    program_id: &Pubkey,
    tx: &SolTransaction,
) -> Result<Option<DecodedInstruction>, SdkError> {
    Ok(decode_instructions(program_id, tx)?.into_iter().next())
}

/// [`decode_transaction`] over signed wire bytes.
pub fn decode_wire_transaction(
    program_id: &Pubkey,
    wire: &[u8],
) -> Result<Option<DecodedInstruction>, SdkError> {
    let parsed = deserialize_transaction(wire)?;
    decode_transaction(program_id, &parsed.message)
}
