//! Instruction builders.
//!
//! Each builder takes fully resolved accounts and typed arguments and emits
//! a single instruction for the program. Account order comes from the
//! operation table; data is the discriminator followed by the Borsh args.

use chain_sol::{Instruction, Pubkey};
use log::debug;

use crate::accounts::{
    CloseDepositEscrowAccounts, CloseDepositRecordAccounts, CloseEscrowAccounts,
    CreateDepositAccounts, CreateDepositEscrowAccounts, CreateEscrowAccounts, OperationAccounts,
    PayOutFundsAccounts, ProcessDepositAccounts, ProcessFullRefundAccounts,
    ProcessPartialRefundAccounts, UpdateEscrowAccounts, VetoPayoutPhaseAccounts,
};
use crate::args::{
    CreateDepositArgs, CreateDepositEscrowArgs, CreateEscrowArgs, InstructionArgs,
    UpdateEscrowArgs, VetoPayoutPhaseArgs,
};
use crate::error::SdkError;

/// Build an instruction from any typed account set.
///
/// Fails if `args` belong to a different operation than `accounts`.
pub fn build_instruction<A: OperationAccounts>(
    program_id: &Pubkey,
    accounts: &A,
    args: &InstructionArgs,
) -> Result<Instruction, SdkError> {
    let operation = A::OPERATION;
    if args.operation() != operation {
        return Err(SdkError::InstructionBuild(format!(
            "{} args passed to {operation} builder",
            args.operation()
        )));
    }

    let mut data = operation.discriminator().to_vec();
    data.extend_from_slice(&args.encode()?);

    let accounts = accounts.to_account_metas();
    debug!(
        "built {operation} instruction: {} accounts, {} data bytes",
        accounts.len(),
        data.len()
    );

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

pub fn create_escrow_ix(
    program_id: &Pubkey,
    accounts: &CreateEscrowAccounts,
    args: CreateEscrowArgs,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::CreateEscrow(args))
}

pub fn update_escrow_ix(
    program_id: &Pubkey,
    accounts: &UpdateEscrowAccounts,
    args: UpdateEscrowArgs,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::UpdateEscrow(args))
}

pub fn close_escrow_ix(
    program_id: &Pubkey,
    accounts: &CloseEscrowAccounts,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::CloseEscrow)
}

pub fn create_deposit_escrow_ix(
    program_id: &Pubkey,
    accounts: &CreateDepositEscrowAccounts,
    args: CreateDepositEscrowArgs,
) -> Result<Instruction, SdkError> {
    build_instruction(
        program_id,
        accounts,
        &InstructionArgs::CreateDepositEscrow(args),
    )
}

pub fn close_deposit_escrow_ix(
    program_id: &Pubkey,
    accounts: &CloseDepositEscrowAccounts,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::CloseDepositEscrow)
}

pub fn create_deposit_ix(
    program_id: &Pubkey,
    accounts: &CreateDepositAccounts,
    args: CreateDepositArgs,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::CreateDeposit(args))
}

pub fn process_deposit_ix(
    program_id: &Pubkey,
    accounts: &ProcessDepositAccounts,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::ProcessDeposit)
}

pub fn process_full_refund_ix(
    program_id: &Pubkey,
    accounts: &ProcessFullRefundAccounts,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::ProcessFullRefund)
}

pub fn process_partial_refund_ix(
    program_id: &Pubkey,
    accounts: &ProcessPartialRefundAccounts,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::ProcessPartialRefund)
}

pub fn pay_out_funds_ix(
    program_id: &Pubkey,
    accounts: &PayOutFundsAccounts,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::PayOutFunds)
}

pub fn close_deposit_record_ix(
    program_id: &Pubkey,
    accounts: &CloseDepositRecordAccounts,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::CloseDepositRecord)
}

pub fn veto_payout_phase_ix(
    program_id: &Pubkey,
    accounts: &VetoPayoutPhaseAccounts,
    args: VetoPayoutPhaseArgs,
) -> Result<Instruction, SdkError> {
    build_instruction(program_id, accounts, &InstructionArgs::VetoPayoutPhase(args))
}
