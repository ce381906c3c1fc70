//! Account resolution.
//!
//! Turns caller inputs (campaign UUID, wallets, mints) into the complete
//! account set of an operation. Operations whose accounts depend on escrow
//! state read it through the [`AccountReader`] on every call; nothing is
//! cached between calls.

use chain_sol::{
    derive_associated_token_address, is_native_mint, AccountReader, Pubkey,
    ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, SYSVAR_INSTRUCTIONS_ID, SYSVAR_RENT_ID,
    TOKEN_PROGRAM_ID,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::accounts::{
    CloseDepositEscrowAccounts, CloseDepositRecordAccounts, CloseEscrowAccounts,
    CreateDepositAccounts, CreateDepositEscrowAccounts, CreateEscrowAccounts,
    PayOutFundsAccounts, ProcessDepositAccounts, ProcessFullRefundAccounts,
    ProcessPartialRefundAccounts, UpdateEscrowAccounts, VetoPayoutPhaseAccounts,
};
use crate::args::{
    CreateCampaignEscrowInput, CreateDepositArgs, CreateDepositEscrowArgs, CreateEscrowArgs,
    UpdateCampaignEscrowInput, UpdateEscrowArgs, VetoPayoutPhaseArgs,
};
use crate::error::SdkError;
use crate::pdas::{
    campaign_uuid_to_seed, find_campaign_escrow_pda, find_deposit_escrow_pda,
    find_deposit_record_pda, find_treasury_escrow_pda,
};
use crate::state::{fetch_account, CampaignEscrow};

/// Wallets supplied when creating or updating an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowParticipants {
    pub authority: Pubkey,
    pub creator: Pubkey,
    pub payer: Pubkey,
    pub payout_wallet_owner: Pubkey,
    pub treasury_mint: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseEscrowParticipants {
    pub authority: Pubkey,
    pub creator: Pubkey,
    pub payer: Pubkey,
    pub receiver: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseDepositEscrowParticipants {
    pub authority: Pubkey,
    pub deposit_escrow_mint: Pubkey,
    pub receiver: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VetoParticipants {
    pub authority: Pubkey,
    pub payer: Pubkey,
}

/// A deposit of `mint` (the item being bought) paid in `sale_currency_mint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositParticipants {
    pub depositor: Pubkey,
    pub mint: Pubkey,
    pub sale_currency_mint: Pubkey,
}

/// The account that holds `owner`'s balance of `mint`: the owner itself for
/// the native asset, its associated token account otherwise.
pub fn resolve_token_holder(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey, SdkError> {
    if is_native_mint(mint) {
        return Ok(*owner);
    }
    Ok(derive_associated_token_address(owner, mint)?)
}

/// Where deposits in `sale_currency_mint` are held: the treasury escrow when
/// the currency is the treasury mint, the per-currency deposit escrow
/// otherwise.
pub fn resolve_deposit_destination(
    escrow: &CampaignEscrow,
    campaign_uuid: &str,
    sale_currency_mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<Pubkey, SdkError> {
    if escrow.is_treasury_mint(sale_currency_mint) {
        debug!("deposit currency {sale_currency_mint} is the treasury mint");
        return Ok(escrow.treasury.treasury_escrow);
    }

    let pda = find_deposit_escrow_pda(campaign_uuid, sale_currency_mint, program_id)?;
    debug!(
        "deposit currency {sale_currency_mint} differs from treasury mint {}, using deposit escrow {}",
        escrow.treasury.treasury_mint, pda.address
    );
    Ok(pda.address)
}

/// Read the campaign escrow for `campaign_uuid`.
pub fn fetch_campaign_escrow<R: AccountReader>(
    reader: &R,
    campaign_uuid: &str,
    program_id: &Pubkey,
) -> Result<(Pubkey, CampaignEscrow), SdkError> {
    let address = find_campaign_escrow_pda(campaign_uuid, program_id)?.address;
    let escrow = fetch_account::<CampaignEscrow, _>(reader, &address)?;
    Ok((address, escrow))
}

/// Accounts and args for a new escrow. The payout wallet is the owner
/// itself for a native treasury, its associated token account otherwise.
pub fn resolve_create_escrow(
    program_id: &Pubkey,
    participants: &EscrowParticipants,
    campaign_uuid: &str,
    input: CreateCampaignEscrowInput,
) -> Result<(CreateEscrowAccounts, CreateEscrowArgs), SdkError> {
    let campaign_escrow = find_campaign_escrow_pda(campaign_uuid, program_id)?;
    let treasury_escrow = find_treasury_escrow_pda(campaign_uuid, program_id)?;
    let payout_wallet =
        resolve_token_holder(&participants.payout_wallet_owner, &participants.treasury_mint)?;

    let accounts = CreateEscrowAccounts {
        campaign_escrow: campaign_escrow.address,
        payer: participants.payer,
        authority: participants.authority,
        creator: participants.creator,
        treasury_mint: participants.treasury_mint,
        treasury_escrow: treasury_escrow.address,
        payout_wallet,
        payout_wallet_owner: participants.payout_wallet_owner,
        token_program: TOKEN_PROGRAM_ID,
        ata_program: ASSOCIATED_TOKEN_PROGRAM_ID,
        system_program: SYSTEM_PROGRAM_ID,
        rent: SYSVAR_RENT_ID,
    };
    let args = CreateEscrowArgs {
        campaign_uuid: campaign_uuid_to_seed(campaign_uuid)?,
        treasury_bump: treasury_escrow.bump,
        campaign_escrow_input: input,
    };
    Ok((accounts, args))
}

/// Same account set as creation; the payout wallet is re-resolved from
/// `payout_wallet_owner` and `treasury_mint`.
pub fn resolve_update_escrow(
    program_id: &Pubkey,
    participants: &EscrowParticipants,
    campaign_uuid: &str,
    input: UpdateCampaignEscrowInput,
) -> Result<(UpdateEscrowAccounts, UpdateEscrowArgs), SdkError> {
    let campaign_escrow = find_campaign_escrow_pda(campaign_uuid, program_id)?;
    let treasury_escrow = find_treasury_escrow_pda(campaign_uuid, program_id)?;
    let payout_wallet =
        resolve_token_holder(&participants.payout_wallet_owner, &participants.treasury_mint)?;

    let accounts = UpdateEscrowAccounts {
        campaign_escrow: campaign_escrow.address,
        payer: participants.payer,
        authority: participants.authority,
        creator: participants.creator,
        treasury_mint: participants.treasury_mint,
        treasury_escrow: treasury_escrow.address,
        payout_wallet,
        payout_wallet_owner: participants.payout_wallet_owner,
        token_program: TOKEN_PROGRAM_ID,
        ata_program: ASSOCIATED_TOKEN_PROGRAM_ID,
        system_program: SYSTEM_PROGRAM_ID,
        rent: SYSVAR_RENT_ID,
    };
    let args = UpdateEscrowArgs {
        campaign_uuid: campaign_uuid_to_seed(campaign_uuid)?,
        treasury_bump: treasury_escrow.bump,
        campaign_escrow_input: input,
    };
    Ok((accounts, args))
}

/// Derived escrow and treasury plus the caller's wallets. No state read.
pub fn resolve_close_escrow(
    program_id: &Pubkey,
    participants: &CloseEscrowParticipants,
    campaign_uuid: &str,
) -> Result<CloseEscrowAccounts, SdkError> {
    Ok(CloseEscrowAccounts {
        campaign_escrow: find_campaign_escrow_pda(campaign_uuid, program_id)?.address,
        treasury_escrow: find_treasury_escrow_pda(campaign_uuid, program_id)?.address,
        receiver: participants.receiver,
        payer: participants.payer,
        authority: participants.authority,
        creator: participants.creator,
        token_program: TOKEN_PROGRAM_ID,
        system_program: SYSTEM_PROGRAM_ID,
    })
}

/// Reads the escrow for its current authority.
///
/// The escrow is re-read on every call, including for a mint that already
/// has a deposit escrow; whether a repeat is accepted is up to the program.
pub fn resolve_create_deposit_escrow<R: AccountReader>(
    reader: &R,
    program_id: &Pubkey,
    deposit_escrow_mint: &Pubkey,
    campaign_uuid: &str,
) -> Result<(CreateDepositEscrowAccounts, CreateDepositEscrowArgs), SdkError> {
    let (campaign_escrow, escrow) = fetch_campaign_escrow(reader, campaign_uuid, program_id)?;
    let deposit_escrow = find_deposit_escrow_pda(campaign_uuid, deposit_escrow_mint, program_id)?;

    if let Some(info) = escrow.deposit_escrow_info(deposit_escrow_mint) {
        debug!(
            "campaign {campaign_uuid} already lists a deposit escrow for {deposit_escrow_mint} (closed: {})",
            info.closed
        );
    }

    let accounts = CreateDepositEscrowAccounts {
        campaign_escrow,
        authority: escrow.authority,
        deposit_escrow: deposit_escrow.address,
        deposit_escrow_mint: *deposit_escrow_mint,
        system_program: SYSTEM_PROGRAM_ID,
        token_program: TOKEN_PROGRAM_ID,
        rent: SYSVAR_RENT_ID,
    };
    let args = CreateDepositEscrowArgs {
        deposit_escrow_bump: deposit_escrow.bump,
    };
    Ok((accounts, args))
}

/// The deposit escrow is derived from `deposit_escrow_mint`. No state read.
pub fn resolve_close_deposit_escrow(
    program_id: &Pubkey,
    participants: &CloseDepositEscrowParticipants,
    campaign_uuid: &str,
) -> Result<CloseDepositEscrowAccounts, SdkError> {
    let mint = participants.deposit_escrow_mint;
    Ok(CloseDepositEscrowAccounts {
        campaign_escrow: find_campaign_escrow_pda(campaign_uuid, program_id)?.address,
        deposit_escrow: find_deposit_escrow_pda(campaign_uuid, &mint, program_id)?.address,
        deposit_escrow_mint: mint,
        receiver: participants.receiver,
        authority: participants.authority,
        token_program: TOKEN_PROGRAM_ID,
        system_program: SYSTEM_PROGRAM_ID,
    })
}

/// Reads the escrow to pick the deposit destination: the treasury escrow
/// when the sale currency is the treasury mint, the deposit escrow for that
/// currency otherwise. The depositor pays from its own address for the
/// native mint and from its associated token account for any other.
pub fn resolve_create_deposit<R: AccountReader>(
    reader: &R,
    program_id: &Pubkey,
    participants: &DepositParticipants,
    campaign_uuid: &str,
    deposit_amount: u64,
) -> Result<(CreateDepositAccounts, CreateDepositArgs), SdkError> {
    let (campaign_escrow, escrow) = fetch_campaign_escrow(reader, campaign_uuid, program_id)?;
    let currency = participants.sale_currency_mint;

    let deposit_escrow =
        resolve_deposit_destination(&escrow, campaign_uuid, &currency, program_id)?;
    let deposit_record =
        find_deposit_record_pda(&participants.depositor, &participants.mint, program_id)?;
    let depositor_payment_account = resolve_token_holder(&participants.depositor, &currency)?;

    let accounts = CreateDepositAccounts {
        campaign_escrow,
        deposit_record: deposit_record.address,
        deposit_escrow,
        deposit_escrow_mint: currency,
        depositor: participants.depositor,
        depositor_payment_account,
        mint: participants.mint,
        system_program: SYSTEM_PROGRAM_ID,
        token_program: TOKEN_PROGRAM_ID,
        instruction_sysvar_account: SYSVAR_INSTRUCTIONS_ID,
    };
    Ok((accounts, CreateDepositArgs { deposit_amount }))
}

fn campaign_and_treasury(
    program_id: &Pubkey,
    campaign_uuid: &str,
) -> Result<(Pubkey, Pubkey), SdkError> {
    Ok((
        find_campaign_escrow_pda(campaign_uuid, program_id)?.address,
        find_treasury_escrow_pda(campaign_uuid, program_id)?.address,
    ))
}

/// Escrow and treasury for settling a deposit.
pub fn resolve_process_deposit(
    program_id: &Pubkey,
    payer: &Pubkey,
    campaign_uuid: &str,
) -> Result<ProcessDepositAccounts, SdkError> {
    let (campaign_escrow, treasury_escrow) = campaign_and_treasury(program_id, campaign_uuid)?;
    Ok(ProcessDepositAccounts {
        campaign_escrow,
        treasury_escrow,
        payer: *payer,
    })
}

/// Escrow and treasury for a full refund.
pub fn resolve_process_full_refund(
    program_id: &Pubkey,
    payer: &Pubkey,
    campaign_uuid: &str,
) -> Result<ProcessFullRefundAccounts, SdkError> {
    let (campaign_escrow, treasury_escrow) = campaign_and_treasury(program_id, campaign_uuid)?;
    Ok(ProcessFullRefundAccounts {
        campaign_escrow,
        treasury_escrow,
        payer: *payer,
    })
}

/// Escrow and treasury for a partial refund.
pub fn resolve_process_partial_refund(
    program_id: &Pubkey,
    payer: &Pubkey,
    campaign_uuid: &str,
) -> Result<ProcessPartialRefundAccounts, SdkError> {
    let (campaign_escrow, treasury_escrow) = campaign_and_treasury(program_id, campaign_uuid)?;
    Ok(ProcessPartialRefundAccounts {
        campaign_escrow,
        treasury_escrow,
        payer: *payer,
    })
}

/// Escrow and treasury for closing a deposit record.
pub fn resolve_close_deposit_record(
    program_id: &Pubkey,
    payer: &Pubkey,
    campaign_uuid: &str,
) -> Result<CloseDepositRecordAccounts, SdkError> {
    let (campaign_escrow, treasury_escrow) = campaign_and_treasury(program_id, campaign_uuid)?;
    Ok(CloseDepositRecordAccounts {
        campaign_escrow,
        treasury_escrow,
        payer: *payer,
    })
}

/// Reads the payout wallet stored on the escrow instead of re-deriving it.
pub fn resolve_pay_out_funds<R: AccountReader>(
    reader: &R,
    program_id: &Pubkey,
    payer: &Pubkey,
    campaign_uuid: &str,
) -> Result<PayOutFundsAccounts, SdkError> {
    let (campaign_escrow, escrow) = fetch_campaign_escrow(reader, campaign_uuid, program_id)?;
    let treasury_escrow = find_treasury_escrow_pda(campaign_uuid, program_id)?.address;

    Ok(PayOutFundsAccounts {
        campaign_escrow,
        treasury_escrow,
        payer: *payer,
        payout_wallet: escrow.payout_wallet,
        token_program: TOKEN_PROGRAM_ID,
        system_program: SYSTEM_PROGRAM_ID,
    })
}

/// Escrow plus the vetoing authority.
pub fn resolve_veto_payout_phase(
    program_id: &Pubkey,
    participants: &VetoParticipants,
    campaign_uuid: &str,
    payout_phase_index: u8,
) -> Result<(VetoPayoutPhaseAccounts, VetoPayoutPhaseArgs), SdkError> {
    let accounts = VetoPayoutPhaseAccounts {
        campaign_escrow: find_campaign_escrow_pda(campaign_uuid, program_id)?.address,
        payer: participants.payer,
        authority: participants.authority,
    };
    Ok((accounts, VetoPayoutPhaseArgs { payout_phase_index }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID as PROGRAM_ID;
    use crate::state::tests::sample_escrow;
    use crate::state::ProgramAccount;
    use chain_sol::{MemoryAccountReader, NATIVE_MINT};

    const UUID: &str = "3f2b8c1e-9d4a-4e7b-a5c6-0f1e2d3c4b5a";

    fn key(b: u8) -> Pubkey {
        Pubkey::new_from_array([b; 32])
    }

    fn usdc() -> Pubkey {
        "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap()
    }

    fn reader_with(escrow: &CampaignEscrow) -> MemoryAccountReader {
        let address = find_campaign_escrow_pda(UUID, &PROGRAM_ID).unwrap().address;
        let mut reader = MemoryAccountReader::new();
        reader.set_account(address, escrow.to_account_data().unwrap());
        reader
    }

    fn deposit(sale_currency_mint: Pubkey) -> DepositParticipants {
        DepositParticipants {
            depositor: key(20),
            mint: key(21),
            sale_currency_mint,
        }
    }

    #[test]
    fn token_holder_native_is_owner() {
        let owner = key(7);
        assert_eq!(resolve_token_holder(&owner, &NATIVE_MINT).unwrap(), owner);
    }

    #[test]
    fn token_holder_spl_is_ata() {
        let owner = key(7);
        let holder = resolve_token_holder(&owner, &usdc()).unwrap();
        assert_eq!(holder, derive_associated_token_address(&owner, &usdc()).unwrap());
        assert_ne!(holder, owner);
    }

    #[test]
    fn deposit_in_treasury_currency_goes_to_treasury() {
        let escrow = sample_escrow();
        let reader = reader_with(&escrow);

        let (accounts, args) =
            resolve_create_deposit(&reader, &PROGRAM_ID, &deposit(NATIVE_MINT), UUID, 500).unwrap();

        assert_eq!(accounts.deposit_escrow, escrow.treasury.treasury_escrow);
        assert_eq!(accounts.depositor_payment_account, key(20));
        assert_eq!(accounts.deposit_escrow_mint, NATIVE_MINT);
        assert_eq!(args.deposit_amount, 500);
    }

    #[test]
    fn deposit_in_other_currency_goes_to_deposit_escrow() {
        let escrow = sample_escrow();
        let reader = reader_with(&escrow);

        let (accounts, _) =
            resolve_create_deposit(&reader, &PROGRAM_ID, &deposit(usdc()), UUID, 500).unwrap();

        let expected = find_deposit_escrow_pda(UUID, &usdc(), &PROGRAM_ID).unwrap().address;
        assert_eq!(accounts.deposit_escrow, expected);
        assert_eq!(
            accounts.depositor_payment_account,
            derive_associated_token_address(&key(20), &usdc()).unwrap()
        );
        assert_eq!(
            accounts.deposit_record,
            find_deposit_record_pda(&key(20), &key(21), &PROGRAM_ID).unwrap().address
        );
    }

    #[test]
    fn deposit_reads_latest_treasury_mint() {
        let mut escrow = sample_escrow();
        let mut reader = reader_with(&escrow);
        let first = resolve_create_deposit(&reader, &PROGRAM_ID, &deposit(usdc()), UUID, 1)
            .unwrap()
            .0;

        escrow.treasury.treasury_mint = usdc();
        reader = reader_with(&escrow);
        let second = resolve_create_deposit(&reader, &PROGRAM_ID, &deposit(usdc()), UUID, 1)
            .unwrap()
            .0;

        assert_ne!(first.deposit_escrow, second.deposit_escrow);
        assert_eq!(second.deposit_escrow, escrow.treasury.treasury_escrow);
    }

    #[test]
    fn deposit_before_escrow_exists_is_not_found() {
        let reader = MemoryAccountReader::new();
        let err = resolve_create_deposit(&reader, &PROGRAM_ID, &deposit(NATIVE_MINT), UUID, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::AccountNotFound { account: "CampaignEscrow", .. }
        ));
    }

    #[test]
    fn create_escrow_native_payout_wallet_is_owner() {
        let participants = EscrowParticipants {
            authority: key(1),
            creator: key(2),
            payer: key(3),
            payout_wallet_owner: key(4),
            treasury_mint: NATIVE_MINT,
        };
        let input = CreateCampaignEscrowInput {
            campaign_end_time: 0,
            non_voting_payout_phases: vec![],
            voting_payout_phases: vec![],
        };
        let (accounts, args) =
            resolve_create_escrow(&PROGRAM_ID, &participants, UUID, input).unwrap();

        let treasury = find_treasury_escrow_pda(UUID, &PROGRAM_ID).unwrap();
        assert_eq!(accounts.payout_wallet, key(4));
        assert_eq!(accounts.treasury_escrow, treasury.address);
        assert_eq!(args.treasury_bump, treasury.bump);
        assert_eq!(args.campaign_uuid, "3f2b8c1e9d4a4e7ba5c60f1e2d3c4b5a");
    }

    #[test]
    fn update_escrow_spl_payout_wallet_is_ata() {
        let participants = EscrowParticipants {
            authority: key(1),
            creator: key(2),
            payer: key(3),
            payout_wallet_owner: key(4),
            treasury_mint: usdc(),
        };
        let (accounts, _) = resolve_update_escrow(
            &PROGRAM_ID,
            &participants,
            UUID,
            UpdateCampaignEscrowInput::default(),
        )
        .unwrap();
        assert_eq!(
            accounts.payout_wallet,
            derive_associated_token_address(&key(4), &usdc()).unwrap()
        );
    }

    #[test]
    fn create_deposit_escrow_uses_stored_authority() {
        let escrow = sample_escrow();
        let reader = reader_with(&escrow);
        let (accounts, args) =
            resolve_create_deposit_escrow(&reader, &PROGRAM_ID, &usdc(), UUID).unwrap();

        let pda = find_deposit_escrow_pda(UUID, &usdc(), &PROGRAM_ID).unwrap();
        assert_eq!(accounts.authority, escrow.authority);
        assert_eq!(accounts.deposit_escrow, pda.address);
        assert_eq!(args.deposit_escrow_bump, pda.bump);
    }

    #[test]
    fn create_deposit_escrow_repeat_reads_state_again() {
        let mut escrow = sample_escrow();
        let reader = reader_with(&escrow);
        let first = resolve_create_deposit_escrow(&reader, &PROGRAM_ID, &usdc(), UUID).unwrap();

        escrow.authority = key(99);
        let reader = reader_with(&escrow);
        let second = resolve_create_deposit_escrow(&reader, &PROGRAM_ID, &usdc(), UUID).unwrap();

        assert_ne!(first.0.authority, second.0.authority);
        assert_eq!(second.0.authority, key(99));
    }

    #[test]
    fn pay_out_uses_stored_payout_wallet() {
        let escrow = sample_escrow();
        let reader = reader_with(&escrow);
        let accounts = resolve_pay_out_funds(&reader, &PROGRAM_ID, &key(8), UUID).unwrap();
        assert_eq!(accounts.payout_wallet, escrow.payout_wallet);
        assert_eq!(accounts.payer, key(8));
    }

    #[test]
    fn derived_only_operations_share_campaign_and_treasury() {
        let payer = key(8);
        let process = resolve_process_deposit(&PROGRAM_ID, &payer, UUID).unwrap();
        let full = resolve_process_full_refund(&PROGRAM_ID, &payer, UUID).unwrap();
        let partial = resolve_process_partial_refund(&PROGRAM_ID, &payer, UUID).unwrap();
        let close = resolve_close_deposit_record(&PROGRAM_ID, &payer, UUID).unwrap();

        assert_eq!(process.campaign_escrow, full.campaign_escrow);
        assert_eq!(full.treasury_escrow, partial.treasury_escrow);
        assert_eq!(partial.campaign_escrow, close.campaign_escrow);
    }

    #[test]
    fn invalid_uuid_is_rejected_before_reading() {
        let reader = MemoryAccountReader::new();
        let err = resolve_pay_out_funds(&reader, &PROGRAM_ID, &key(8), "bad").unwrap_err();
        assert!(matches!(err, SdkError::InvalidCampaignUuid(_)));
    }
}
