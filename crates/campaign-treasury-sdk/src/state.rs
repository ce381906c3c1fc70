//! Account layouts owned by the program.
//!
//! Every account starts with an 8-byte Anchor discriminator followed by the
//! Borsh encoding of the struct. Accounts may be allocated larger than their
//! current contents, so trailing bytes after the struct are ignored.

use borsh::{BorshDeserialize, BorshSerialize};
use chain_sol::{AccountReader, Pubkey};
use serde::{Deserialize, Serialize};

use crate::constants::DISCRIMINATOR_LEN;
use crate::error::SdkError;

/// A program-owned account type with a known discriminator.
pub trait ProgramAccount: BorshSerialize + BorshDeserialize {
    const NAME: &'static str;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];

    fn try_from_account_data(data: &[u8]) -> Result<Self, SdkError> {
        let (prefix, mut body) = data
            .split_at_checked(DISCRIMINATOR_LEN)
            .ok_or_else(|| {
                SdkError::AccountDecode(format!(
                    "{}: {} bytes is shorter than the discriminator",
                    Self::NAME,
                    data.len()
                ))
            })?;

        if prefix != Self::DISCRIMINATOR {
            return Err(SdkError::AccountDecode(format!(
                "{}: discriminator mismatch",
                Self::NAME
            )));
        }

        Self::deserialize(&mut body)
            .map_err(|e| SdkError::AccountDecode(format!("{}: {e}", Self::NAME)))
    }

    fn to_account_data(&self) -> Result<Vec<u8>, SdkError> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)
            .map_err(|e| SdkError::AccountDecode(format!("{}: {e}", Self::NAME)))?;
        Ok(data)
    }
}

/// Read and decode an account, failing with
/// [`SdkError::AccountNotFound`] if it does not exist yet.
pub fn fetch_account<T: ProgramAccount, R: AccountReader>(
    reader: &R,
    address: &Pubkey,
) -> Result<T, SdkError> {
    let data = reader
        .get_account_data(address)?
        .ok_or(SdkError::AccountNotFound {
            account: T::NAME,
            address: *address,
        })?;
    T::try_from_account_data(&data)
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treasury {
    pub bump: u8,
    pub treasury_mint: Pubkey,
    pub treasury_escrow: Pubkey,
    pub total_funds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEscrowInfo {
    pub deposit_escrow_bump: u8,
    pub mint: Pubkey,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPayoutPhaseFields {
    /// Position in the combined payout schedule, starting at 0.
    pub index: u8,
    pub payout_basis_points: u16,
    pub payout_time: i64,
    pub refund_deadline: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonVotingPayoutPhase {
    pub shared_fields: SharedPayoutPhaseFields,
    pub is_paid_out: bool,
    pub is_vetoed_by_authority: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingPayoutPhase {
    pub shared_fields: SharedPayoutPhaseFields,
    pub is_paid_out: bool,
    pub is_vetoed_by_authority: bool,
    pub voting_start_time: i64,
    pub veto_votes: u64,
    pub vote_basis_points_veto_threshold: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutPhases {
    pub non_voting_payout_phases: Vec<NonVotingPayoutPhase>,
    pub voting_payout_phases: Vec<VotingPayoutPhase>,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEscrow {
    pub bump: u8,
    /// The transformed seed, not the dashed UUID.
    pub campaign_uuid: String,
    pub authority: Pubkey,
    pub creator: Pubkey,
    /// Resolved once at create/update time; later calls read it back.
    pub payout_wallet: Pubkey,
    pub treasury: Treasury,
    pub deposit_escrow_infos: Vec<DepositEscrowInfo>,
    pub campaign_end_time: i64,
    pub deposit_count: u64,
    pub processed_deposit_count: u64,
    pub closed_deposit_record_count: u64,
    pub payouts_ready: bool,
    pub payout_phases: PayoutPhases,
}

impl CampaignEscrow {
    pub fn deposit_escrow_info(&self, mint: &Pubkey) -> Option<&DepositEscrowInfo> {
        self.deposit_escrow_infos.iter().find(|info| info.mint == *mint)
    }

    /// Whether deposits in `mint` go straight to the treasury.
    pub fn is_treasury_mint(&self, mint: &Pubkey) -> bool {
        self.treasury.treasury_mint == *mint
    }
}

impl ProgramAccount for CampaignEscrow {
    const NAME: &'static str = "CampaignEscrow";
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [192, 220, 203, 27, 197, 195, 229, 70];
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub bump: u8,
    pub mint: Pubkey,
    pub depositor: Pubkey,
    pub deposit_escrow_mint: Pubkey,
    pub initial_deposit_amount: u64,
    pub processed_deposit_amount: u64,
    pub deposit_processed: bool,
}

impl ProgramAccount for DepositRecord {
    const NAME: &'static str = "DepositRecord";
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [83, 232, 10, 31, 251, 49, 189, 167];
}
