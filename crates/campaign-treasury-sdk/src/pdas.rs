//! Program derived addresses owned by the CampaignTreasuryManager program.
//!
//! Seed layouts:
//!
//! ```text
//! campaign escrow  ["campaign_escrow", uuid_seed]
//! treasury escrow  ["campaign_treasury_manager", uuid_seed, "treasury_escrow"]
//! deposit escrow   ["deposit_escrow", uuid_seed, mint]
//! deposit record   ["deposit_record", depositor, mint]
//! ```
//!
//! `uuid_seed` is the campaign UUID with its dashes removed, taken as UTF-8.

use chain_sol::{find_program_address, Pubkey};
use serde::Serialize;

use crate::constants::{
    CAMPAIGN_ESCROW_PREFIX, DEPOSIT_ESCROW_PREFIX, DEPOSIT_RECORD_PREFIX, PROGRAM_PREFIX,
    TREASURY_PREFIX,
};
use crate::error::SdkError;

/// Length of a campaign seed: a UUID without dashes.
pub const CAMPAIGN_SEED_LEN: usize = 32;

/// A derived address and the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PdaResult {
    pub address: Pubkey,
    pub bump: u8,
}

/// Convert a campaign UUID into the seed string the program expects.
///
/// Dashes are stripped; what remains must be exactly 32 hex digits.
pub fn campaign_uuid_to_seed(campaign_uuid: &str) -> Result<String, SdkError> {
    let seed: String = campaign_uuid.chars().filter(|c| *c != '-').collect();

    if seed.len() != CAMPAIGN_SEED_LEN {
        return Err(SdkError::InvalidCampaignUuid(format!(
            "{campaign_uuid:?} has {} hex digits, expected {CAMPAIGN_SEED_LEN}",
            seed.len()
        )));
    }
    if !seed.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SdkError::InvalidCampaignUuid(format!(
            "{campaign_uuid:?} contains non-hex characters"
        )));
    }

    Ok(seed)
}

fn find(seeds: &[&[u8]], program_id: &Pubkey) -> Result<PdaResult, SdkError> {
    let (address, bump) = find_program_address(seeds, program_id)?;
    Ok(PdaResult { address, bump })
}

pub fn find_campaign_escrow_pda(
    campaign_uuid: &str,
    program_id: &Pubkey,
) -> Result<PdaResult, SdkError> {
    let seed = campaign_uuid_to_seed(campaign_uuid)?;
    find(&[CAMPAIGN_ESCROW_PREFIX.as_bytes(), seed.as_bytes()], program_id)
}

pub fn find_treasury_escrow_pda(
    campaign_uuid: &str,
    program_id: &Pubkey,
) -> Result<PdaResult, SdkError> {
    let seed = campaign_uuid_to_seed(campaign_uuid)?;
    find(
        &[
            PROGRAM_PREFIX.as_bytes(),
            seed.as_bytes(),
            TREASURY_PREFIX.as_bytes(),
        ],
        program_id,
    )
}

/// The side-pocket escrow holding deposits made in `deposit_escrow_mint`.
pub fn find_deposit_escrow_pda(
    campaign_uuid: &str,
    deposit_escrow_mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<PdaResult, SdkError> {
    let seed = campaign_uuid_to_seed(campaign_uuid)?;
    find(
        &[
            DEPOSIT_ESCROW_PREFIX.as_bytes(),
            seed.as_bytes(),
            deposit_escrow_mint.as_ref(),
        ],
        program_id,
    )
}

/// Per depositor and asset. Not scoped to a campaign.
pub fn find_deposit_record_pda(
    depositor: &Pubkey,
    mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<PdaResult, SdkError> {
    find(
        &[DEPOSIT_RECORD_PREFIX.as_bytes(), depositor.as_ref(), mint.as_ref()],
        program_id,
    )
}
