//! Custom error codes returned by the on-chain program.
//!
//! The program reports failures as `custom program error: 0x2329` style
//! codes. Codes start at 9000 so they never collide with Anchor's own
//! framework errors.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CampaignTreasuryManagerError {
    PublicKeyMismatch,
    IncorrectOwner,
    UninitializedAccount,
    MissingSigner,
    CreatorMismatch,
    AuthorityMismatch,
    InvalidPayoutPhases,
    InvalidUpdateEscrow,
    InvalidCloseEscrow,
    InvalidTreasuryEscrow,
    InvalidTreasuryEscrowUpdate,
    InvalidCampaignEndTime,
    InvalidDepositEscrowMint,
    InvalidDepositEscrowAccount,
    InvalidCpiInvocation,
    InvalidCreateDepositEscrowIx,
    InvalidPayoutRequest,
    DepositEscrowAccountNotEmpty,
}

/// Code of the first entry in the table.
pub const ERROR_CODE_OFFSET: u32 = 9000;

impl CampaignTreasuryManagerError {
    pub const ALL: [Self; 18] = [
        Self::PublicKeyMismatch,
        Self::IncorrectOwner,
        Self::UninitializedAccount,
        Self::MissingSigner,
        Self::CreatorMismatch,
        Self::AuthorityMismatch,
        Self::InvalidPayoutPhases,
        Self::InvalidUpdateEscrow,
        Self::InvalidCloseEscrow,
        Self::InvalidTreasuryEscrow,
        Self::InvalidTreasuryEscrowUpdate,
        Self::InvalidCampaignEndTime,
        Self::InvalidDepositEscrowMint,
        Self::InvalidDepositEscrowAccount,
        Self::InvalidCpiInvocation,
        Self::InvalidCreateDepositEscrowIx,
        Self::InvalidPayoutRequest,
        Self::DepositEscrowAccountNotEmpty,
    ];

    pub fn code(&self) -> u32 {
        ERROR_CODE_OFFSET + *self as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PublicKeyMismatch => "PublicKeyMismatch",
            Self::IncorrectOwner => "IncorrectOwner",
            Self::UninitializedAccount => "UninitializedAccount",
            Self::MissingSigner => "MissingSigner",
            Self::CreatorMismatch => "CreatorMismatch",
            Self::AuthorityMismatch => "AuthorityMismatch",
            Self::InvalidPayoutPhases => "InvalidPayoutPhases",
            Self::InvalidUpdateEscrow => "InvalidUpdateEscrow",
            Self::InvalidCloseEscrow => "InvalidCloseEscrow",
            Self::InvalidTreasuryEscrow => "InvalidTreasuryEscrow",
            Self::InvalidTreasuryEscrowUpdate => "InvalidTreasuryEscrowUpdate",
            Self::InvalidCampaignEndTime => "InvalidCampaignEndTime",
            Self::InvalidDepositEscrowMint => "InvalidDepositEscrowMint",
            Self::InvalidDepositEscrowAccount => "InvalidDepositEscrowAccount",
            Self::InvalidCpiInvocation => "InvalidCpiInvocation",
            Self::InvalidCreateDepositEscrowIx => "InvalidCreateDepositEscrowIx",
            Self::InvalidPayoutRequest => "InvalidPayoutRequest",
            Self::DepositEscrowAccountNotEmpty => "DepositEscrowAccountNotEmpty",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::PublicKeyMismatch => "PublicKey check failed",
            Self::IncorrectOwner => "An account owner was incorrect",
            Self::UninitializedAccount => "An account was uninitialized",
            Self::MissingSigner => "You are missing at least one required signer",
            Self::CreatorMismatch => {
                "Provided creator does not match the CampaignEscrow creator"
            }
            Self::AuthorityMismatch => {
                "Provided authority does not match the CampaignEscrow authority"
            }
            Self::InvalidPayoutPhases => "Payout phase settings are invalid",
            Self::InvalidUpdateEscrow => {
                "Cannot update CampaignEscrow after the campaign end time"
            }
            Self::InvalidCloseEscrow => {
                "Cannot close CampaignEscrow unless all payouts are complete"
            }
            Self::InvalidTreasuryEscrow => "Invalid treasury escrow account provided",
            Self::InvalidTreasuryEscrowUpdate => {
                "UpdateEscrow input must include both the treasury_escrow_owner and treasury_mint if updating the escrow treasury"
            }
            Self::InvalidCampaignEndTime => "Invalid campaign_end_time provided",
            Self::InvalidDepositEscrowMint => {
                "Deposit escrow mint cannot be the native mint"
            }
            Self::InvalidDepositEscrowAccount => "Invalid deposit escrow account provided",
            Self::InvalidCpiInvocation => "Invalid CPI invocation",
            Self::InvalidCreateDepositEscrowIx => "Invalid CreateDepositEscrow instruction",
            Self::InvalidPayoutRequest => "Invalid payout request",
            Self::DepositEscrowAccountNotEmpty => {
                "Deposit escrow account must be empty before it can be closed"
            }
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        let offset = code.checked_sub(ERROR_CODE_OFFSET)?;
        Self::ALL.get(offset as usize).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl fmt::Display for CampaignTreasuryManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message())
    }
}

/// Message for a program error code, `None` when the code is not ours.
pub fn error_message(code: u32) -> Option<&'static str> {
    CampaignTreasuryManagerError::from_code(code).map(|e| e.message())
}

/// Pull the custom error code out of a transaction error or log line, e.g.
/// `"... failed: custom program error: 0x2329"` yields `9001`.
pub fn parse_custom_error_code(text: &str) -> Option<u32> {
    const MARKER: &str = "custom program error: ";

    let start = text.find(MARKER)? + MARKER.len();
    let rest = &text[start..];
    let hex = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))?;
    let end = hex
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(hex.len());

    u32::from_str_radix(&hex[..end], 16).ok()
}

/// Map a transaction error string straight to one of our errors.
pub fn program_error_from_log(text: &str) -> Option<CampaignTreasuryManagerError> {
    parse_custom_error_code(text).and_then(CampaignTreasuryManagerError::from_code)
}
