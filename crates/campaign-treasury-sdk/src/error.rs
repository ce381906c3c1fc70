use chain_sol::{Pubkey, SolError};
use thiserror::Error;

/// Errors raised while deriving, resolving, building or decoding
/// CampaignTreasuryManager instructions.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid campaign uuid: {0}")]
    InvalidCampaignUuid(String),

    #[error("address derivation failed: {0}")]
    Derivation(String),

    /// The account has never been created. Distinct from an account that
    /// exists but fails to decode.
    #[error("{account} account not found at {address}")]
    AccountNotFound {
        account: &'static str,
        address: Pubkey,
    },

    #[error("account decode failed: {0}")]
    AccountDecode(String),

    #[error("instruction build failed: {0}")]
    InstructionBuild(String),

    #[error("transaction decode failed: {0}")]
    TransactionDecode(String),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("chain error: {0}")]
    Chain(String),
}

impl From<SolError> for SdkError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::InvalidSeeds(_) | SolError::PdaNotFound => SdkError::Derivation(e.to_string()),
            SolError::SerializationError(_) => SdkError::TransactionDecode(e.to_string()),
            SolError::TransactionBuildError(_) => SdkError::InstructionBuild(e.to_string()),
            _ => SdkError::Chain(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_account_and_address() {
        let err = SdkError::AccountNotFound {
            account: "CampaignEscrow",
            address: Pubkey::default(),
        };
        assert_eq!(
            err.to_string(),
            "CampaignEscrow account not found at 11111111111111111111111111111111"
        );
    }

    #[test]
    fn pda_exhaustion_maps_to_derivation() {
        let err: SdkError = SolError::PdaNotFound.into();
        assert!(matches!(err, SdkError::Derivation(_)));
    }

    #[test]
    fn bad_seeds_map_to_derivation() {
        let err: SdkError = SolError::InvalidSeeds("seed 0 is 40 bytes".into()).into();
        assert!(matches!(err, SdkError::Derivation(ref m) if m.contains("40 bytes")));
    }

    #[test]
    fn reader_failure_maps_to_chain() {
        let err: SdkError = SolError::AccountReadError("rpc timeout".into()).into();
        assert!(matches!(err, SdkError::Chain(_)));
        assert!(err.to_string().contains("rpc timeout"));
    }
}
