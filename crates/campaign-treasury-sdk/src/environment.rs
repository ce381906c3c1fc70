//! Deployment environments and the addresses each one uses.

use std::fmt;
use std::str::FromStr;

use chain_sol::Pubkey;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ANTI_BOT_DEV_AUTHORITY, ANTI_BOT_MAINNET_AUTHORITY, CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID,
};
use crate::error::SdkError;

/// A cluster the program is deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Development,
    Testnet,
    Production,
}

/// Addresses the SDK needs for one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramIds {
    pub program_id: Pubkey,
    pub bot_signer_authority: Pubkey,
}

pub const LOCALNET_PROGRAM_IDS: ProgramIds = ProgramIds {
    program_id: CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID,
    bot_signer_authority: ANTI_BOT_DEV_AUTHORITY,
};

pub const DEVNET_PROGRAM_IDS: ProgramIds = ProgramIds {
    program_id: CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID,
    bot_signer_authority: ANTI_BOT_DEV_AUTHORITY,
};

pub const TESTNET_PROGRAM_IDS: ProgramIds = ProgramIds {
    program_id: CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID,
    bot_signer_authority: ANTI_BOT_DEV_AUTHORITY,
};

pub const MAINNET_PROGRAM_IDS: ProgramIds = ProgramIds {
    program_id: CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID,
    bot_signer_authority: ANTI_BOT_MAINNET_AUTHORITY,
};

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Local,
        Environment::Development,
        Environment::Testnet,
        Environment::Production,
    ];

    pub fn program_ids(&self) -> ProgramIds {
        match self {
            Environment::Local => LOCALNET_PROGRAM_IDS,
            Environment::Development => DEVNET_PROGRAM_IDS,
            Environment::Testnet => TESTNET_PROGRAM_IDS,
            Environment::Production => MAINNET_PROGRAM_IDS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Testnet => "testnet",
            Environment::Production => "production",
        }
    }
}

/// Shorthand for `environment.program_ids()`.
pub fn program_ids_for(environment: Environment) -> ProgramIds {
    environment.program_ids()
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "localnet" => Ok(Environment::Local),
            "development" | "devnet" | "dev" => Ok(Environment::Development),
            "testnet" | "test" => Ok(Environment::Testnet),
            "production" | "mainnet" | "mainnet-beta" | "prod" => Ok(Environment::Production),
            other => Err(SdkError::UnknownEnvironment(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_environment_uses_the_same_program() {
        for env in Environment::ALL {
            assert_eq!(env.program_ids().program_id, CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID);
        }
    }

    #[test]
    fn only_production_uses_mainnet_bot_signer() {
        for env in Environment::ALL {
            let expected = match env {
                Environment::Production => ANTI_BOT_MAINNET_AUTHORITY,
                _ => ANTI_BOT_DEV_AUTHORITY,
            };
            assert_eq!(program_ids_for(env).bot_signer_authority, expected);
        }
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("localnet".parse::<Environment>().unwrap(), Environment::Local);
        assert_eq!("devnet".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Testnet);
        assert_eq!("mainnet-beta".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for env in Environment::ALL {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
    }

    #[test]
    fn serde_lowercase_names() {
        let json = serde_json::to_string(&Environment::Development).unwrap();
        assert_eq!(json, "\"development\"");

        let ids = serde_json::to_value(Environment::Production.program_ids()).unwrap();
        assert_eq!(ids["programId"], "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");
        assert_eq!(ids["botSignerAuthority"], "antiScHGm8NAqfpdFNYbv3c9ntY6xksvvTN3B9cDf5Y");
    }
}
