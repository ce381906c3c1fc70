//! Fixed addresses and seed prefixes of the deployed CampaignTreasuryManager
//! program.

use chain_sol::Pubkey;

/// Program name as published in the interface description.
pub const PROGRAM_NAME: &str = "campaign_treasury_manager";

/// Interface version these bindings were generated against.
pub const IDL_VERSION: &str = "0.0.7";

/// `Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS`
pub const CAMPAIGN_TREASURY_MANAGER_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    0xda, 0x07, 0x5c, 0xb2, 0xff, 0x5e, 0xc6, 0x81, 0x76, 0x13, 0xde, 0x53, 0x0b, 0x69, 0x2a,
    0x87, 0x35, 0x47, 0x77, 0x69, 0xda, 0x47, 0x43, 0x0c, 0xbd, 0x81, 0x54, 0x33, 0x5c, 0x4a,
    0x83, 0x27,
]);

/// Anti-bot signer for local, devnet and testnet deployments:
/// `antiDV8bRvF4XTeRqmyHV1jpHD4Lvz7gKBKBBRQb8ir`
pub const ANTI_BOT_DEV_AUTHORITY: Pubkey = Pubkey::new_from_array([
    0x08, 0xa8, 0x0e, 0x73, 0xc9, 0xcd, 0xea, 0xe1, 0x40, 0xcf, 0xfc, 0xe0, 0x33, 0xe7, 0xbb,
    0x3d, 0x8e, 0x25, 0x30, 0xd5, 0xbe, 0x18, 0x55, 0x28, 0x0b, 0xe3, 0x96, 0xe4, 0x8e, 0x7f,
    0xcf, 0xb7,
]);

/// Anti-bot signer for mainnet: `antiScHGm8NAqfpdFNYbv3c9ntY6xksvvTN3B9cDf5Y`
pub const ANTI_BOT_MAINNET_AUTHORITY: Pubkey = Pubkey::new_from_array([
    0x08, 0xa8, 0x0e, 0x78, 0xc5, 0xbb, 0xe9, 0x6e, 0xde, 0x5d, 0x7a, 0xc3, 0x5f, 0x0a, 0x62,
    0xf5, 0x8c, 0x79, 0x71, 0xdb, 0x1b, 0x44, 0xf4, 0xb1, 0x0b, 0xc0, 0x89, 0xcd, 0x5f, 0xcd,
    0xec, 0xef,
]);

// PDA seed prefixes.
pub const CAMPAIGN_ESCROW_PREFIX: &str = "campaign_escrow";
pub const PROGRAM_PREFIX: &str = "campaign_treasury_manager";
pub const TREASURY_PREFIX: &str = "treasury_escrow";
pub const DEPOSIT_ESCROW_PREFIX: &str = "deposit_escrow";
pub const DEPOSIT_RECORD_PREFIX: &str = "deposit_record";

/// 100% in basis points.
pub const ONE_HUNDRED_PERCENT_BASIS_POINTS: u16 = 10_000;

/// Length of the Anchor instruction and account discriminators.
pub const DISCRIMINATOR_LEN: usize = 8;
