//! Client SDK for the CampaignTreasuryManager Solana program.
//!
//! The program itself (escrow state transitions, payout validation, fund
//! custody) runs on chain. This crate knows only its interface: it derives
//! the program's addresses, resolves the account set of each instruction,
//! assembles unsigned transactions, and decodes confirmed ones.
//!
//! ```text
//! pdas ──> resolver ──> instructions ──> TransactionDraft
//!             │                              │
//!        AccountReader                 (compile + sign in chain-sol)
//!                                            │
//!                       decoder <── wire bytes
//! ```
//!
//! Every operation is also available through [`CampaignTreasuryManagerSdk`].

pub mod accounts;
pub mod args;
pub mod constants;
pub mod decoder;
pub mod environment;
pub mod error;
pub mod idl;
pub mod instructions;
pub mod payout_phases;
pub mod pdas;
pub mod program_error;
pub mod resolver;
pub mod sdk;
pub mod state;

pub use accounts::OperationAccounts;
pub use args::{
    CreateCampaignEscrowInput, InstructionArgs, NonVotingPayoutPhaseInput,
    UpdateCampaignEscrowInput, VotingPayoutPhaseInput,
};
pub use decoder::{
    decode_transaction, decode_wire_transaction, DecodedAccount, DecodedInstruction,
};
pub use environment::{program_ids_for, Environment, ProgramIds};
pub use error::SdkError;
pub use idl::{Operation, OperationDescriptor, OPERATIONS};
pub use payout_phases::{current_active_payout_phase, ordered_payout_phases, PayoutPhase};
pub use pdas::{campaign_uuid_to_seed, PdaResult};
pub use program_error::{
    error_message, parse_custom_error_code, program_error_from_log, CampaignTreasuryManagerError,
};
pub use resolver::{
    CloseDepositEscrowParticipants, CloseEscrowParticipants, DepositParticipants,
    EscrowParticipants, VetoParticipants,
};
pub use sdk::CampaignTreasuryManagerSdk;
pub use state::{CampaignEscrow, DepositRecord, PayoutPhases, ProgramAccount};
