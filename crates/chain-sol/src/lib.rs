//! Minimal Solana client primitives.
//!
//! Addresses, program-derived address search, associated token accounts,
//! and the legacy transaction wire format, built by hand on top of
//! `ed25519-dalek` and `sha2` instead of `solana-sdk` (which drags in tokio
//! and 200+ transitive dependencies).
//!
//! Chain state is reached only through the [`AccountReader`] trait, so the
//! crate itself never performs network I/O.

pub mod account;
pub mod address;
pub mod error;
pub mod pda;
pub mod spl_token;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use account::{AccountReader, MemoryAccountReader};
pub use address::{address_to_bytes, validate_address, Pubkey};
pub use error::SolError;
pub use pda::{create_program_address, find_program_address, is_on_curve};
pub use spl_token::{
    derive_associated_token_address, is_native_mint, ASSOCIATED_TOKEN_PROGRAM_ID, NATIVE_MINT,
    SYSTEM_PROGRAM_ID, SYSVAR_INSTRUCTIONS_ID, SYSVAR_RENT_ID, TOKEN_PROGRAM_ID,
};
pub use transaction::{
    compile_transaction, decode_compact_u16, deserialize_transaction, encode_compact_u16,
    ix_to_tx, serialize_message, sign_transaction, AccountMeta, CompiledInstruction,
    Instruction, ResolvedInstruction, SolTransaction, TransactionDraft, WireTransaction,
};
