//! Chain-state reading.
//!
//! The SDK never talks to an RPC node directly. It asks an [`AccountReader`]
//! for raw account bytes and decodes them itself, so callers can plug in an
//! RPC client, a test validator, or the in-memory reader below.

use std::collections::HashMap;

use crate::address::Pubkey;
use crate::error::SolError;

/// Read-only access to account data.
pub trait AccountReader {
    /// Raw data of the account at `address`, or `None` if it does not exist.
    ///
    /// An account that exists with empty data must return `Some(vec![])`,
    /// never `None`.
    fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SolError>;
}

impl<T: AccountReader + ?Sized> AccountReader for &T {
    fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SolError> {
        (**self).get_account_data(address)
    }
}

/// An [`AccountReader`] backed by a map, for tests and offline tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountReader {
    accounts: HashMap<Pubkey, Vec<u8>>,
}

impl MemoryAccountReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the data stored at `address`.
    pub fn set_account(&mut self, address: Pubkey, data: Vec<u8>) {
        self.accounts.insert(address, data);
    }

    pub fn remove_account(&mut self, address: &Pubkey) -> Option<Vec<u8>> {
        self.accounts.remove(address)
    }
}

impl AccountReader for MemoryAccountReader {
    fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, SolError> {
        Ok(self.accounts.get(address).cloned())
    }
}
