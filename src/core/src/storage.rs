//! Storage boundary for ledger records.
//!
//! The ledger only needs point reads, a consistent per-token snapshot and an
//! all-or-nothing commit of a [`WriteSet`]. [`MemoryStore`] keeps everything
//! behind one lock; [`crate::db::RocksStore`] persists to RocksDB.

use crate::errors::LedgerError;
use crate::state::WriteSet;
use crate::types::{AccountRecord, MintRecord, Pubkey, TokenId};
use std::collections::HashMap;
use std::sync::RwLock;

/// A consistent view of one token: its registry entry and every account
/// holding it, read at a single point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSnapshot {
    /// The registry entry, if the token exists
    pub mint: Option<MintRecord>,
    /// All account records for the token, by derived address
    pub accounts: Vec<(Pubkey, AccountRecord)>,
}

/// Persistence interface used by the ledger.
pub trait LedgerStore: Send + Sync {
    /// Reads the registry entry of a token.
    fn get_mint(&self, token: &TokenId) -> Result<Option<MintRecord>, LedgerError>;

    /// Reads an account record by derived address.
    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountRecord>, LedgerError>;

    /// Applies every write in the set, or none of them.
    fn commit(&self, writes: WriteSet) -> Result<(), LedgerError>;

    /// Reads a token's registry entry and accounts from one consistent state.
    fn token_snapshot(&self, token: &TokenId) -> Result<TokenSnapshot, LedgerError>;
}

#[derive(Default)]
struct MemoryState {
    mints: HashMap<TokenId, MintRecord>,
    accounts: HashMap<Pubkey, AccountRecord>,
}

/// In-memory store. Commits are atomic because they run under a single write lock.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::Storage("memory store lock poisoned".to_string())
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of account records held.
    pub fn account_count(&self) -> Result<usize, LedgerError> {
        Ok(self.state.read().map_err(poisoned)?.accounts.len())
    }
}

impl LedgerStore for MemoryStore {
    fn get_mint(&self, token: &TokenId) -> Result<Option<MintRecord>, LedgerError> {
        Ok(self.state.read().map_err(poisoned)?.mints.get(token).cloned())
    }

    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountRecord>, LedgerError> {
        Ok(self
            .state
            .read()
            .map_err(poisoned)?
            .accounts
            .get(address)
            .cloned())
    }

    fn commit(&self, writes: WriteSet) -> Result<(), LedgerError> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.mints.extend(writes.mints);
        state.accounts.extend(writes.accounts);
        Ok(())
    }

    fn token_snapshot(&self, token: &TokenId) -> Result<TokenSnapshot, LedgerError> {
        let state = self.state.read().map_err(poisoned)?;
        let mut accounts: Vec<(Pubkey, AccountRecord)> = state
            .accounts
            .iter()
            .filter(|(_, record)| record.mint == *token)
            .map(|(address, record)| (*address, record.clone()))
            .collect();
        accounts.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(TokenSnapshot {
            mint: state.mints.get(token).cloned(),
            accounts,
        })
    }
}
