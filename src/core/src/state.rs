//! Staged state changes for one atomic operation.
//!
//! An operation reads through a [`Transaction`], which layers its own pending
//! writes over the store. Nothing reaches the store until the finished
//! [`WriteSet`] is handed to [`LedgerStore::commit`]; dropping the transaction
//! discards every staged change.

use crate::errors::LedgerError;
use crate::storage::LedgerStore;
use crate::types::{AccountRecord, MintRecord, Pubkey, TokenId};
use std::collections::BTreeMap;

/// A unit of mutable state, used for lock acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    /// The registry entry of a token
    Mint(TokenId),
    /// An account record, by derived address
    Account(Pubkey),
}

/// All writes produced by one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteSet {
    /// Registry entries to store, by token identity
    pub mints: BTreeMap<TokenId, MintRecord>,
    /// Account records to store, by derived address
    pub accounts: BTreeMap<Pubkey, AccountRecord>,
}

impl WriteSet {
    /// Returns true when the operation changed nothing.
    pub fn is_empty(&self) -> bool {
        self.mints.is_empty() && self.accounts.is_empty()
    }

    /// Number of records in the set.
    pub fn len(&self) -> usize {
        self.mints.len() + self.accounts.len()
    }
}

/// Read-through overlay of staged writes on top of a store.
pub struct Transaction<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    writes: WriteSet,
}

impl<'a, S: LedgerStore + ?Sized> Transaction<'a, S> {
    /// Starts an empty transaction over `store`.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            writes: WriteSet::default(),
        }
    }

    /// Reads a registry entry, preferring staged writes.
    pub fn mint(&self, token: &TokenId) -> Result<Option<MintRecord>, LedgerError> {
        match self.writes.mints.get(token) {
            Some(record) => Ok(Some(record.clone())),
            None => self.store.get_mint(token),
        }
    }

    /// Reads an account record, preferring staged writes.
    pub fn account(&self, address: &Pubkey) -> Result<Option<AccountRecord>, LedgerError> {
        match self.writes.accounts.get(address) {
            Some(record) => Ok(Some(record.clone())),
            None => self.store.get_account(address),
        }
    }

    /// Stages a registry entry.
    pub fn put_mint(&mut self, token: TokenId, record: MintRecord) {
        self.writes.mints.insert(token, record);
    }

    /// Stages an account record.
    pub fn put_account(&mut self, address: Pubkey, record: AccountRecord) {
        self.writes.accounts.insert(address, record);
    }

    /// Finishes the transaction, yielding the writes to commit.
    pub fn into_write_set(self) -> WriteSet {
        self.writes
    }
}
