//! RocksDB-backed ledger store.

use crate::errors::LedgerError;
use crate::pack::Pack;
use crate::state::WriteSet;
use crate::storage::{LedgerStore, TokenSnapshot};
use crate::types::{AccountRecord, MintRecord, Pubkey, TokenId};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Constants for RocksDB keys
const MINT_PREFIX: &str = "mint::";
const ACCOUNT_PREFIX: &str = "account::";
const TOKEN_ACCOUNTS_PREFIX: &str = "token_accounts::";

fn mint_key(token: &TokenId) -> String {
    format!("{}{}", MINT_PREFIX, token)
}

fn account_key(address: &Pubkey) -> String {
    format!("{}{}", ACCOUNT_PREFIX, address)
}

/// Prefix of the index entries listing the accounts of one token.
fn token_accounts_prefix(token: &TokenId) -> String {
    format!("{}{}::", TOKEN_ACCOUNTS_PREFIX, token)
}

fn token_account_key(token: &TokenId, address: &Pubkey) -> String {
    format!("{}{}", token_accounts_prefix(token), address)
}

fn storage_error(context: &str, e: rocksdb::Error) -> LedgerError {
    LedgerError::Storage(format!("{}: {}", context, e))
}

/// Ledger store persisting packed records in RocksDB.
///
/// Commits go through a single `WriteBatch`, which RocksDB applies atomically.
#[derive(Clone)]
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    /// Opens (or creates) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path.as_ref())
            .map_err(|e| storage_error("Failed to open database", e))?;
        info!("Opened ledger database at {}", path.as_ref().display());

        Ok(Self { db: Arc::new(db) })
    }

    /// Wraps an already opened database.
    pub fn from_db(db: Arc<DB>) -> Self {
        Self { db }
    }
}

impl LedgerStore for RocksStore {
    fn get_mint(&self, token: &TokenId) -> Result<Option<MintRecord>, LedgerError> {
        self.db
            .get(mint_key(token).as_bytes())
            .map_err(|e| storage_error("Failed to get mint", e))?
            .map(|bytes| MintRecord::unpack(&bytes))
            .transpose()
    }

    fn get_account(&self, address: &Pubkey) -> Result<Option<AccountRecord>, LedgerError> {
        self.db
            .get(account_key(address).as_bytes())
            .map_err(|e| storage_error("Failed to get account", e))?
            .map(|bytes| AccountRecord::unpack(&bytes))
            .transpose()
    }

    fn commit(&self, writes: WriteSet) -> Result<(), LedgerError> {
        if writes.is_empty() {
            return Ok(());
        }

        let mut batch = WriteBatch::default();
        for (token, record) in &writes.mints {
            batch.put(mint_key(token).as_bytes(), record.pack());
        }
        for (address, record) in &writes.accounts {
            batch.put(account_key(address).as_bytes(), record.pack());
            // Accounts never change token, so the index entry is stable.
            batch.put(token_account_key(&record.mint, address).as_bytes(), b"");
        }

        self.db
            .write(batch)
            .map_err(|e| storage_error("Failed to commit write batch", e))?;
        debug!("Committed {} records", writes.len());
        Ok(())
    }

    fn token_snapshot(&self, token: &TokenId) -> Result<TokenSnapshot, LedgerError> {
        let snapshot = self.db.snapshot();

        let mint = snapshot
            .get(mint_key(token).as_bytes())
            .map_err(|e| storage_error("Failed to get mint", e))?
            .map(|bytes| MintRecord::unpack(&bytes))
            .transpose()?;

        let prefix = token_accounts_prefix(token);
        let mut accounts = Vec::new();
        let iter = snapshot.iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward));
        for item in iter {
            let (key, _) = item.map_err(|e| storage_error("Failed to iterate accounts", e))?;

            let Some(suffix) = key.strip_prefix(prefix.as_bytes()) else {
                // We've moved past this token's index entries
                break;
            };

            let address = std::str::from_utf8(suffix)
                .ok()
                .and_then(|s| s.parse::<Pubkey>().ok())
                .ok_or_else(|| {
                    LedgerError::InvalidAccountData(format!(
                        "malformed index key: {}",
                        String::from_utf8_lossy(&key)
                    ))
                })?;

            let value = snapshot
                .get(account_key(&address).as_bytes())
                .map_err(|e| storage_error("Failed to get account", e))?
                .ok_or_else(|| {
                    LedgerError::InvalidAccountData(format!("index entry without account {}", address))
                })?;
            let record = AccountRecord::unpack(&value)?;
            if record.mint != *token {
                return Err(LedgerError::InvalidAccountData(format!(
                    "account {} indexed under {} belongs to {}",
                    address, token, record.mint
                )));
            }
            accounts.push((address, record));
        }

        Ok(TokenSnapshot { mint, accounts })
    }
}
