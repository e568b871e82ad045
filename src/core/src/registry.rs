//! Token registry: supply and minting authority of each token.

use crate::errors::LedgerError;
use crate::state::Transaction;
use crate::storage::LedgerStore;
use crate::types::{Balance, MintRecord, Pubkey, TokenId};

/// Registers a new token with zero supply.
pub fn initialize<S: LedgerStore + ?Sized>(
    txn: &mut Transaction<'_, S>,
    token: &TokenId,
    mint_authority: &Pubkey,
    freeze_authority: Option<Pubkey>,
    decimals: u8,
) -> Result<MintRecord, LedgerError> {
    if txn.mint(token)?.is_some() {
        return Err(LedgerError::AlreadyExists(format!("token {}", token)));
    }

    let record = MintRecord::new(*mint_authority, decimals, freeze_authority);
    txn.put_mint(*token, record.clone());
    Ok(record)
}

/// Loads a registry entry, failing if the token is unknown.
pub fn load<S: LedgerStore + ?Sized>(
    txn: &Transaction<'_, S>,
    token: &TokenId,
) -> Result<MintRecord, LedgerError> {
    txn.mint(token)?
        .ok_or_else(|| LedgerError::NotFound(format!("token {}", token)))
}

/// Grows the supply of a token on behalf of `caller`.
///
/// # Returns
///
/// The new total supply.
pub fn record_mint<S: LedgerStore + ?Sized>(
    txn: &mut Transaction<'_, S>,
    token: &TokenId,
    caller: &Pubkey,
    amount: Balance,
) -> Result<Balance, LedgerError> {
    let mut record = load(txn, token)?;

    if record.mint_authority != *caller {
        return Err(LedgerError::Unauthorized(format!(
            "only the mint authority can mint: expected {}, got {}",
            record.mint_authority, caller
        )));
    }

    record.supply = record
        .supply
        .checked_add(amount)
        .ok_or(LedgerError::Overflow {
            current: record.supply,
            amount,
        })?;

    let supply = record.supply;
    txn.put_mint(*token, record);
    Ok(supply)
}
