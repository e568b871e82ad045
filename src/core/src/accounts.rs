//! Account ledger: per-owner balance records of each token.

use crate::address::derive_account_address;
use crate::errors::LedgerError;
use crate::registry;
use crate::state::Transaction;
use crate::storage::LedgerStore;
use crate::types::{AccountRecord, Balance, Pubkey, TokenId};

/// Returns the record for (token, owner), creating an empty one if absent.
///
/// The second element is `true` when the record was created by this call.
pub fn ensure_account<S: LedgerStore + ?Sized>(
    txn: &mut Transaction<'_, S>,
    token: &TokenId,
    owner: &Pubkey,
) -> Result<(AccountRecord, bool), LedgerError> {
    registry::load(txn, token)?;

    let address = derive_account_address(token, owner);
    if let Some(existing) = txn.account(&address)? {
        check_binding(&address, &existing, token, owner)?;
        return Ok((existing, false));
    }

    let record = AccountRecord::new_empty(*token, *owner);
    txn.put_account(address, record.clone());
    Ok((record, true))
}

/// Loads the record for (token, owner), failing if it was never created.
pub fn load<S: LedgerStore + ?Sized>(
    txn: &Transaction<'_, S>,
    token: &TokenId,
    owner: &Pubkey,
) -> Result<AccountRecord, LedgerError> {
    let address = derive_account_address(token, owner);
    let record = txn
        .account(&address)?
        .ok_or_else(|| LedgerError::NotFound(format!("account {} (owner {})", address, owner)))?;
    check_binding(&address, &record, token, owner)?;
    Ok(record)
}

/// Adds `amount` to an existing record and returns the new balance.
pub fn credit<S: LedgerStore + ?Sized>(
    txn: &mut Transaction<'_, S>,
    token: &TokenId,
    owner: &Pubkey,
    amount: Balance,
) -> Result<Balance, LedgerError> {
    let mut record = load(txn, token, owner)?;
    record.amount = record
        .amount
        .checked_add(amount)
        .ok_or(LedgerError::Overflow {
            current: record.amount,
            amount,
        })?;

    let balance = record.amount;
    txn.put_account(derive_account_address(token, owner), record);
    Ok(balance)
}

/// Removes `amount` from an existing record and returns the new balance.
pub fn debit<S: LedgerStore + ?Sized>(
    txn: &mut Transaction<'_, S>,
    token: &TokenId,
    owner: &Pubkey,
    amount: Balance,
) -> Result<Balance, LedgerError> {
    let mut record = load(txn, token, owner)?;
    record.amount = record
        .amount
        .checked_sub(amount)
        .ok_or(LedgerError::InsufficientFunds {
            required: amount,
            available: record.amount,
        })?;

    let balance = record.amount;
    txn.put_account(derive_account_address(token, owner), record);
    Ok(balance)
}

fn check_binding(
    address: &Pubkey,
    record: &AccountRecord,
    token: &TokenId,
    owner: &Pubkey,
) -> Result<(), LedgerError> {
    if record.mint != *token || record.owner != *owner {
        return Err(LedgerError::InvalidAccountData(format!(
            "account {} is bound to mint {} and owner {}",
            address, record.mint, record.owner
        )));
    }
    Ok(())
}
