//! End-to-end scenarios against the in-memory store.

use crate::random_key;
use ledger::{derive_account_address, Ledger, LedgerError, MemoryStore, Pubkey, TokenId};

fn scenario_a() -> (Ledger<MemoryStore>, TokenId, Pubkey) {
    let ledger = Ledger::new(MemoryStore::new());
    let token = random_key();
    let wallet = random_key();

    ledger.initialize_mint(&token, &wallet, None, 0).unwrap();
    ledger.mint(&token, &wallet, 10, &wallet).unwrap();
    (ledger, token, wallet)
}

/// Mint to the authority's own account.
#[test]
fn test_mint_to_self() {
    let (ledger, token, wallet) = scenario_a();

    let address = derive_account_address(&token, &wallet);
    assert_eq!(ledger.get_balance(&address).unwrap(), "10");
    assert_eq!(ledger.get_mint(&token).unwrap().supply, 10);
}

/// Transfer to a freshly created account.
#[test]
fn test_transfer_to_new_account() {
    let (ledger, token, wallet) = scenario_a();
    let user = random_key();

    ledger.ensure_account(&token, &user).unwrap();
    ledger.transfer(&token, &wallet, &user, 5, &wallet).unwrap();

    assert_eq!(
        ledger.get_balance(&derive_account_address(&token, &wallet)).unwrap(),
        "5"
    );
    assert_eq!(
        ledger.get_balance(&derive_account_address(&token, &user)).unwrap(),
        "5"
    );
    assert_eq!(ledger.get_mint(&token).unwrap().supply, 10);
}

/// A mint by anyone but the authority is rejected and changes nothing.
#[test]
fn test_mint_by_stranger() {
    let (ledger, token, wallet) = scenario_a();
    let stranger = random_key();

    let result = ledger.mint(&token, &wallet, 10, &stranger);
    assert!(matches!(result, Err(LedgerError::Unauthorized(_))));

    assert_eq!(ledger.get_mint(&token).unwrap().supply, 10);
    assert_eq!(ledger.account_of(&token, &wallet).unwrap().amount, 10);
}

/// An overdraft is rejected and changes nothing.
#[test]
fn test_overdraft() {
    let (ledger, token, wallet) = scenario_a();
    let user = random_key();
    ledger.ensure_account(&token, &user).unwrap();
    ledger.transfer(&token, &wallet, &user, 5, &wallet).unwrap();

    let result = ledger.transfer(&token, &wallet, &user, 100, &wallet);
    assert_eq!(
        result,
        Err(LedgerError::InsufficientFunds {
            required: 100,
            available: 5,
        })
    );

    assert_eq!(ledger.account_of(&token, &wallet).unwrap().amount, 5);
    assert_eq!(ledger.account_of(&token, &user).unwrap().amount, 5);
    assert_eq!(ledger.get_mint(&token).unwrap().supply, 10);
}

/// Account creation is idempotent and never resets a balance.
#[test]
fn test_repeated_account_creation() {
    let (ledger, token, wallet) = scenario_a();

    for _ in 0..3 {
        let record = ledger.ensure_account(&token, &wallet).unwrap();
        assert_eq!(record.amount, 10);
    }
    assert_eq!(ledger.store().account_count().unwrap(), 1);
    assert!(ledger.audit_supply(&token).unwrap().is_balanced());
}

/// Tokens do not share accounts or supply.
#[test]
fn test_tokens_are_independent() {
    let (ledger, first, wallet) = scenario_a();
    let second = random_key();
    ledger.initialize_mint(&second, &wallet, None, 2).unwrap();
    ledger.mint(&second, &wallet, 250, &wallet).unwrap();

    assert_ne!(
        derive_account_address(&first, &wallet),
        derive_account_address(&second, &wallet)
    );
    assert_eq!(ledger.get_mint(&first).unwrap().supply, 10);
    assert_eq!(ledger.get_mint(&second).unwrap().supply, 250);

    let parsed = ledger
        .parsed_account(&derive_account_address(&second, &wallet))
        .unwrap();
    assert_eq!(parsed.token_amount.ui_amount_string, "2.5");

    let audit = ledger.audit_supply(&first).unwrap();
    assert_eq!(audit.accounts, 1);
    assert!(audit.is_balanced());
}

/// A token cannot be registered twice.
#[test]
fn test_double_initialize() {
    let (ledger, token, wallet) = scenario_a();
    let result = ledger.initialize_mint(&token, &random_key(), None, 6);
    assert!(matches!(result, Err(LedgerError::AlreadyExists(_))));

    let record = ledger.get_mint(&token).unwrap();
    assert_eq!(record.mint_authority, wallet);
    assert_eq!(record.supply, 10);
    assert_eq!(record.decimals, 0);
}

/// Minting into an unregistered token fails.
#[test]
fn test_mint_unknown_token() {
    let ledger = Ledger::new(MemoryStore::new());
    let wallet = random_key();
    let result = ledger.mint(&random_key(), &wallet, 1, &wallet);
    assert!(matches!(result, Err(LedgerError::NotFound(_))));
    assert_eq!(ledger.store().account_count().unwrap(), 0);
}
