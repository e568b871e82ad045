//! Ledger state on RocksDB across reopen.

use crate::concurrency_tests::audit_while_busy;
use crate::{random_key, random_wallet};
use cli::commands::{balance, create_account, init_mint, keygen, mint, supply, transfer};
use cli::{CliConfig, Context};
use ledger::{derive_account_address, Instruction, Ledger, LedgerError, RocksStore};
use std::sync::Arc;
use tempfile::tempdir;

/// Balances and supply written through one handle are visible after reopening.
#[test]
fn test_reopen_keeps_state() {
    let dir = tempdir().unwrap();
    let token = random_key();
    let wallet = random_key();
    let user = random_key();

    {
        let ledger = Ledger::new(RocksStore::open(dir.path()).unwrap());
        ledger.initialize_mint(&token, &wallet, None, 3).unwrap();
        ledger.mint(&token, &wallet, 10_000, &wallet).unwrap();
        ledger.ensure_account(&token, &user).unwrap();
        ledger.transfer(&token, &wallet, &user, 2_500, &wallet).unwrap();
    }

    let ledger = Ledger::new(RocksStore::open(dir.path()).unwrap());
    assert_eq!(ledger.get_mint(&token).unwrap().supply, 10_000);
    assert_eq!(ledger.account_of(&token, &wallet).unwrap().amount, 7_500);

    let parsed = ledger
        .parsed_account(&derive_account_address(&token, &user))
        .unwrap();
    assert_eq!(parsed.token_amount.amount, "2500");
    assert_eq!(parsed.token_amount.ui_amount_string, "2.5");

    let audit = ledger.audit_supply(&token).unwrap();
    assert_eq!(audit.accounts, 2);
    assert!(audit.is_balanced());
}

/// A rejected operation leaves nothing behind on disk.
#[test]
fn test_rejection_is_not_persisted() {
    let dir = tempdir().unwrap();
    let (wallet, wallet_id) = random_wallet();
    let (stranger, stranger_id) = random_wallet();
    let token = random_key();

    {
        let ledger = Ledger::new(RocksStore::open(dir.path()).unwrap());
        ledger.initialize_mint(&token, &wallet_id, None, 0).unwrap();

        let mint_to = |owner| Instruction::MintTo {
            mint: token,
            owner,
            amount: 10,
        };
        let result = ledger.process(&mint_to(stranger_id).sign(&stranger).unwrap());
        assert!(matches!(result, Err(LedgerError::Unauthorized(_))));
        ledger.process(&mint_to(wallet_id).sign(&wallet).unwrap()).unwrap();
    }

    let ledger = Ledger::new(RocksStore::open(dir.path()).unwrap());
    assert_eq!(ledger.get_mint(&token).unwrap().supply, 10);
    assert!(matches!(
        ledger.account_of(&token, &stranger_id),
        Err(LedgerError::NotFound(_))
    ));
}

/// Drives the command layer the way the binary does, across invocations.
#[test]
fn test_command_sessions() {
    let dir = tempdir().unwrap();
    let config = CliConfig {
        data_dir: dir.path().join("ledger"),
        keypair: dir.path().join("wallet.key"),
        lock_stripes: 16,
    };
    keygen::run(&config.keypair, false).unwrap();
    let user = keygen::run(dir.path().join("user.key"), false).unwrap();

    let token = {
        let ctx = Context::open(&config).unwrap();
        let (token, record) = init_mint::run(&ctx, None, 0, None).unwrap();
        assert_eq!(record.mint_authority, ctx.identity().unwrap());
        mint::run(&ctx, &token, None, 10).unwrap();
        token
    };

    {
        let ctx = Context::open(&config).unwrap();
        create_account::run(&ctx, &token, Some(user)).unwrap();
        transfer::run(&ctx, &token, &user, 5).unwrap();
    }

    let ctx = Context::open(&config).unwrap();
    assert_eq!(balance::run(&ctx, &token, None).unwrap(), "5");
    assert_eq!(balance::run(&ctx, &token, Some(user)).unwrap(), "5");

    let overdraft = transfer::run(&ctx, &token, &user, 100);
    assert!(overdraft.is_err());

    let audit = supply::run(&ctx, &token).unwrap();
    assert_eq!(audit.supply, 10);
    assert!(audit.is_balanced());
}

/// RocksDB snapshots never observe half of a committed write batch.
#[test]
fn test_audit_during_concurrent_operations_on_disk() {
    let dir = tempdir().unwrap();
    let token = random_key();
    let authority = random_key();

    {
        let ledger = Arc::new(Ledger::new(RocksStore::open(dir.path()).unwrap()));
        ledger.initialize_mint(&token, &authority, None, 0).unwrap();
        let audits = audit_while_busy(ledger, token, authority);
        assert!(audits >= 1);
    }

    let ledger = Ledger::new(RocksStore::open(dir.path()).unwrap());
    let audit = ledger.audit_supply(&token).unwrap();
    assert!(audit.is_balanced());
    assert!(audit.supply > 0);
}
