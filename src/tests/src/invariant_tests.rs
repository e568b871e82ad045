//! Random operation sequences checked against a simple model.

use crate::random_key;
use ledger::{Balance, Ledger, LedgerError, LedgerStore, MemoryStore, Pubkey};
use rand::Rng;
use std::collections::HashMap;

/// Applies random mints and transfers and checks conservation after each step.
#[test]
fn test_random_sequences_conserve_supply() {
    let mut rng = rand::thread_rng();

    for _ in 0..10 {
        let ledger = Ledger::new(MemoryStore::new());
        let token = random_key();
        let authority = random_key();
        ledger.initialize_mint(&token, &authority, None, 0).unwrap();

        let owners: Vec<Pubkey> = (0..5).map(|_| random_key()).collect();
        let mut model: HashMap<Pubkey, Balance> = HashMap::new();
        let mut supply: Balance = 0;

        for _ in 0..200 {
            let caller_is_authority = rng.gen_bool(0.8);
            match rng.gen_range(0..3) {
                0 => {
                    let owner = owners[rng.gen_range(0..owners.len())];
                    let amount = rng.gen_range(0..50u128);
                    let caller = if caller_is_authority { authority } else { owner };
                    let result = ledger.mint(&token, &owner, amount, &caller);
                    if caller_is_authority {
                        let receipt = result.unwrap();
                        supply += amount;
                        *model.entry(owner).or_insert(0) += amount;
                        assert_eq!(receipt.supply, supply);
                        assert_eq!(receipt.balance, model[&owner]);
                    } else {
                        assert!(matches!(result, Err(LedgerError::Unauthorized(_))));
                    }
                }
                1 => {
                    let source = owners[rng.gen_range(0..owners.len())];
                    let destination = owners[rng.gen_range(0..owners.len())];
                    let amount = rng.gen_range(0..80u128);
                    let result = ledger.transfer(&token, &source, &destination, amount, &source);

                    match (model.get(&source).copied(), model.contains_key(&destination)) {
                        (Some(available), true) if available >= amount => {
                            result.unwrap();
                            *model.get_mut(&source).unwrap() -= amount;
                            *model.get_mut(&destination).unwrap() += amount;
                        }
                        (Some(available), true) => {
                            assert_eq!(
                                result,
                                Err(LedgerError::InsufficientFunds {
                                    required: amount,
                                    available,
                                })
                            );
                        }
                        _ => assert!(matches!(result, Err(LedgerError::NotFound(_)))),
                    }
                }
                _ => {
                    let owner = owners[rng.gen_range(0..owners.len())];
                    let record = ledger.ensure_account(&token, &owner).unwrap();
                    let expected = *model.entry(owner).or_insert(0);
                    assert_eq!(record.amount, expected);
                }
            }

            let audit = ledger.audit_supply(&token).unwrap();
            assert_eq!(audit.supply, supply);
            assert!(audit.is_balanced());
        }

        for (owner, balance) in &model {
            assert_eq!(ledger.account_of(&token, owner).unwrap().amount, *balance);
        }
    }
}

/// Rejected operations never change any observable state.
#[test]
fn test_rejections_leave_state_unchanged() {
    let ledger = Ledger::new(MemoryStore::new());
    let token = random_key();
    let authority = random_key();
    let owner = random_key();
    ledger.initialize_mint(&token, &authority, None, 0).unwrap();
    ledger.mint(&token, &owner, Balance::MAX - 1, &authority).unwrap();

    let before = ledger.store().token_snapshot(&token).unwrap();

    assert!(ledger.mint(&token, &owner, 2, &authority).is_err());
    assert!(ledger.mint(&token, &owner, 1, &owner).is_err());
    assert!(ledger.transfer(&token, &owner, &random_key(), 1, &owner).is_err());
    assert!(ledger.transfer(&token, &owner, &owner, Balance::MAX, &owner).is_err());
    assert!(ledger.transfer(&token, &authority, &owner, 1, &authority).is_err());

    assert_eq!(ledger.store().token_snapshot(&token).unwrap(), before);
}
