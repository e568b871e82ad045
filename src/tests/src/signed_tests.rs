//! Scenarios submitted as signed instructions.

use crate::{random_key, random_wallet};
use ledger::{
    derive_account_address, Instruction, Ledger, LedgerError, MemoryStore, Outcome, SignedInstruction,
};

/// Runs the full mint and transfer flow through signed instructions.
#[test]
fn test_signed_flow() {
    let ledger = Ledger::new(MemoryStore::new());
    let (wallet, wallet_id) = random_wallet();
    let (_, user_id) = random_wallet();
    let (mint_key, token) = random_wallet();

    let init = Instruction::InitializeMint {
        mint: token,
        decimals: 0,
        mint_authority: wallet_id,
        freeze_authority: None,
    };
    ledger.process(&init.sign(&mint_key).unwrap()).unwrap();

    let mint = Instruction::MintTo {
        mint: token,
        owner: wallet_id,
        amount: 10,
    };
    ledger.process(&mint.sign(&wallet).unwrap()).unwrap();

    // Anyone may pay for the creation of someone else's account.
    let create = Instruction::CreateAccount {
        mint: token,
        owner: user_id,
    };
    match ledger.process(&create.sign(&wallet).unwrap()).unwrap() {
        Outcome::AccountReady { address, account } => {
            assert_eq!(address, derive_account_address(&token, &user_id));
            assert_eq!(account.owner, user_id);
            assert_eq!(account.amount, 0);
        }
        other => panic!("unexpected outcome: {}", other),
    }

    let transfer = Instruction::Transfer {
        mint: token,
        source_owner: wallet_id,
        destination_owner: user_id,
        amount: 5,
    };
    match ledger.process(&transfer.sign(&wallet).unwrap()).unwrap() {
        Outcome::Transferred(receipt) => {
            assert_eq!(receipt.source_balance, 5);
            assert_eq!(receipt.destination_balance, 5);
        }
        other => panic!("unexpected outcome: {}", other),
    }

    let audit = ledger.audit_supply(&token).unwrap();
    assert_eq!(audit.supply, 10);
    assert!(audit.is_balanced());
}

/// A signer that is not the authority cannot mint, even for itself.
#[test]
fn test_signed_mint_by_stranger() {
    let ledger = Ledger::new(MemoryStore::new());
    let (_, wallet_id) = random_wallet();
    let (stranger, stranger_id) = random_wallet();
    let (mint_key, token) = random_wallet();

    let init = Instruction::InitializeMint {
        mint: token,
        decimals: 0,
        mint_authority: wallet_id,
        freeze_authority: None,
    };
    ledger.process(&init.sign(&mint_key).unwrap()).unwrap();

    let mint = Instruction::MintTo {
        mint: token,
        owner: stranger_id,
        amount: 10,
    };
    let result = ledger.process(&mint.sign(&stranger).unwrap());
    assert!(matches!(result, Err(LedgerError::Unauthorized(_))));
    assert_eq!(ledger.get_mint(&token).unwrap().supply, 0);
}

/// Only the token's own key can register it; a third party cannot claim the identity.
#[test]
fn test_signed_registration_by_third_party() {
    let ledger = Ledger::new(MemoryStore::new());
    let (squatter, squatter_id) = random_wallet();
    let (mint_key, token) = random_wallet();

    let claim = Instruction::InitializeMint {
        mint: token,
        decimals: 0,
        mint_authority: squatter_id,
        freeze_authority: Some(squatter_id),
    };
    let result = ledger.process(&claim.clone().sign(&squatter).unwrap());
    assert!(matches!(result, Err(LedgerError::Unauthorized(_))));
    assert!(matches!(ledger.get_mint(&token), Err(LedgerError::NotFound(_))));
    assert!(matches!(
        ledger.audit_supply(&token),
        Err(LedgerError::NotFound(_))
    ));

    // The rightful key can still register the token afterwards.
    let (_, owner_id) = random_wallet();
    let init = Instruction::InitializeMint {
        mint: token,
        decimals: 0,
        mint_authority: owner_id,
        freeze_authority: None,
    };
    match ledger.process(&init.sign(&mint_key).unwrap()).unwrap() {
        Outcome::MintInitialized(record) => assert_eq!(record.mint_authority, owner_id),
        other => panic!("unexpected outcome: {}", other),
    }

    // A replayed claim now fails on the signer, before the duplicate check.
    let result = ledger.process(&claim.sign(&squatter).unwrap());
    assert!(matches!(result, Err(LedgerError::Unauthorized(_))));
    assert_eq!(ledger.get_mint(&token).unwrap().mint_authority, owner_id);
}

/// A transfer signed by someone other than the source owner is rejected.
#[test]
fn test_signed_transfer_by_stranger() {
    let ledger = Ledger::new(MemoryStore::new());
    let (wallet, wallet_id) = random_wallet();
    let (thief, thief_id) = random_wallet();
    let token = random_key();

    ledger.initialize_mint(&token, &wallet_id, None, 0).unwrap();
    ledger.mint(&token, &wallet_id, 10, &wallet_id).unwrap();
    ledger.ensure_account(&token, &thief_id).unwrap();

    let transfer = Instruction::Transfer {
        mint: token,
        source_owner: wallet_id,
        destination_owner: thief_id,
        amount: 10,
    };
    let result = ledger.process(&transfer.clone().sign(&thief).unwrap());
    assert!(matches!(result, Err(LedgerError::Unauthorized(_))));
    assert_eq!(ledger.account_of(&token, &wallet_id).unwrap().amount, 10);

    ledger.process(&transfer.sign(&wallet).unwrap()).unwrap();
    assert_eq!(ledger.account_of(&token, &thief_id).unwrap().amount, 10);
}

/// Tampering with a signed instruction after signing invalidates it.
#[test]
fn test_tampered_instruction() {
    let ledger = Ledger::new(MemoryStore::new());
    let (wallet, wallet_id) = random_wallet();
    let token = random_key();
    ledger.initialize_mint(&token, &wallet_id, None, 0).unwrap();

    let mint = Instruction::MintTo {
        mint: token,
        owner: wallet_id,
        amount: 1,
    };
    let signed = mint.sign(&wallet).unwrap();

    let mut bytes = signed.to_bytes().unwrap();
    let decoded = SignedInstruction::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.instruction, signed.instruction);

    let mut forged = decoded;
    forged.instruction = Instruction::MintTo {
        mint: token,
        owner: wallet_id,
        amount: 1_000_000,
    };
    let result = ledger.process(&forged);
    assert!(matches!(result, Err(LedgerError::InvalidSignature(_))));
    assert_eq!(ledger.get_mint(&token).unwrap().supply, 0);

    bytes.truncate(bytes.len() / 2);
    assert!(SignedInstruction::from_bytes(&bytes).is_err());
}
