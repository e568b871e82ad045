//! Derivation of associated account addresses.

use crate::types::{Pubkey, TokenId};
use sha2::{Digest, Sha256};

/// Domain separator mixed into every derived address.
const ASSOCIATED_ACCOUNT_SEED: &[u8] = b"associated-token-account";

/// Computes the canonical account address for a (token, owner) pair.
///
/// The result is a pure function of its inputs, so any party can locate an
/// owner's account for a token without a lookup.
pub fn derive_account_address(token: &TokenId, owner: &Pubkey) -> Pubkey {
    let mut hasher = Sha256::new();
    hasher.update(ASSOCIATED_ACCOUNT_SEED);
    hasher.update(owner.as_bytes());
    hasher.update(token.as_bytes());

    let result = hasher.finalize();
    let mut address = [0u8; 32];
    address.copy_from_slice(&result);
    Pubkey::new(address)
}
