//! Keypair files for signing instructions.
//!
//! A keypair file contains 64 bytes: the 32-byte Ed25519 secret key seed
//! followed by the 32 bytes of the corresponding public key.

use crate::errors::CliError;
use ed25519_dalek::{Keypair, PublicKey, SecretKey};
use ledger::instruction::{keypair_from_seed, pubkey_of};
use ledger::Pubkey;
use rand::Rng;
use std::fs;
use std::path::Path;

/// Creates a keypair from a fresh random seed.
pub fn generate() -> Result<Keypair, CliError> {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill(&mut seed);
    Ok(keypair_from_seed(&seed)?)
}

/// Writes a keypair file, creating parent directories as needed.
pub fn save<P: AsRef<Path>>(path: P, keypair: &Keypair) -> Result<(), CliError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut raw = Vec::with_capacity(64);
    raw.extend_from_slice(&keypair.secret.to_bytes());
    raw.extend_from_slice(&keypair.public.to_bytes());
    fs::write(path, raw)?;
    Ok(())
}

/// Reads and validates a keypair file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Keypair, CliError> {
    let path = path.as_ref();
    let raw = fs::read(path).map_err(|e| {
        CliError::Keypair(format!("Failed to read keypair file {}: {}", path.display(), e))
    })?;

    if raw.len() != 64 {
        return Err(CliError::Keypair(format!(
            "Invalid keypair file size for {}: expected 64 bytes, got {}",
            path.display(),
            raw.len()
        )));
    }

    let secret = SecretKey::from_bytes(&raw[..32])
        .map_err(|e| CliError::Keypair(format!("Invalid secret key in {}: {}", path.display(), e)))?;
    let public = PublicKey::from(&secret);

    if public.as_bytes() != &raw[32..64] {
        return Err(CliError::Keypair(format!(
            "Public key mismatch in {}",
            path.display()
        )));
    }

    Ok(Keypair { secret, public })
}

/// Returns the identity stored in a keypair file.
pub fn identity<P: AsRef<Path>>(path: P) -> Result<Pubkey, CliError> {
    Ok(pubkey_of(&load(path)?))
}
