//! Keygen command for the ledger CLI.

use crate::errors::CliError;
use crate::keypair;
use ledger::instruction::pubkey_of;
use ledger::Pubkey;
use std::path::Path;
use tracing::info;

/// Runs the keygen command, refusing to overwrite an existing file unless `force` is set.
pub fn run<P: AsRef<Path>>(path: P, force: bool) -> Result<Pubkey, CliError> {
    let path = path.as_ref();
    if path.exists() && !force {
        return Err(CliError::Keypair(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }

    let keypair = keypair::generate()?;
    keypair::save(path, &keypair)?;

    let identity = pubkey_of(&keypair);
    info!("Wrote keypair for {} to {}", identity, path.display());
    Ok(identity)
}
