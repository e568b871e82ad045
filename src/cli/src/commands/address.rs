//! Address command for the ledger CLI.

use crate::config::CliConfig;
use crate::errors::CliError;
use crate::keypair;
use ledger::{derive_account_address, Pubkey};

/// Runs the address command.
///
/// Returns the configured identity and, when `mint` is given, the derived
/// account address of that identity for the token.
pub fn run(config: &CliConfig, mint: Option<&Pubkey>) -> Result<(Pubkey, Option<Pubkey>), CliError> {
    let identity = keypair::identity(&config.keypair)?;
    let account = mint.map(|token| derive_account_address(token, &identity));
    Ok((identity, account))
}
