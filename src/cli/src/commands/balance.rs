//! Balance command for the ledger CLI.

use super::Context;
use crate::errors::CliError;
use ledger::{derive_account_address, Pubkey};
use tracing::debug;

/// Runs the balance command for `owner`, or for the signer if omitted.
pub fn run(ctx: &Context, mint: &Pubkey, owner: Option<Pubkey>) -> Result<String, CliError> {
    let owner = match owner {
        Some(owner) => owner,
        None => ctx.identity()?,
    };
    let address = derive_account_address(mint, &owner);
    debug!("Getting balance of {} for owner {}", address, owner);

    Ok(ctx.ledger.get_balance(&address)?)
}
