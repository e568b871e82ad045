//! Account command for the ledger CLI.

use super::Context;
use crate::errors::CliError;
use ledger::types::ParsedTokenAccount;
use ledger::Pubkey;

/// Runs the account command.
pub fn run(ctx: &Context, address: &Pubkey) -> Result<ParsedTokenAccount, CliError> {
    Ok(ctx.ledger.parsed_account(address)?)
}
