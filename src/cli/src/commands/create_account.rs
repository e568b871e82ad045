//! Create-account command for the ledger CLI.

use super::Context;
use crate::errors::CliError;
use ledger::{AccountRecord, Instruction, Outcome, Pubkey};

/// Runs the create-account command for `owner`, or for the signer if omitted.
pub fn run(
    ctx: &Context,
    mint: &Pubkey,
    owner: Option<Pubkey>,
) -> Result<(Pubkey, AccountRecord), CliError> {
    let owner = match owner {
        Some(owner) => owner,
        None => ctx.identity()?,
    };

    match ctx.submit(Instruction::CreateAccount { mint: *mint, owner })? {
        Outcome::AccountReady { address, account } => Ok((address, account)),
        other => Err(CliError::UnexpectedOutcome(other.to_string())),
    }
}
