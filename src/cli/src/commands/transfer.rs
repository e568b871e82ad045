//! Transfer command for the ledger CLI.

use super::Context;
use crate::errors::CliError;
use ledger::{Balance, Instruction, Outcome, Pubkey, TransferReceipt};

/// Runs the transfer command from the signer's account to the account of `to`.
///
/// The destination account must have been created beforehand.
pub fn run(
    ctx: &Context,
    mint: &Pubkey,
    to: &Pubkey,
    amount: Balance,
) -> Result<TransferReceipt, CliError> {
    let source_owner = ctx.identity()?;

    match ctx.submit(Instruction::Transfer {
        mint: *mint,
        source_owner,
        destination_owner: *to,
        amount,
    })? {
        Outcome::Transferred(receipt) => Ok(receipt),
        other => Err(CliError::UnexpectedOutcome(other.to_string())),
    }
}
