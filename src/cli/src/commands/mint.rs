//! Mint command for the ledger CLI.

use super::Context;
use crate::errors::CliError;
use ledger::{Balance, Instruction, MintReceipt, Outcome, Pubkey};

/// Runs the mint command, crediting `to` or the signer's own account.
pub fn run(
    ctx: &Context,
    mint: &Pubkey,
    to: Option<Pubkey>,
    amount: Balance,
) -> Result<MintReceipt, CliError> {
    let owner = match to {
        Some(owner) => owner,
        None => ctx.identity()?,
    };

    match ctx.submit(Instruction::MintTo {
        mint: *mint,
        owner,
        amount,
    })? {
        Outcome::Minted(receipt) => Ok(receipt),
        other => Err(CliError::UnexpectedOutcome(other.to_string())),
    }
}
