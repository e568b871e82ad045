//! Init-mint command for the ledger CLI.

use super::Context;
use crate::errors::CliError;
use crate::keypair;
use ledger::instruction::pubkey_of;
use ledger::{Instruction, MintRecord, Outcome, Pubkey};
use std::path::Path;
use tracing::info;

/// Runs the init-mint command.
///
/// The token identity is the public key of `mint_keypair`, or of a freshly
/// generated keypair when none is given; that keypair signs the registration.
/// The configured signer becomes the mint authority.
pub fn run(
    ctx: &Context,
    mint_keypair: Option<&Path>,
    decimals: u8,
    freeze_authority: Option<Pubkey>,
) -> Result<(Pubkey, MintRecord), CliError> {
    let mint_key = match mint_keypair {
        Some(path) => keypair::load(path)?,
        None => keypair::generate()?,
    };
    let mint = pubkey_of(&mint_key);
    let authority = ctx.identity()?;
    info!("Initializing token {} with authority {}", mint, authority);

    let instruction = Instruction::InitializeMint {
        mint,
        decimals,
        mint_authority: authority,
        freeze_authority,
    };
    match ctx.submit_signed_by(&mint_key, instruction)? {
        Outcome::MintInitialized(record) => Ok((mint, record)),
        other => Err(CliError::UnexpectedOutcome(other.to_string())),
    }
}
