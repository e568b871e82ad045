//! Supply command for the ledger CLI.

use super::Context;
use crate::errors::CliError;
use ledger::{Pubkey, SupplyAudit};
use tracing::warn;

/// Runs the supply command.
pub fn run(ctx: &Context, mint: &Pubkey) -> Result<SupplyAudit, CliError> {
    let audit = ctx.ledger.audit_supply(mint)?;
    if !audit.is_balanced() {
        warn!(
            "Supply of {} is {} but balances sum to {}",
            mint, audit.supply, audit.balances
        );
    }
    Ok(audit)
}
