//! Commands for the ledger CLI.

pub mod account;
pub mod address;
pub mod balance;
pub mod create_account;
pub mod init_mint;
pub mod keygen;
pub mod mint;
pub mod supply;
pub mod transfer;

use crate::config::CliConfig;
use crate::errors::CliError;
use crate::keypair;
use ed25519_dalek::Keypair;
use ledger::instruction::pubkey_of;
use ledger::locks::KeyLocks;
use ledger::{Instruction, Ledger, Outcome, Pubkey, RocksStore};
use std::path::PathBuf;
use tracing::debug;

/// An opened ledger plus the keypair that signs for this invocation.
pub struct Context {
    /// The ledger over the configured data directory
    pub ledger: Ledger<RocksStore>,
    keypair_path: PathBuf,
}

impl Context {
    /// Opens the ledger described by `config`.
    pub fn open(config: &CliConfig) -> Result<Self, CliError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let store = RocksStore::open(&config.data_dir)?;
        Ok(Self {
            ledger: Ledger::with_locks(store, KeyLocks::new(config.lock_stripes)),
            keypair_path: config.keypair.clone(),
        })
    }

    /// Loads the signing keypair.
    pub fn signer(&self) -> Result<Keypair, CliError> {
        keypair::load(&self.keypair_path)
    }

    /// Identity of the signing keypair.
    pub fn identity(&self) -> Result<Pubkey, CliError> {
        Ok(pubkey_of(&self.signer()?))
    }

    /// Signs `instruction` with the configured keypair and applies it.
    pub fn submit(&self, instruction: Instruction) -> Result<Outcome, CliError> {
        self.submit_signed_by(&self.signer()?, instruction)
    }

    /// Signs `instruction` with `keypair` and applies it.
    pub fn submit_signed_by(&self, keypair: &Keypair, instruction: Instruction) -> Result<Outcome, CliError> {
        debug!("Submitting {} signed by {}", instruction, pubkey_of(keypair));
        let signed = instruction.sign(keypair)?;
        Ok(self.ledger.process(&signed)?)
    }
}
