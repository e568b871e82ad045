//! Error types for the ledger CLI.

use ledger::types::PubkeyError;
use ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur in the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// The ledger rejected or failed an operation.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A file operation failed.
    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A key given on the command line could not be parsed.
    #[error("Invalid key: {0}")]
    InvalidKey(#[from] PubkeyError),

    /// A keypair file is missing, malformed or inconsistent.
    #[error("Keypair error: {0}")]
    Keypair(String),

    /// The ledger answered with an outcome the command did not ask for.
    #[error("Unexpected outcome: {0}")]
    UnexpectedOutcome(String),
}
