//! Command line client for the token ledger.

pub mod commands;
pub mod config;
pub mod errors;
pub mod keypair;

// Re-export commonly used types and functions
pub use commands::Context;
pub use config::CliConfig;
pub use errors::CliError;
