//! Error types for the ledger crate.

use crate::types::Balance;
use thiserror::Error;

/// Errors that can occur while applying or querying ledger state.
///
/// Every rejection is raised before anything is committed, so a caller that
/// receives one of these can fix the precondition and retry safely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller or signer is not the identity the operation requires.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The source account cannot cover the requested debit.
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// The requested amount
        required: Balance,
        /// The balance held by the account
        available: Balance,
    },

    /// Adding the amount would leave the representable range.
    #[error("Overflow: {current} + {amount} exceeds the representable range")]
    Overflow {
        /// The value before the operation
        current: Balance,
        /// The amount being added
        amount: Balance,
    },

    /// A token registry was initialized twice.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A registry or account the operation depends on is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A signed instruction failed verification.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// A persisted record could not be decoded, or does not match its key.
    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Short, stable label used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            LedgerError::Unauthorized(_) => "unauthorized",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::Overflow { .. } => "overflow",
            LedgerError::AlreadyExists(_) => "already_exists",
            LedgerError::NotFound(_) => "not_found",
            LedgerError::InvalidSignature(_) => "invalid_signature",
            LedgerError::InvalidAccountData(_) => "invalid_account_data",
            LedgerError::Storage(_) => "storage",
            LedgerError::Serialization(_) => "serialization",
        }
    }
}
