//! State-transition core for the token ledger.
//!
//! This crate provides the token registry, the per-owner account ledger, and
//! the atomic mint and transfer operations built on them, together with the
//! storage boundary they commit through.

pub mod accounts;
pub mod address;
pub mod db;
pub mod errors;
pub mod instruction;
pub mod locks;
pub mod metrics;
pub mod pack;
pub mod processor;
pub mod registry;
pub mod state;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use address::derive_account_address;
pub use db::RocksStore;
pub use errors::LedgerError;
pub use instruction::{Instruction, SignedInstruction};
pub use processor::{Ledger, MintReceipt, Outcome, SupplyAudit, TransferReceipt};
pub use storage::{LedgerStore, MemoryStore};
pub use types::{AccountRecord, Balance, MintRecord, Pubkey, TokenId};
