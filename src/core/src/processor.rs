//! Atomic application of ledger operations.
//!
//! Each public operation is one atomic unit: it locks the keys it touches,
//! stages every read and write in a [`Transaction`], and commits the resulting
//! write set in a single call to the store. A rejected operation returns before
//! the commit, so it never changes state.

use crate::accounts;
use crate::address::derive_account_address;
use crate::errors::LedgerError;
use crate::instruction::{Instruction, SignedInstruction};
use crate::locks::KeyLocks;
use crate::metrics;
use crate::registry;
use crate::state::{StateKey, Transaction};
use crate::storage::LedgerStore;
use crate::types::{AccountRecord, Balance, MintRecord, ParsedTokenAccount, Pubkey, TokenAmount, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Result of a successful mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    /// The credited account address
    pub account: Pubkey,
    /// Balance of the credited account after the mint
    pub balance: Balance,
    /// Total supply after the mint
    pub supply: Balance,
}

/// Result of a successful transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// The debited account address
    pub source: Pubkey,
    /// The credited account address
    pub destination: Pubkey,
    /// Balance of the debited account after the transfer
    pub source_balance: Balance,
    /// Balance of the credited account after the transfer
    pub destination_balance: Balance,
}

/// Result of processing a signed instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A token was registered
    MintInitialized(MintRecord),
    /// An account exists (created now or before)
    AccountReady {
        /// The derived address
        address: Pubkey,
        /// The record at that address
        account: AccountRecord,
    },
    /// Tokens were minted
    Minted(MintReceipt),
    /// Tokens were transferred
    Transferred(TransferReceipt),
}

/// Supply and balances of one token, read from a single snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyAudit {
    /// Total supply recorded in the registry
    pub supply: Balance,
    /// Sum of all account balances
    pub balances: Balance,
    /// Number of accounts holding the token
    pub accounts: usize,
}

impl SupplyAudit {
    /// Returns true when supply equals the sum of balances.
    pub fn is_balanced(&self) -> bool {
        self.supply == self.balances
    }
}

/// The token ledger over a store.
pub struct Ledger<S: LedgerStore> {
    store: S,
    locks: KeyLocks,
}

impl<S: LedgerStore> Ledger<S> {
    /// Creates a ledger with the default lock table.
    pub fn new(store: S) -> Self {
        Self::with_locks(store, KeyLocks::default())
    }

    /// Creates a ledger with a custom lock table.
    pub fn with_locks(store: S, locks: KeyLocks) -> Self {
        Self { store, locks }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn run<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce() -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let timer = metrics::OPERATION_TIME.start_timer();
        let result = apply();
        timer.observe_duration();

        metrics::observe(operation, &result);
        if let Err(e) = &result {
            warn!("{} rejected: {}", operation, e);
        }
        result
    }

    /// Registers a new token.
    pub fn initialize_mint(
        &self,
        token: &TokenId,
        mint_authority: &Pubkey,
        freeze_authority: Option<Pubkey>,
        decimals: u8,
    ) -> Result<MintRecord, LedgerError> {
        self.run("initialize_mint", || {
            let _guard = self.locks.acquire(&[StateKey::Mint(*token)]);
            let mut txn = Transaction::new(&self.store);

            let record = registry::initialize(&mut txn, token, mint_authority, freeze_authority, decimals)?;
            self.store.commit(txn.into_write_set())?;

            info!("Initialized token {} with authority {}", token, mint_authority);
            Ok(record)
        })
    }

    /// Returns the account of `owner` for `token`, creating it if absent.
    ///
    /// Calling this any number of times, concurrently or not, yields one
    /// record and never resets its balance.
    pub fn ensure_account(&self, token: &TokenId, owner: &Pubkey) -> Result<AccountRecord, LedgerError> {
        self.run("create_account", || {
            let address = derive_account_address(token, owner);
            let _guard = self.locks.acquire(&[StateKey::Account(address)]);
            let mut txn = Transaction::new(&self.store);

            let (record, created) = accounts::ensure_account(&mut txn, token, owner)?;
            if created {
                self.store.commit(txn.into_write_set())?;
                info!("Created account {} for owner {}", address, owner);
            } else {
                debug!("Account {} already exists", address);
            }
            Ok(record)
        })
    }

    /// Mints `amount` into the account of `destination_owner`.
    ///
    /// Only the token's mint authority may call this. The destination account
    /// is created if needed, in the same atomic unit as the supply increase.
    pub fn mint(
        &self,
        token: &TokenId,
        destination_owner: &Pubkey,
        amount: Balance,
        caller: &Pubkey,
    ) -> Result<MintReceipt, LedgerError> {
        self.run("mint", || {
            let address = derive_account_address(token, destination_owner);
            let _guard = self
                .locks
                .acquire(&[StateKey::Mint(*token), StateKey::Account(address)]);
            debug!("Mint requested: {} of {} to {} by {}", amount, token, destination_owner, caller);

            let mut txn = Transaction::new(&self.store);
            let supply = registry::record_mint(&mut txn, token, caller, amount)?;
            debug!("Mint authorized for {}", caller);

            let (_, created) = accounts::ensure_account(&mut txn, token, destination_owner)?;
            if created {
                debug!("Materializing account {} for {}", address, destination_owner);
            }
            let balance = accounts::credit(&mut txn, token, destination_owner, amount)?;

            self.store.commit(txn.into_write_set())?;
            info!(
                "Minted {} of {} to {}: balance {}, supply {}",
                amount, token, address, balance, supply
            );

            Ok(MintReceipt {
                account: address,
                balance,
                supply,
            })
        })
    }

    /// Moves `amount` from the account of `source_owner` to the account of
    /// `destination_owner`.
    ///
    /// The signer must own the source account. The destination account must
    /// already exist; create it with [`Ledger::ensure_account`] first.
    pub fn transfer(
        &self,
        token: &TokenId,
        source_owner: &Pubkey,
        destination_owner: &Pubkey,
        amount: Balance,
        signer: &Pubkey,
    ) -> Result<TransferReceipt, LedgerError> {
        self.run("transfer", || {
            let source = derive_account_address(token, source_owner);
            let destination = derive_account_address(token, destination_owner);
            let _guard = self
                .locks
                .acquire(&[StateKey::Account(source), StateKey::Account(destination)]);
            debug!("Transfer requested: {} of {} from {} to {}", amount, token, source, destination);

            let mut txn = Transaction::new(&self.store);
            let record = accounts::load(&txn, token, source_owner)?;
            if record.owner != *signer {
                return Err(LedgerError::Unauthorized(format!(
                    "only the owner can spend from {}: expected {}, got {}",
                    source, record.owner, signer
                )));
            }

            accounts::load(&txn, token, destination_owner).map_err(|e| match e {
                LedgerError::NotFound(what) => LedgerError::NotFound(format!(
                    "destination {}; create it before transferring",
                    what
                )),
                other => other,
            })?;
            debug!("Transfer validated for signer {}", signer);

            accounts::debit(&mut txn, token, source_owner, amount)?;
            accounts::credit(&mut txn, token, destination_owner, amount)?;

            // Read back through the overlay so a self-transfer reports its net effect.
            let source_balance = accounts::load(&txn, token, source_owner)?.amount;
            let destination_balance = accounts::load(&txn, token, destination_owner)?.amount;

            self.store.commit(txn.into_write_set())?;
            info!(
                "Transferred {} of {} from {} to {}",
                amount, token, source, destination
            );

            Ok(TransferReceipt {
                source,
                destination,
                source_balance,
                destination_balance,
            })
        })
    }

    /// Verifies and applies a signed instruction, using its signer as caller.
    pub fn process(&self, signed: &SignedInstruction) -> Result<Outcome, LedgerError> {
        debug!("Processing {} signed by {}", signed.instruction, signed.signer);
        if let Err(e) = signed.verify().and_then(|_| check_signer(signed)) {
            let rejected: Result<(), LedgerError> = Err(e.clone());
            metrics::observe(signed.instruction.kind(), &rejected);
            warn!("{} rejected: {}", signed.instruction.kind(), e);
            return Err(e);
        }

        let caller = &signed.signer;
        match &signed.instruction {
            Instruction::InitializeMint {
                mint,
                decimals,
                mint_authority,
                freeze_authority,
            } => self
                .initialize_mint(mint, mint_authority, *freeze_authority, *decimals)
                .map(Outcome::MintInitialized),
            Instruction::CreateAccount { mint, owner } => {
                self.ensure_account(mint, owner).map(|account| Outcome::AccountReady {
                    address: derive_account_address(mint, owner),
                    account,
                })
            }
            Instruction::MintTo { mint, owner, amount } => {
                self.mint(mint, owner, *amount, caller).map(Outcome::Minted)
            }
            Instruction::Transfer {
                mint,
                source_owner,
                destination_owner,
                amount,
            } => self
                .transfer(mint, source_owner, destination_owner, *amount, caller)
                .map(Outcome::Transferred),
        }
    }

    /// Reads the registry entry of a token.
    pub fn get_mint(&self, token: &TokenId) -> Result<MintRecord, LedgerError> {
        self.store
            .get_mint(token)?
            .ok_or_else(|| LedgerError::NotFound(format!("token {}", token)))
    }

    /// Reads an account record by address.
    pub fn get_account(&self, address: &Pubkey) -> Result<AccountRecord, LedgerError> {
        self.store
            .get_account(address)?
            .ok_or_else(|| LedgerError::NotFound(format!("account {}", address)))
    }

    /// Reads the account of `owner` for `token`.
    pub fn account_of(&self, token: &TokenId, owner: &Pubkey) -> Result<AccountRecord, LedgerError> {
        self.get_account(&derive_account_address(token, owner))
    }

    /// Returns the balance at `address` as a decimal string.
    pub fn get_balance(&self, address: &Pubkey) -> Result<String, LedgerError> {
        Ok(self.get_account(address)?.amount.to_string())
    }

    /// Returns the parsed view of the account at `address`.
    pub fn parsed_account(&self, address: &Pubkey) -> Result<ParsedTokenAccount, LedgerError> {
        let record = self.get_account(address)?;
        let mint = self.get_mint(&record.mint)?;
        Ok(ParsedTokenAccount {
            address: address.to_string(),
            mint: record.mint.to_string(),
            owner: record.owner.to_string(),
            token_amount: TokenAmount::new(record.amount, mint.decimals),
        })
    }

    /// Compares a token's supply against the sum of its balances.
    pub fn audit_supply(&self, token: &TokenId) -> Result<SupplyAudit, LedgerError> {
        let snapshot = self.store.token_snapshot(token)?;
        let mint = snapshot
            .mint
            .ok_or_else(|| LedgerError::NotFound(format!("token {}", token)))?;

        let mut balances: Balance = 0;
        for (_, record) in &snapshot.accounts {
            balances = balances.checked_add(record.amount).ok_or(LedgerError::Overflow {
                current: balances,
                amount: record.amount,
            })?;
        }

        Ok(SupplyAudit {
            supply: mint.supply,
            balances,
            accounts: snapshot.accounts.len(),
        })
    }
}

/// A token identity is claimed by signing its registration with the token's own key.
fn check_signer(signed: &SignedInstruction) -> Result<(), LedgerError> {
    match &signed.instruction {
        Instruction::InitializeMint { mint, .. } if *mint != signed.signer => {
            Err(LedgerError::Unauthorized(format!(
                "token {} must be registered by its own key, got {}",
                mint, signed.signer
            )))
        }
        _ => Ok(()),
    }
}

impl<S: LedgerStore> fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("lock_stripes", &self.locks.stripe_count())
            .finish()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::MintInitialized(record) => write!(f, "initialized {}", record),
            Outcome::AccountReady { address, account } => {
                write!(f, "account {} ready: {}", address, account)
            }
            Outcome::Minted(receipt) => write!(
                f,
                "minted into {}: balance {}, supply {}",
                receipt.account, receipt.balance, receipt.supply
            ),
            Outcome::Transferred(receipt) => write!(
                f,
                "transferred {} -> {}: balances {} / {}",
                receipt.source, receipt.destination, receipt.source_balance, receipt.destination_balance
            ),
        }
    }
}
