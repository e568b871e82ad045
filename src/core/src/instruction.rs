//! Ledger instructions and their Ed25519 signing envelope.
//!
//! The signer of a [`SignedInstruction`] is the caller identity the ledger
//! checks against mint authorities and account owners.

use crate::errors::LedgerError;
use crate::types::{Balance, Pubkey, Signature, TokenId};
use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signer, Verifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One state transition request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Register a new token with zero supply.
    InitializeMint {
        /// The new token identity
        mint: TokenId,
        /// Display scale factor
        decimals: u8,
        /// The only identity allowed to mint
        mint_authority: Pubkey,
        /// Optional freeze authority
        freeze_authority: Option<Pubkey>,
    },

    /// Materialize the associated account of `owner` (no-op if present).
    CreateAccount {
        /// The token identity
        mint: TokenId,
        /// The owner of the account
        owner: Pubkey,
    },

    /// Mint new tokens into the associated account of `owner`.
    MintTo {
        /// The token identity
        mint: TokenId,
        /// The recipient owner
        owner: Pubkey,
        /// The amount to mint
        amount: Balance,
    },

    /// Move tokens between two associated accounts.
    Transfer {
        /// The token identity
        mint: TokenId,
        /// The owner of the debited account
        source_owner: Pubkey,
        /// The owner of the credited account
        destination_owner: Pubkey,
        /// The amount to move
        amount: Balance,
    },
}

impl Instruction {
    /// Canonical bytes covered by the signature.
    pub fn message_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Signs the instruction with `keypair`.
    pub fn sign(self, keypair: &Keypair) -> Result<SignedInstruction, LedgerError> {
        let message = self.message_bytes()?;
        let signature = keypair.sign(&message);
        Ok(SignedInstruction {
            instruction: self,
            signer: pubkey_of(keypair),
            signature: Signature(signature.to_bytes()),
        })
    }

    /// Operation name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Instruction::InitializeMint { .. } => "initialize_mint",
            Instruction::CreateAccount { .. } => "create_account",
            Instruction::MintTo { .. } => "mint",
            Instruction::Transfer { .. } => "transfer",
        }
    }
}

/// An instruction together with its signer and signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInstruction {
    /// The signed instruction
    pub instruction: Instruction,
    /// The signer's public key
    pub signer: Pubkey,
    /// Signature over [`Instruction::message_bytes`]
    pub signature: Signature,
}

impl SignedInstruction {
    /// Checks the signature against the signer's key.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let public_key = PublicKey::from_bytes(self.signer.as_bytes())
            .map_err(|e| LedgerError::InvalidSignature(format!("invalid signer key: {}", e)))?;
        let signature = ed25519_dalek::Signature::try_from(&self.signature.0[..])
            .map_err(|e| LedgerError::InvalidSignature(format!("malformed signature: {}", e)))?;

        let message = self.instruction.message_bytes()?;
        public_key
            .verify(&message, &signature)
            .map_err(|_| LedgerError::InvalidSignature(format!("verification failed for signer {}", self.signer)))
    }

    /// Encodes the envelope for transport or storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decodes an envelope produced by [`SignedInstruction::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
    }
}

/// Returns the identity of a keypair.
pub fn pubkey_of(keypair: &Keypair) -> Pubkey {
    Pubkey::new(keypair.public.to_bytes())
}

/// Builds a keypair from a 32-byte secret seed.
pub fn keypair_from_seed(seed: &[u8; 32]) -> Result<Keypair, LedgerError> {
    let secret = SecretKey::from_bytes(seed)
        .map_err(|e| LedgerError::InvalidSignature(format!("invalid secret key: {}", e)))?;
    let public = PublicKey::from(&secret);
    Ok(Keypair { secret, public })
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::InitializeMint { mint, decimals, mint_authority, .. } => write!(
                f,
                "InitializeMint {{ mint: {}, decimals: {}, authority: {} }}",
                mint, decimals, mint_authority
            ),
            Instruction::CreateAccount { mint, owner } => {
                write!(f, "CreateAccount {{ mint: {}, owner: {} }}", mint, owner)
            }
            Instruction::MintTo { mint, owner, amount } => write!(
                f,
                "MintTo {{ mint: {}, owner: {}, amount: {} }}",
                mint, owner, amount
            ),
            Instruction::Transfer { mint, source_owner, destination_owner, amount } => write!(
                f,
                "Transfer {{ mint: {}, from: {}, to: {}, amount: {} }}",
                mint, source_owner, destination_owner, amount
            ),
        }
    }
}
