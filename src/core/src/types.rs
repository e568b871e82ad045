//! Core types for the token ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Token balance and supply, represented as a 128-bit unsigned integer.
pub type Balance = u128;

/// A 32-byte identity. Token identities, owner identities and derived account
/// addresses all share this representation.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pubkey(pub [u8; 32]);

/// Identity of one fungible token class.
pub type TokenId = Pubkey;

/// Error returned when parsing a [`Pubkey`] from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PubkeyError {
    /// The input is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    /// The decoded input is not 32 bytes long.
    #[error("invalid length: {0} (expected 32 bytes)")]
    InvalidLength(usize),
}

impl Pubkey {
    /// Creates a key from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Builds a key from a slice, which must be exactly 32 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, PubkeyError> {
        if bytes.len() != 32 {
            return Err(PubkeyError::InvalidLength(bytes.len()));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", hex::encode(self.0))
    }
}

impl FromStr for Pubkey {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| PubkeyError::InvalidHex(e.to_string()))?;
        Self::try_from_slice(&bytes)
    }
}

/// Ed25519 signature, represented as a 64-byte array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl serde::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SignatureVisitor;

        impl<'de> serde::de::Visitor<'de> for SignatureVisitor {
            type Value = Signature;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 64-byte signature")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.len() != 64 {
                    return Err(E::custom(format!(
                        "invalid signature length: {} (expected 64)",
                        v.len()
                    )));
                }

                let mut signature = [0u8; 64];
                signature.copy_from_slice(v);
                Ok(Signature(signature))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut signature = [0u8; 64];
                for (i, byte) in signature.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(Signature(signature))
            }
        }

        deserializer.deserialize_bytes(SignatureVisitor)
    }
}

/// Registry entry for one token: supply and the authority allowed to grow it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    /// The only identity permitted to mint
    pub mint_authority: Pubkey,
    /// Sum of every account balance for this token
    pub supply: Balance,
    /// Display scale factor
    pub decimals: u8,
    /// Optional freeze authority recorded at initialization
    pub freeze_authority: Option<Pubkey>,
}

impl MintRecord {
    /// Creates a registry entry with zero supply.
    pub fn new(mint_authority: Pubkey, decimals: u8, freeze_authority: Option<Pubkey>) -> Self {
        Self {
            mint_authority,
            supply: 0,
            decimals,
            freeze_authority,
        }
    }
}

/// Balance record for one (token, owner) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// The token this record holds
    pub mint: TokenId,
    /// The identity allowed to spend from this record
    pub owner: Pubkey,
    /// The current balance
    pub amount: Balance,
}

impl AccountRecord {
    /// Creates a record with zero balance.
    pub fn new_empty(mint: TokenId, owner: Pubkey) -> Self {
        Self {
            mint,
            owner,
            amount: 0,
        }
    }
}

/// Amount view reported to external verifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    /// Raw integer amount as a decimal string
    pub amount: String,
    /// Scale factor of the token
    pub decimals: u8,
    /// Amount with the scale factor applied
    pub ui_amount_string: String,
}

impl TokenAmount {
    /// Builds the view for a raw amount and a scale factor.
    pub fn new(amount: Balance, decimals: u8) -> Self {
        Self {
            amount: amount.to_string(),
            decimals,
            ui_amount_string: format_ui_amount(amount, decimals),
        }
    }
}

/// Renders `amount / 10^decimals` without going through floating point.
fn format_ui_amount(amount: Balance, decimals: u8) -> String {
    let digits = amount.to_string();
    let scale = decimals as usize;
    if scale == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (whole, fraction) = padded.split_at(padded.len() - scale);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parsed account view, shaped like the account info a node reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTokenAccount {
    /// Derived account address
    pub address: String,
    /// Token identity
    pub mint: String,
    /// Owner identity
    pub owner: String,
    /// Balance view
    pub token_amount: TokenAmount,
}

impl fmt::Display for MintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mint {{ authority: {}, supply: {}, decimals: {} }}",
            self.mint_authority, self.supply, self.decimals
        )
    }
}

impl fmt::Display for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {{ mint: {}, owner: {}, amount: {} }}",
            self.mint, self.owner, self.amount
        )
    }
}
