//! Fixed-layout encoding of ledger records at the storage boundary.
//!
//! Every record starts with a one-byte tag so that a mint record can never be
//! decoded as an account record or the other way round. Integers are little
//! endian.
//!
//! | Record  | Layout                                                              | Size |
//! |---------|---------------------------------------------------------------------|------|
//! | Mint    | tag, mint_authority, supply (u128), decimals, freeze tag, freeze key | 83   |
//! | Account | tag, mint, owner, amount (u128)                                      | 81   |

use crate::errors::LedgerError;
use crate::types::{AccountRecord, MintRecord, Pubkey};
use byteorder::{ByteOrder, LittleEndian};

/// Size of an encoded [`MintRecord`].
pub const MINT_LEN: usize = 83;

/// Size of an encoded [`AccountRecord`].
pub const ACCOUNT_LEN: usize = 81;

const MINT_TAG: u8 = 1;
const ACCOUNT_TAG: u8 = 2;

/// Records with a fixed byte layout.
pub trait Pack: Sized {
    /// Encoded length in bytes.
    const LEN: usize;

    /// Writes the record into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than `LEN` bytes. Use [`Pack::pack`] unless
    /// the buffer size is already known.
    fn pack_into_slice(&self, dst: &mut [u8]);

    /// Reads a record from `src` without checking its length.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `LEN` bytes. Bytes read from storage
    /// must go through [`Pack::unpack`], which reports a length mismatch as
    /// `InvalidAccountData` instead.
    fn unpack_from_slice(src: &[u8]) -> Result<Self, LedgerError>;

    /// Encodes the record into a fresh buffer.
    fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        self.pack_into_slice(&mut buf);
        buf
    }

    /// Decodes a record, checking the length first.
    fn unpack(src: &[u8]) -> Result<Self, LedgerError> {
        if src.len() != Self::LEN {
            return Err(LedgerError::InvalidAccountData(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                src.len()
            )));
        }
        Self::unpack_from_slice(src)
    }
}

fn read_key(src: &[u8]) -> Pubkey {
    let mut key = [0u8; 32];
    key.copy_from_slice(&src[..32]);
    Pubkey::new(key)
}

fn check_tag(found: u8, expected: u8, what: &str) -> Result<(), LedgerError> {
    if found != expected {
        return Err(LedgerError::InvalidAccountData(format!(
            "{} record tag mismatch: expected {}, got {}",
            what, expected, found
        )));
    }
    Ok(())
}

impl Pack for MintRecord {
    const LEN: usize = MINT_LEN;

    fn pack_into_slice(&self, dst: &mut [u8]) {
        dst[0] = MINT_TAG;
        dst[1..33].copy_from_slice(self.mint_authority.as_bytes());
        LittleEndian::write_u128(&mut dst[33..49], self.supply);
        dst[49] = self.decimals;
        match &self.freeze_authority {
            Some(key) => {
                dst[50] = 1;
                dst[51..83].copy_from_slice(key.as_bytes());
            }
            None => {
                dst[50] = 0;
                dst[51..83].fill(0);
            }
        }
    }

    fn unpack_from_slice(src: &[u8]) -> Result<Self, LedgerError> {
        check_tag(src[0], MINT_TAG, "mint")?;
        let freeze_authority = match src[50] {
            0 => None,
            1 => Some(read_key(&src[51..83])),
            other => {
                return Err(LedgerError::InvalidAccountData(format!(
                    "invalid freeze authority option tag: {}",
                    other
                )))
            }
        };

        Ok(MintRecord {
            mint_authority: read_key(&src[1..33]),
            supply: LittleEndian::read_u128(&src[33..49]),
            decimals: src[49],
            freeze_authority,
        })
    }
}

impl Pack for AccountRecord {
    const LEN: usize = ACCOUNT_LEN;

    fn pack_into_slice(&self, dst: &mut [u8]) {
        dst[0] = ACCOUNT_TAG;
        dst[1..33].copy_from_slice(self.mint.as_bytes());
        dst[33..65].copy_from_slice(self.owner.as_bytes());
        LittleEndian::write_u128(&mut dst[65..81], self.amount);
    }

    fn unpack_from_slice(src: &[u8]) -> Result<Self, LedgerError> {
        check_tag(src[0], ACCOUNT_TAG, "account")?;
        Ok(AccountRecord {
            mint: read_key(&src[1..33]),
            owner: read_key(&src[33..65]),
            amount: LittleEndian::read_u128(&src[65..81]),
        })
    }
}
