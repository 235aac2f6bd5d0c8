//! Hash function primitives.
//!
//! SHA-256 and double SHA-256 back transaction hashes and base58 checksums;
//! Hash160 (RIPEMD-160 over SHA-256) turns verification programs and
//! contract code into 20-byte addresses.

use sha2::{Digest, Sha256};
use ripemd::Ripemd160;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Transaction hashes and base58check checksums use this digest.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// # Arguments
/// * `data` - A verification program or contract code.
///
/// # Returns
/// The 20-byte digest used as an account or contract address.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}
