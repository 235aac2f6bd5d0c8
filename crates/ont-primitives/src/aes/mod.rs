//! AES-256-GCM authenticated encryption.
//!
//! Ciphertexts are returned as `ciphertext || tag` with the 16-byte tag
//! appended, the layout wallet records store in base64.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::PrimitivesError;

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;
/// GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;
/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

fn cipher(key: &[u8], nonce: &[u8]) -> Result<Aes256Gcm, PrimitivesError> {
    if nonce.len() != NONCE_SIZE {
        return Err(PrimitivesError::EncryptionError(format!(
            "nonce must be {} bytes, got {}",
            NONCE_SIZE,
            nonce.len()
        )));
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| {
        PrimitivesError::EncryptionError(format!(
            "key must be {} bytes, got {}",
            KEY_SIZE,
            key.len()
        ))
    })
}

/// Encrypt and authenticate `plaintext` bound to `aad`.
///
/// # Returns
/// `ciphertext || tag`.
pub fn encrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, PrimitivesError> {
    cipher(key, nonce)?
        .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|e| PrimitivesError::EncryptionError(e.to_string()))
}

/// Verify and decrypt a `ciphertext || tag` blob.
///
/// # Returns
/// The plaintext, `DecryptionError` when the blob cannot hold a tag, or
/// `Authentication` when the tag does not verify (wrong key, nonce, AAD,
/// or a modified ciphertext).
pub fn decrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    sealed: &[u8],
) -> Result<Zeroizing<Vec<u8>>, PrimitivesError> {
    if sealed.len() < TAG_SIZE {
        return Err(PrimitivesError::DecryptionError(format!(
            "ciphertext of {} bytes is shorter than the {}-byte tag",
            sealed.len(),
            TAG_SIZE
        )));
    }
    let cipher = cipher(key, nonce)
        .map_err(|e| PrimitivesError::DecryptionError(e.to_string()))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: sealed, aad })
        .map(Zeroizing::new)
        .map_err(|_| PrimitivesError::Authentication)
}
