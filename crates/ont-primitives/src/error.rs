/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, EC operations, key derivation, encryption,
/// encoding, and binary decoding.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),

    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// The AEAD tag did not verify: wrong password or tampered ciphertext.
    #[error("authentication failed: wrong password or corrupted ciphertext")]
    Authentication,

    #[error("encryption error: {0}")]
    EncryptionError(String),

    #[error("decryption error: {0}")]
    DecryptionError(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("non-canonical varint encoding for {0}")]
    NonCanonicalVarInt(u64),

    #[error("length prefix {0} exceeds remaining input")]
    LengthOverflow(u64),

    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
