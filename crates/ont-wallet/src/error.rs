use ont_primitives::PrimitivesError;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// scrypt parameters are unusable.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
    /// The password is wrong or the record was tampered with.
    #[error("authentication failed: wrong password or corrupted key")]
    Authentication,
    /// The key decrypted but does not belong to the account.
    #[error("decryption failed: {0}")]
    Decryption(String),
    /// The account record itself is malformed.
    #[error("invalid account: {0}")]
    InvalidAccount(String),
    #[error("no account with address {0}")]
    AccountNotFound(String),
    #[error("invalid wallet JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("script error: {0}")]
    Script(#[from] ont_script::ScriptError),
    #[error("primitives error: {0}")]
    Primitives(PrimitivesError),
}

impl From<PrimitivesError> for WalletError {
    fn from(e: PrimitivesError) -> Self {
        match e {
            PrimitivesError::KeyDerivation(msg) => WalletError::KeyDerivation(msg),
            PrimitivesError::Authentication => WalletError::Authentication,
            PrimitivesError::DecryptionError(msg) => WalletError::Decryption(msg),
            other => WalletError::Primitives(other),
        }
    }
}
