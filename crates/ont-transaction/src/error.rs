/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction cannot be built (bad gas value, empty code, oversize
    /// payload, unencodable parameter).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("signing error: {0}")]
    SigningError(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    #[error("script error: {0}")]
    Script(#[from] ont_script::ScriptError),
    #[error("abi error: {0}")]
    Abi(#[from] ont_abi::AbiError),
    #[error("primitives error: {0}")]
    Primitives(#[from] ont_primitives::PrimitivesError),
}
