/// Error types for ABI operations.
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    /// Bytes or JSON that do not form a value of the requested shape.
    #[error("malformed value: {0}")]
    MalformedValue(String),

    #[error("nesting depth exceeds {0}")]
    TooDeep(usize),

    #[error("unknown ABI type: {0}")]
    UnknownType(String),

    #[error("argument mismatch: {0}")]
    ArgumentMismatch(String),

    #[error("invalid ABI file: {0}")]
    InvalidFile(#[from] serde_json::Error),

    #[error("script error: {0}")]
    Script(#[from] ont_script::ScriptError),
}

impl From<ont_primitives::PrimitivesError> for AbiError {
    fn from(e: ont_primitives::PrimitivesError) -> Self {
        AbiError::MalformedValue(e.to_string())
    }
}
