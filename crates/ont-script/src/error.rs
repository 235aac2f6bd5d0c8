/// Error types for script operations.
///
/// Covers chunk parsing, push encoding limits, verification programs and
/// address decoding.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds the PUSHDATA4 limit.
    #[error("data too big")]
    DataTooBig,

    /// Script is not a single-key verification program.
    #[error("not a verification program: {0}")]
    NotAProgram(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid address length {0}, want 20")]
    InvalidAddressLength(usize),

    #[error("unsupported address version {0:#04x}")]
    UnsupportedAddressVersion(u8),

    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("primitives error: {0}")]
    Primitives(#[from] ont_primitives::PrimitivesError),
}
