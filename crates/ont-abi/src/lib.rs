/// Ontology SDK - ABI values for contract calls and results.
///
/// `AbiValue` models call parameters and return values; `AbiType` describes
/// their shapes. The `codec` module reads and writes the NeoVM stack item
/// serialization, `result` interprets the hex leaves nodes return from
/// pre-executed calls, and `file` loads contract ABI definitions.

pub mod value;
pub mod codec;
pub mod result;
pub mod file;

mod error;
pub use error::AbiError;
pub use value::{AbiType, AbiValue};
pub use codec::{decode, encode};
pub use result::decode_result;
pub use file::{AbiEvent, AbiFile, AbiFunction, AbiParameter};

/// Deepest container nesting the codec accepts.
pub const MAX_DEPTH: usize = 16;
