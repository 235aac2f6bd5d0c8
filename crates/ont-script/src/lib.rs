/// Ontology SDK - NeoVM script construction, parsing and addresses.
///
/// Provides the NeoVM opcode table, the `Script` byte container with push
/// helpers, chunk parsing, single-key verification programs and the
/// 20-byte `Address` with its base58check form.

pub mod opcodes;
pub mod num;
pub mod chunk;
pub mod script;
pub mod program;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::Address;
pub use chunk::ScriptChunk;
