//! NeoVM script - a sequence of opcodes and data pushes.
//!
//! Used for verification programs, invocation scripts that call contract
//! methods, and contract code. `Script` wraps the bytes and offers the
//! push helpers transaction building relies on.

use std::fmt;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::num::int_to_bytes;
use crate::opcodes::*;
use crate::ScriptError;

/// A NeoVM script, represented as a byte vector newtype.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Disassemble into space-separated tokens.
    ///
    /// # Returns
    /// The ASM string, or an empty string when the script does not parse.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the script into chunks.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Append data bytes with the minimal push prefix.
    ///
    /// # Returns
    /// `Ok(())`, or `DataTooBig` beyond the PUSHDATA4 range.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append an integer push.
    ///
    /// -1 and 0..=16 use their dedicated opcodes; anything else is pushed
    /// as little-endian two's-complement bytes.
    pub fn append_int(&mut self, value: &BigInt) -> Result<(), ScriptError> {
        match value.to_i64() {
            Some(-1) => self.append_opcode(OP_PUSHM1),
            Some(0) => self.append_opcode(OP_PUSH0),
            Some(n @ 1..=16) => self.append_opcode(OP_PUSH1 + (n as u8) - 1),
            _ => return self.append_push_data(&int_to_bytes(value)),
        }
        Ok(())
    }

    /// Append PUSHT or PUSHF.
    pub fn append_bool(&mut self, value: bool) {
        self.append_opcode(if value { OP_PUSHT } else { OP_PUSHF });
    }

    pub fn append_opcode(&mut self, op: u8) {
        self.0.push(op);
    }

    /// Append bytes verbatim, without a push prefix.
    pub fn append_raw(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_asm())
    }
}
