//! Script chunk parsing and push encoding.
//!
//! A chunk is either an opcode or a data push with its bytes. NeoVM pushes
//! use the same length prefixes as other stack machines: a direct length
//! byte up to 75, then PUSHDATA1/2/4. A few control opcodes carry inline
//! operands: jumps and CALL a 2-byte offset, APPCALL and TAILCALL a
//! 20-byte contract hash, SYSCALL a length-prefixed service name.

use ont_primitives::util::ByteReader;

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The pushed bytes, or the inline operand of a control opcode.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Whether this chunk pushes data onto the stack.
    pub fn is_push(&self) -> bool {
        self.op <= OP_PUSHDATA4 && self.data.is_some()
    }

    /// Data pushes render as hex, opcodes by mnemonic followed by any
    /// operand in hex.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) if self.is_push() => hex::encode(data),
            Some(operand) => format!("{} {}", opcode_to_string(self.op), hex::encode(operand)),
            None => opcode_to_string(self.op),
        }
    }
}

/// Decode raw script bytes into chunks.
///
/// # Returns
/// The parsed chunks, or `DataTooSmall` if a push or operand runs past
/// the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut reader = ByteReader::new(bytes);
    let mut chunks = Vec::new();
    let eof = |_| ScriptError::DataTooSmall;

    while !reader.is_empty() {
        let op = reader.read_u8().map_err(eof)?;
        let len = match op {
            OP_PUSHBYTES1..=OP_PUSHBYTES75 => Some(op as usize),
            OP_PUSHDATA1 => Some(reader.read_u8().map_err(eof)? as usize),
            OP_PUSHDATA2 => Some(reader.read_u16_le().map_err(eof)? as usize),
            OP_PUSHDATA4 => Some(reader.read_u32_le().map_err(eof)? as usize),
            _ => None,
        };
        let len = match op {
            OP_JMP | OP_JMPIF | OP_JMPIFNOT | OP_CALL => Some(2),
            OP_APPCALL | OP_TAILCALL => Some(20),
            OP_SYSCALL => Some(reader.read_varint().map_err(eof)?.value() as usize),
            _ => len,
        };
        let data = match len {
            Some(n) => Some(reader.read_bytes(n).map_err(eof)?.to_vec()),
            None => None,
        };
        chunks.push(ScriptChunk { op, data });
    }

    Ok(chunks)
}

/// Compute the push prefix for a payload of `data_len` bytes.
///
/// # Returns
/// The prefix bytes, or `DataTooBig` beyond the PUSHDATA4 range.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_PUSHBYTES75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xffff_ffff {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}
