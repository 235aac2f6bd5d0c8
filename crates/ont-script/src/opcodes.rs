//! NeoVM opcodes.
//!
//! Only the opcodes an SDK emits or needs to recognise get named
//! constants; the full table below exists for disassembly.

pub const OP_PUSH0: u8 = 0x00;
pub const OP_PUSHF: u8 = OP_PUSH0;
pub const OP_PUSHBYTES1: u8 = 0x01;
pub const OP_PUSHBYTES75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_PUSHM1: u8 = 0x4f;
pub const OP_PUSH1: u8 = 0x51;
pub const OP_PUSHT: u8 = OP_PUSH1;
pub const OP_PUSH16: u8 = 0x60;
pub const OP_NOP: u8 = 0x61;
pub const OP_JMP: u8 = 0x62;
pub const OP_JMPIF: u8 = 0x63;
pub const OP_JMPIFNOT: u8 = 0x64;
pub const OP_CALL: u8 = 0x65;
pub const OP_RET: u8 = 0x66;
pub const OP_APPCALL: u8 = 0x67;
pub const OP_SYSCALL: u8 = 0x68;
pub const OP_TAILCALL: u8 = 0x69;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_PACK: u8 = 0xc1;
pub const OP_NEWSTRUCT: u8 = 0xc6;
pub const OP_NEWMAP: u8 = 0xc7;

/// Opcode names for everything outside the push ranges.
const OPCODE_NAMES: &[(u8, &str)] = &[
    (0x61, "NOP"),
    (0x62, "JMP"),
    (0x63, "JMPIF"),
    (0x64, "JMPIFNOT"),
    (0x65, "CALL"),
    (0x66, "RET"),
    (0x67, "APPCALL"),
    (0x68, "SYSCALL"),
    (0x69, "TAILCALL"),
    (0x6a, "DUPFROMALTSTACK"),
    (0x6b, "TOALTSTACK"),
    (0x6c, "FROMALTSTACK"),
    (0x6d, "XDROP"),
    (0x72, "XSWAP"),
    (0x73, "XTUCK"),
    (0x74, "DEPTH"),
    (0x75, "DROP"),
    (0x76, "DUP"),
    (0x77, "NIP"),
    (0x78, "OVER"),
    (0x79, "PICK"),
    (0x7a, "ROLL"),
    (0x7b, "ROT"),
    (0x7c, "SWAP"),
    (0x7d, "TUCK"),
    (0x7e, "CAT"),
    (0x7f, "SUBSTR"),
    (0x80, "LEFT"),
    (0x81, "RIGHT"),
    (0x82, "SIZE"),
    (0x83, "INVERT"),
    (0x84, "AND"),
    (0x85, "OR"),
    (0x86, "XOR"),
    (0x87, "EQUAL"),
    (0x8b, "INC"),
    (0x8c, "DEC"),
    (0x8d, "SIGN"),
    (0x8f, "NEGATE"),
    (0x90, "ABS"),
    (0x91, "NOT"),
    (0x92, "NZ"),
    (0x93, "ADD"),
    (0x94, "SUB"),
    (0x95, "MUL"),
    (0x96, "DIV"),
    (0x97, "MOD"),
    (0x98, "SHL"),
    (0x99, "SHR"),
    (0x9a, "BOOLAND"),
    (0x9b, "BOOLOR"),
    (0x9c, "NUMEQUAL"),
    (0x9e, "NUMNOTEQUAL"),
    (0x9f, "LT"),
    (0xa0, "GT"),
    (0xa1, "LTE"),
    (0xa2, "GTE"),
    (0xa3, "MIN"),
    (0xa4, "MAX"),
    (0xa5, "WITHIN"),
    (0xa7, "SHA1"),
    (0xa8, "SHA256"),
    (0xa9, "HASH160"),
    (0xaa, "HASH256"),
    (0xac, "CHECKSIG"),
    (0xad, "VERIFY"),
    (0xae, "CHECKMULTISIG"),
    (0xc0, "ARRAYSIZE"),
    (0xc1, "PACK"),
    (0xc2, "UNPACK"),
    (0xc3, "PICKITEM"),
    (0xc4, "SETITEM"),
    (0xc5, "NEWARRAY"),
    (0xc6, "NEWSTRUCT"),
    (0xc7, "NEWMAP"),
    (0xc8, "APPEND"),
    (0xc9, "REVERSE"),
    (0xca, "REMOVE"),
    (0xcb, "HASKEY"),
    (0xcc, "KEYS"),
    (0xcd, "VALUES"),
    (0xf0, "THROW"),
    (0xf1, "THROWIFNOT"),
];

/// Return the mnemonic for an opcode.
///
/// Small-integer pushes render as `PUSH<n>`; direct byte pushes as
/// `PUSHBYTES<n>`. Unassigned bytes render as `UNKNOWN`.
pub fn opcode_to_string(op: u8) -> String {
    match op {
        OP_PUSH0 => "PUSH0".to_string(),
        OP_PUSHBYTES1..=OP_PUSHBYTES75 => format!("PUSHBYTES{op}"),
        OP_PUSHDATA1 => "PUSHDATA1".to_string(),
        OP_PUSHDATA2 => "PUSHDATA2".to_string(),
        OP_PUSHDATA4 => "PUSHDATA4".to_string(),
        OP_PUSHM1 => "PUSHM1".to_string(),
        OP_PUSH1..=OP_PUSH16 => format!("PUSH{}", op - OP_PUSH1 + 1),
        _ => OPCODE_NAMES
            .iter()
            .find(|(code, _)| *code == op)
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for &(code, name) in OPCODE_NAMES {
            assert_eq!(opcode_to_string(code), name);
        }
    }

    #[test]
    fn test_push_names() {
        assert_eq!(opcode_to_string(0x00), "PUSH0");
        assert_eq!(opcode_to_string(0x14), "PUSHBYTES20");
        assert_eq!(opcode_to_string(0x51), "PUSH1");
        assert_eq!(opcode_to_string(0x60), "PUSH16");
        assert_eq!(opcode_to_string(OP_APPCALL), "APPCALL");
        assert_eq!(opcode_to_string(OP_TAILCALL), "TAILCALL");
        assert_eq!(opcode_to_string(0xff), "UNKNOWN");
    }
}
