//! Single-key verification programs.
//!
//! A program is `push(serialized public key) CHECKSIG`. Its Hash160 is the
//! account address, and it is the verification script attached to every
//! signature in a transaction.

use ont_primitives::ec::PublicKey;

use crate::opcodes::OP_CHECKSIG;
use crate::{Script, ScriptError};

/// Build the verification program for `public_key`.
pub fn program_from_public_key(public_key: &PublicKey) -> Script {
    let key = public_key.to_bytes();
    let mut script = Script::new();
    // Serialized keys are at most 35 bytes, always a direct push.
    script.append_raw(&[key.len() as u8]);
    script.append_raw(&key);
    script.append_opcode(OP_CHECKSIG);
    script
}

/// Recover the public key from a single-key verification program.
///
/// # Returns
/// The key, or `NotAProgram` when the script is not exactly one push
/// followed by CHECKSIG.
pub fn public_key_from_program(program: &[u8]) -> Result<PublicKey, ScriptError> {
    let chunks = crate::chunk::decode_script(program)?;
    match chunks.as_slice() {
        [push, check] if check.op == OP_CHECKSIG && check.data.is_none() => {
            let key = push.data.as_deref().ok_or_else(|| {
                ScriptError::NotAProgram("first element is not a data push".to_string())
            })?;
            Ok(PublicKey::from_bytes(key)?)
        }
        _ => Err(ScriptError::NotAProgram(format!(
            "expected <pubkey> CHECKSIG, got {} chunks",
            chunks.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ont_primitives::ec::{Curve, PrivateKey};

    const P256_KEY: &str = "0344ea636caaebf23c7cec2219a75bd6260f891413467922975447ba57f3c824c6";

    #[test]
    fn test_program_layout() {
        let key = PublicKey::from_hex(P256_KEY).unwrap();
        let program = program_from_public_key(&key);
        assert_eq!(program.to_hex(), format!("21{}ac", P256_KEY));
    }

    #[test]
    fn test_program_roundtrip_every_curve() {
        for curve in [Curve::P256, Curve::Secp256k1, Curve::Sm2P256V1] {
            let key = PrivateKey::random(curve).public_key();
            let program = program_from_public_key(&key);
            assert_eq!(public_key_from_program(program.as_bytes()).unwrap(), key);
        }
    }

    #[test]
    fn test_rejects_non_programs() {
        assert!(matches!(
            public_key_from_program(&[0x51, 0xac]),
            Err(ScriptError::NotAProgram(_))
        ));
        let with_extra = format!("21{}acac", P256_KEY);
        assert!(public_key_from_program(&hex::decode(with_extra).unwrap()).is_err());
        assert!(public_key_from_program(&[]).is_err());
    }
}
