//! Signature entries attached to a transaction.
//!
//! On the wire each entry is a pair of scripts: the invocation script
//! pushes the serialized signature, the verification script is the
//! signer's `push(pubkey) CHECKSIG` program.

use ont_primitives::ec::{PublicKey, Signature};
use ont_primitives::util::{ByteReader, ByteWriter};
use ont_script::program::{program_from_public_key, public_key_from_program};
use ont_script::Script;

use crate::payload::reading;
use crate::TransactionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSignature {
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl TxSignature {
    pub fn invocation_script(&self) -> Result<Script, TransactionError> {
        let mut script = Script::new();
        script.append_push_data(&self.signature.to_bytes())?;
        Ok(script)
    }

    pub fn verification_script(&self) -> Script {
        program_from_public_key(&self.public_key)
    }

    pub fn write_to(&self, writer: &mut ByteWriter) -> Result<(), TransactionError> {
        writer.write_var_bytes(self.invocation_script()?.as_bytes());
        writer.write_var_bytes(self.verification_script().as_bytes());
        Ok(())
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let invocation = reader.read_var_bytes().map_err(reading("invocation script"))?;
        let verification = reader.read_var_bytes().map_err(reading("verification script"))?;

        let chunks = Script::from_bytes(invocation).chunks()?;
        let sig_bytes = match chunks.as_slice() {
            [chunk] if chunk.is_push() => chunk.data.as_deref(),
            _ => None,
        }
        .ok_or_else(|| {
            TransactionError::SerializationError(
                "invocation script must push exactly one signature".to_string(),
            )
        })?;

        Ok(TxSignature {
            public_key: public_key_from_program(verification)?,
            signature: Signature::from_bytes(sig_bytes)?,
        })
    }
}
