//! Transaction payloads.
//!
//! The payload layout depends on the transaction type byte:
//!
//! | Type           | Payload                                                  |
//! |----------------|----------------------------------------------------------|
//! | Deploy (0xd0)  | code, needStorage, name, version, author, email, desc    |
//! | Invoke (0xd1)  | invocation script                                        |
//!
//! Byte fields are VarBytes, strings are VarString, `needStorage` is one
//! byte.

use std::fmt;

use ont_primitives::util::{ByteReader, ByteWriter};
use ont_script::{Address, Script};

use crate::TransactionError;

/// The transaction type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Deploy,
    Invoke,
}

impl TransactionType {
    pub fn to_u8(self) -> u8 {
        match self {
            TransactionType::Deploy => 0xd0,
            TransactionType::Invoke => 0xd1,
        }
    }

    pub fn from_u8(b: u8) -> Result<Self, TransactionError> {
        match b {
            0xd0 => Ok(TransactionType::Deploy),
            0xd1 => Ok(TransactionType::Invoke),
            other => Err(TransactionError::SerializationError(format!(
                "unknown transaction type {other:#04x}"
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Deploy => f.write_str("Deploy"),
            TransactionType::Invoke => f.write_str("Invoke"),
        }
    }
}

/// Contract code plus its descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployCode {
    pub code: Vec<u8>,
    pub need_storage: bool,
    pub name: String,
    pub version: String,
    pub author: String,
    pub email: String,
    pub description: String,
}

impl DeployCode {
    /// Address the contract will live at once deployed.
    pub fn contract_address(&self) -> Address {
        Address::from_vm_code(&self.code)
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_var_bytes(&self.code);
        writer.write_bool(self.need_storage);
        writer.write_var_str(&self.name);
        writer.write_var_str(&self.version);
        writer.write_var_str(&self.author);
        writer.write_var_str(&self.email);
        writer.write_var_str(&self.description);
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let code = reader.read_var_bytes().map_err(reading("deploy code"))?.to_vec();
        let need_storage = match reader.read_u8().map_err(reading("needStorage"))? {
            0 => false,
            1 => true,
            other => {
                return Err(TransactionError::SerializationError(format!(
                    "needStorage must be 0 or 1, got {other}"
                )))
            }
        };
        Ok(DeployCode {
            code,
            need_storage,
            name: reader.read_var_string().map_err(reading("name"))?,
            version: reader.read_var_string().map_err(reading("version"))?,
            author: reader.read_var_string().map_err(reading("author"))?,
            email: reader.read_var_string().map_err(reading("email"))?,
            description: reader.read_var_string().map_err(reading("description"))?,
        })
    }
}

/// A compiled invocation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeCode {
    pub code: Script,
}

impl InvokeCode {
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_var_bytes(self.code.as_bytes());
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let code = reader.read_var_bytes().map_err(reading("invoke code"))?;
        Ok(InvokeCode { code: Script::from_bytes(code) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Deploy(DeployCode),
    Invoke(InvokeCode),
}

impl Payload {
    pub fn tx_type(&self) -> TransactionType {
        match self {
            Payload::Deploy(_) => TransactionType::Deploy,
            Payload::Invoke(_) => TransactionType::Invoke,
        }
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        match self {
            Payload::Deploy(d) => d.write_to(writer),
            Payload::Invoke(i) => i.write_to(writer),
        }
    }

    pub fn read_from(
        tx_type: TransactionType,
        reader: &mut ByteReader,
    ) -> Result<Self, TransactionError> {
        match tx_type {
            TransactionType::Deploy => Ok(Payload::Deploy(DeployCode::read_from(reader)?)),
            TransactionType::Invoke => Ok(Payload::Invoke(InvokeCode::read_from(reader)?)),
        }
    }
}

/// Wrap a reader failure with the name of the field being read.
pub(crate) fn reading(
    field: &'static str,
) -> impl Fn(ont_primitives::PrimitivesError) -> TransactionError {
    move |e| TransactionError::SerializationError(format!("reading {field}: {e}"))
}
