//! Transaction attributes: a usage byte and opaque data.

use ont_primitives::util::{ByteReader, ByteWriter};

use crate::payload::reading;
use crate::TransactionError;

pub const USAGE_NONCE: u8 = 0x00;
pub const USAGE_SCRIPT: u8 = 0x20;
pub const USAGE_DESCRIPTION_URL: u8 = 0x81;
pub const USAGE_DESCRIPTION: u8 = 0x90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxAttribute {
    pub usage: u8,
    pub data: Vec<u8>,
}

impl TxAttribute {
    pub fn new(usage: u8, data: Vec<u8>) -> Self {
        TxAttribute { usage, data }
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.usage);
        writer.write_var_bytes(&self.data);
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let usage = reader.read_u8().map_err(reading("attribute usage"))?;
        let data = reader.read_var_bytes().map_err(reading("attribute data"))?.to_vec();
        Ok(TxAttribute { usage, data })
    }
}
