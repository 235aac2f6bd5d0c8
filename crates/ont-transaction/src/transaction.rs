//! Core transaction type for the Ontology ledger.
//!
//! A transaction carries a version, a type, a nonce, gas settings, the
//! paying account, a Deploy or Invoke payload, attributes and signatures.
//! Supports binary and hex serialization, hash computation and signing.

use ont_primitives::chainhash::{double_hash_h, Hash};
use ont_primitives::ec::PrivateKey;
use ont_primitives::util::{ByteReader, ByteWriter, VarInt};
use ont_script::Address;
use tracing::debug;

use crate::attribute::TxAttribute;
use crate::payload::{reading, Payload, TransactionType};
use crate::signature::TxSignature;
use crate::TransactionError;

/// Current transaction format version.
pub const TX_VERSION: u8 = 0;

/// Largest serialized transaction accepted, in bytes.
pub const MAX_TX_SIZE: usize = 1024 * 1024;

/// Most signature entries a transaction may carry.
pub const MAX_SIGNATURES: usize = 16;

/// An Ontology transaction.
///
/// # Wire format
///
/// | Field       | Size                           |
/// |-------------|--------------------------------|
/// | version     | 1 byte                         |
/// | type        | 1 byte (0xd0 / 0xd1)           |
/// | nonce       | 4 bytes (LE)                   |
/// | gas_price   | 8 bytes (LE)                   |
/// | gas_limit   | 8 bytes (LE)                   |
/// | payer       | 20 bytes                       |
/// | payload     | variable (per type)            |
/// | attributes  | VarInt count + entries         |
/// | signatures  | VarInt count + script pairs    |
///
/// Everything before the signature list is the signed content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub nonce: u32,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub payer: Address,
    pub payload: Payload,
    pub attributes: Vec<TxAttribute>,
    pub signatures: Vec<TxSignature>,
}

impl Transaction {
    /// Create an unsigned transaction with no attributes.
    pub fn new(payload: Payload, nonce: u32, gas_price: u64, gas_limit: u64, payer: Address) -> Self {
        Transaction {
            version: TX_VERSION,
            nonce,
            gas_price,
            gas_limit,
            payer,
            payload,
            attributes: Vec::new(),
            signatures: Vec::new(),
        }
    }

    pub fn tx_type(&self) -> TransactionType {
        self.payload.tx_type()
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The slice must hold exactly one transaction no larger than
    /// `MAX_TX_SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.len() > MAX_TX_SIZE {
            return Err(TransactionError::SerializationError(format!(
                "transaction is {} bytes, limit is {MAX_TX_SIZE}",
                bytes.len()
            )));
        }
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader.read_u8().map_err(reading("version"))?;
        let tx_type = TransactionType::from_u8(reader.read_u8().map_err(reading("type"))?)?;
        let nonce = reader.read_u32_le().map_err(reading("nonce"))?;
        let gas_price = reader.read_u64_le().map_err(reading("gas price"))?;
        let gas_limit = reader.read_u64_le().map_err(reading("gas limit"))?;
        let payer = Address::new(reader.read_array::<20>().map_err(reading("payer"))?);
        let payload = Payload::read_from(tx_type, reader)?;

        // Attributes and signature entries take at least two bytes each.
        let attr_count = read_count(reader, "attribute count")?;
        let mut attributes = Vec::with_capacity(attr_count);
        for _ in 0..attr_count {
            attributes.push(TxAttribute::read_from(reader)?);
        }

        let sig_count = read_count(reader, "signature count")?;
        if sig_count > MAX_SIGNATURES {
            return Err(TransactionError::SerializationError(format!(
                "{sig_count} signatures, limit is {MAX_SIGNATURES}"
            )));
        }
        let mut signatures = Vec::with_capacity(sig_count);
        for _ in 0..sig_count {
            signatures.push(TxSignature::read_from(reader)?);
        }

        Ok(Transaction {
            version,
            nonce,
            gas_price,
            gas_limit,
            payer,
            payload,
            attributes,
            signatures,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// The signed content: every field except the signature list.
    pub fn unsigned_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(256);
        self.write_unsigned(&mut writer);
        writer.into_bytes()
    }

    fn write_unsigned(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.version);
        writer.write_u8(self.tx_type().to_u8());
        writer.write_u32_le(self.nonce);
        writer.write_u64_le(self.gas_price);
        writer.write_u64_le(self.gas_limit);
        writer.write_bytes(self.payer.as_bytes());
        self.payload.write_to(writer);
        writer.write_varint(VarInt::from(self.attributes.len()));
        for attr in &self.attributes {
            attr.write_to(writer);
        }
    }

    /// Serialize the full transaction, signatures included.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let mut writer = ByteWriter::with_capacity(512);
        self.write_unsigned(&mut writer);
        writer.write_varint(VarInt::from(self.signatures.len()));
        for sig in &self.signatures {
            sig.write_to(&mut writer)?;
        }
        Ok(writer.into_bytes())
    }

    pub fn to_hex(&self) -> Result<String, TransactionError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    pub fn size(&self) -> Result<usize, TransactionError> {
        Ok(self.to_bytes()?.len())
    }

    // -----------------------------------------------------------------
    // Hash
    // -----------------------------------------------------------------

    /// Double SHA-256 of the unsigned bytes. Displays byte-reversed.
    pub fn hash(&self) -> Hash {
        double_hash_h(&self.unsigned_bytes())
    }

    /// The conventional display form of `hash()`.
    pub fn hash_hex(&self) -> String {
        self.hash().to_string()
    }

    // -----------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------

    /// Sign the transaction hash with `key` and record the entry.
    ///
    /// Signing again with a key already present replaces its entry, so
    /// repeated signing converges on one entry per public key.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<(), TransactionError> {
        let hash = self.hash();
        let signature = key.sign(hash.as_bytes())?;
        let public_key = key.public_key();
        let entry = TxSignature { public_key, signature };

        match self
            .signatures
            .iter_mut()
            .find(|s| s.public_key == entry.public_key)
        {
            Some(existing) => {
                debug!(tx = %hash, "replacing existing signature");
                *existing = entry;
            }
            None => {
                if self.signatures.len() >= MAX_SIGNATURES {
                    return Err(TransactionError::SigningError(format!(
                        "transaction already carries {MAX_SIGNATURES} signatures"
                    )));
                }
                debug!(tx = %hash, signer = %Address::from_public_key(&entry.public_key), "signed transaction");
                self.signatures.push(entry);
            }
        }
        Ok(())
    }

    /// Check every signature entry against the transaction hash.
    ///
    /// # Returns
    /// `true` when at least one entry exists and all of them verify.
    pub fn verify_signatures(&self) -> bool {
        let hash = self.hash();
        !self.signatures.is_empty()
            && self
                .signatures
                .iter()
                .all(|s| s.public_key.verify(hash.as_bytes(), &s.signature))
    }

    /// Addresses of every account that signed.
    pub fn signers(&self) -> Vec<Address> {
        self.signatures
            .iter()
            .map(|s| Address::from_public_key(&s.public_key))
            .collect()
    }
}

fn read_count(reader: &mut ByteReader, what: &'static str) -> Result<usize, TransactionError> {
    let count = reader.read_varint().map_err(reading(what))?.value();
    if count > (reader.remaining() / 2) as u64 {
        return Err(TransactionError::SerializationError(format!(
            "{what} {count} exceeds remaining {} bytes",
            reader.remaining()
        )));
    }
    Ok(count as usize)
}
