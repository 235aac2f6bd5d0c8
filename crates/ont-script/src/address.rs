/// Account and contract addresses.
///
/// An address is 20 bytes: Hash160 of a verification program for
/// accounts, Hash160 of the deployed code for contracts. The text form is
/// base58check with version byte 0x17, which yields the familiar
/// `A...` strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ont_primitives::base58;
use ont_primitives::ec::PublicKey;
use ont_primitives::hash::hash160;

use crate::program::program_from_public_key;
use crate::ScriptError;

/// Base58check version byte for addresses.
pub const ADDRESS_VERSION: u8 = 0x17;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account or contract address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// Create an address from exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ScriptError> {
        let arr: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| ScriptError::InvalidAddressLength(bytes.len()))?;
        Ok(Address(arr))
    }

    /// Address of the single-key program for `public_key`.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Address(hash160(program_from_public_key(public_key).as_bytes()))
    }

    /// Contract address of deployed `code`.
    pub fn from_vm_code(code: &[u8]) -> Self {
        Address(hash160(code))
    }

    /// Parse the base58check text form.
    ///
    /// # Returns
    /// The address, or an error for bad characters, checksum, length or
    /// version byte.
    pub fn from_base58(s: &str) -> Result<Self, ScriptError> {
        let payload = base58::check_decode(s)
            .map_err(|e| ScriptError::InvalidAddress(format!("{s}: {e}")))?;
        match payload.split_first() {
            Some((&ADDRESS_VERSION, rest)) => Address::from_slice(rest),
            Some((&version, _)) => Err(ScriptError::UnsupportedAddressVersion(version)),
            None => Err(ScriptError::InvalidAddress(format!("{s}: empty payload"))),
        }
    }

    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(1 + ADDRESS_LEN);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&self.0);
        base58::check_encode(&payload)
    }

    /// Parse hex in byte order (as used inside scripts).
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Address::from_slice(&hex::decode(hex_str)?)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the byte-reversed hex form contract hashes are published in.
    ///
    /// An optional `0x` prefix is accepted.
    pub fn from_hex_reversed(hex_str: &str) -> Result<Self, ScriptError> {
        let trimmed = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let mut bytes = hex::decode(trimmed)?;
        bytes.reverse();
        Address::from_slice(&bytes)
    }

    pub fn to_hex_reversed(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        hex::encode(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_base58(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_base58(&s).map_err(serde::de::Error::custom)
    }
}
