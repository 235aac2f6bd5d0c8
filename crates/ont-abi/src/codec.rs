//! NeoVM stack item serialization.
//!
//! Layout per item: a tag byte, then
//! - ByteArray (`String` and `Address` included): VarInt length + bytes
//! - Bool: one byte, 0 or 1
//! - Int: VarInt length + minimal little-endian two's complement
//! - Array / Struct: VarInt count + items
//! - Map: VarInt count + (ByteArray key item, value item) pairs in key order

use ont_primitives::util::{ByteReader, ByteWriter, VarInt};
use ont_script::num::{int_from_bytes, int_to_bytes};
use ont_script::Address;

use crate::value::{AbiType, AbiValue};
use crate::{AbiError, MAX_DEPTH};

pub const TAG_BYTE_ARRAY: u8 = 0x00;
pub const TAG_BOOL: u8 = 0x01;
pub const TAG_INT: u8 = 0x02;
pub const TAG_ARRAY: u8 = 0x80;
pub const TAG_STRUCT: u8 = 0x81;
pub const TAG_MAP: u8 = 0x82;

fn malformed(msg: impl Into<String>) -> AbiError {
    AbiError::MalformedValue(msg.into())
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize a value.
///
/// # Returns
/// The encoded bytes, or `TooDeep` when containers nest past `MAX_DEPTH`.
pub fn encode(value: &AbiValue) -> Result<Vec<u8>, AbiError> {
    let mut w = ByteWriter::new();
    write_value(&mut w, value, 0)?;
    Ok(w.into_bytes())
}

fn write_value(w: &mut ByteWriter, value: &AbiValue, depth: usize) -> Result<(), AbiError> {
    match value {
        AbiValue::Bool(b) => {
            w.write_u8(TAG_BOOL);
            w.write_bool(*b);
        }
        AbiValue::Int(n) => {
            w.write_u8(TAG_INT);
            w.write_var_bytes(&int_to_bytes(n));
        }
        AbiValue::ByteArray(bytes) => {
            w.write_u8(TAG_BYTE_ARRAY);
            w.write_var_bytes(bytes);
        }
        AbiValue::String(s) => {
            w.write_u8(TAG_BYTE_ARRAY);
            w.write_var_str(s);
        }
        AbiValue::Address(addr) => {
            w.write_u8(TAG_BYTE_ARRAY);
            w.write_var_bytes(addr.as_bytes());
        }
        AbiValue::Array(items) | AbiValue::Struct(items) => {
            if depth >= MAX_DEPTH {
                return Err(AbiError::TooDeep(MAX_DEPTH));
            }
            let tag = if matches!(value, AbiValue::Array(_)) { TAG_ARRAY } else { TAG_STRUCT };
            w.write_u8(tag);
            w.write_varint(VarInt::from(items.len()));
            for item in items {
                write_value(w, item, depth + 1)?;
            }
        }
        AbiValue::Map(entries) => {
            if depth >= MAX_DEPTH {
                return Err(AbiError::TooDeep(MAX_DEPTH));
            }
            w.write_u8(TAG_MAP);
            w.write_varint(VarInt::from(entries.len()));
            for (key, item) in entries {
                w.write_u8(TAG_BYTE_ARRAY);
                w.write_var_str(key);
                write_value(w, item, depth + 1)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Deserialize a value, guided by an optional shape.
///
/// Without a shape (or with `AbiType::Any`) byte strings come back as
/// `ByteArray` and containers keep their wire kind. Every length and count
/// is checked against the remaining input, and the whole input must be
/// consumed.
///
/// # Returns
/// The value, or `MalformedValue` for truncated input, unknown tags,
/// trailing bytes, or data that does not fit the shape.
pub fn decode(bytes: &[u8], shape: Option<&AbiType>) -> Result<AbiValue, AbiError> {
    let mut r = ByteReader::new(bytes);
    let value = read_value(&mut r, shape.unwrap_or(&AbiType::Any), 0)?;
    if !r.is_empty() {
        return Err(malformed(format!("{} trailing bytes", r.remaining())));
    }
    Ok(value)
}

fn read_value(r: &mut ByteReader<'_>, shape: &AbiType, depth: usize) -> Result<AbiValue, AbiError> {
    match r.read_u8()? {
        TAG_BYTE_ARRAY => leaf_from_bytes(r.read_var_bytes()?, shape),
        TAG_BOOL => {
            let b = match r.read_u8()? {
                0 => false,
                1 => true,
                other => return Err(malformed(format!("bool byte {other:#04x}"))),
            };
            match shape {
                AbiType::Any | AbiType::Bool => Ok(AbiValue::Bool(b)),
                AbiType::Int => Ok(AbiValue::Int((b as u8).into())),
                other => Err(malformed(format!("expected {other}, found bool"))),
            }
        }
        TAG_INT => {
            let bytes = r.read_var_bytes()?;
            match shape {
                AbiType::Any | AbiType::Int => Ok(AbiValue::Int(int_from_bytes(bytes))),
                AbiType::Bool => Ok(AbiValue::Bool(bytes.iter().any(|&b| b != 0))),
                AbiType::ByteArray => Ok(AbiValue::ByteArray(bytes.to_vec())),
                other => Err(malformed(format!("expected {other}, found integer"))),
            }
        }
        tag @ (TAG_ARRAY | TAG_STRUCT) => {
            enter(depth)?;
            let count = read_count(r, 1)?;
            let (as_struct, shapes) = list_shapes(tag, shape, count)?;
            let mut items = Vec::with_capacity(count);
            for i in 0..count {
                let item_shape = shapes.get(i).unwrap_or(&AbiType::Any);
                items.push(read_value(r, item_shape, depth + 1)?);
            }
            Ok(if as_struct { AbiValue::Struct(items) } else { AbiValue::Array(items) })
        }
        TAG_MAP => {
            enter(depth)?;
            let count = read_count(r, 2)?;
            let mut entries = std::collections::BTreeMap::new();
            for _ in 0..count {
                if r.read_u8()? != TAG_BYTE_ARRAY {
                    return Err(malformed("map key is not a byte array"));
                }
                let key = std::str::from_utf8(r.read_var_bytes()?)
                    .map_err(|e| malformed(format!("map key: {e}")))?
                    .to_string();
                let value_shape = match shape {
                    AbiType::Any => &AbiType::Any,
                    AbiType::Map(inner) => inner.as_ref(),
                    AbiType::MapOf(shapes) => shapes
                        .get(&key)
                        .ok_or_else(|| malformed(format!("unexpected map key {key:?}")))?,
                    other => return Err(malformed(format!("expected {other}, found map"))),
                };
                let value = read_value(r, value_shape, depth + 1)?;
                if entries.insert(key.clone(), value).is_some() {
                    return Err(malformed(format!("duplicate map key {key:?}")));
                }
            }
            if let AbiType::MapOf(shapes) = shape {
                if shapes.len() != entries.len() {
                    return Err(malformed(format!(
                        "expected {} map entries, found {}",
                        shapes.len(),
                        entries.len()
                    )));
                }
            }
            Ok(AbiValue::Map(entries))
        }
        other => Err(malformed(format!("unknown tag {other:#04x}"))),
    }
}

fn enter(depth: usize) -> Result<(), AbiError> {
    if depth >= MAX_DEPTH {
        return Err(malformed(format!("nesting depth exceeds {MAX_DEPTH}")));
    }
    Ok(())
}

/// Read an item count; each item needs at least `min_item_len` bytes.
fn read_count(r: &mut ByteReader<'_>, min_item_len: u64) -> Result<usize, AbiError> {
    let count = r.read_varint()?.value();
    if count.saturating_mul(min_item_len) > r.remaining() as u64 {
        return Err(malformed(format!("count {count} exceeds remaining input")));
    }
    Ok(count as usize)
}

/// Resolve the per-item shapes of a list and whether it decodes as a struct.
fn list_shapes(tag: u8, shape: &AbiType, count: usize) -> Result<(bool, Vec<AbiType>), AbiError> {
    let positional = |shapes: &[AbiType], as_struct: bool| {
        if shapes.len() != count {
            return Err(malformed(format!(
                "expected {} items, found {}",
                shapes.len(),
                count
            )));
        }
        Ok((as_struct, shapes.to_vec()))
    };
    match shape {
        AbiType::Any => Ok((tag == TAG_STRUCT, Vec::new())),
        AbiType::Array(inner) => Ok((false, vec![inner.as_ref().clone(); count])),
        AbiType::ArrayOf(shapes) => positional(shapes, false),
        AbiType::Struct(fields) if fields.is_empty() => Ok((true, Vec::new())),
        AbiType::Struct(fields) => positional(fields, true),
        other => Err(malformed(format!("expected {other}, found list"))),
    }
}

/// Interpret a byte string under a leaf shape.
pub(crate) fn leaf_from_bytes(bytes: &[u8], shape: &AbiType) -> Result<AbiValue, AbiError> {
    match shape {
        AbiType::Any | AbiType::ByteArray => Ok(AbiValue::ByteArray(bytes.to_vec())),
        AbiType::String => String::from_utf8(bytes.to_vec())
            .map(AbiValue::String)
            .map_err(|e| malformed(format!("string: {e}"))),
        AbiType::Address => Address::from_slice(bytes)
            .map(AbiValue::Address)
            .map_err(|e| malformed(format!("address: {e}"))),
        AbiType::Int => Ok(AbiValue::Int(int_from_bytes(bytes))),
        AbiType::Bool => Ok(AbiValue::Bool(bytes.iter().any(|&b| b != 0))),
        other => Err(malformed(format!("expected {other}, found byte array"))),
    }
}
