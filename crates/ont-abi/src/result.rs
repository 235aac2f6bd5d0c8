//! Decoding of pre-executed call results.
//!
//! Nodes report return values as JSON: hex strings for byte-like leaves
//! and JSON arrays for lists. A hex string standing where a container is
//! expected holds a serialized stack item and goes through the codec.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use serde_json::Value;

use crate::codec::{decode, leaf_from_bytes};
use crate::value::{AbiType, AbiValue};
use crate::{AbiError, MAX_DEPTH};

/// Decode a JSON result under the function's declared return shape.
///
/// Leaves: `Bool` is true when any byte is non-zero, `Int` is little-endian
/// two's complement, `String` is UTF-8, `Address` must be 20 bytes. Maps
/// given as JSON arrays are lists of `[key, value]` pairs.
///
/// # Returns
/// The value, or `MalformedValue` when the JSON does not fit the shape.
pub fn decode_result(json: &Value, shape: &AbiType) -> Result<AbiValue, AbiError> {
    decode_json(json, shape, 0)
}

fn malformed(msg: impl Into<String>) -> AbiError {
    AbiError::MalformedValue(msg.into())
}

fn decode_json(json: &Value, shape: &AbiType, depth: usize) -> Result<AbiValue, AbiError> {
    match json {
        Value::String(s) => {
            let bytes = hex::decode(s).map_err(|e| malformed(format!("result hex: {e}")))?;
            match shape {
                AbiType::Array(_)
                | AbiType::ArrayOf(_)
                | AbiType::Struct(_)
                | AbiType::Map(_)
                | AbiType::MapOf(_) => decode(&bytes, Some(shape)),
                leaf => leaf_from_bytes(&bytes, leaf),
            }
        }
        Value::Array(items) => {
            if depth >= MAX_DEPTH {
                return Err(malformed(format!("nesting depth exceeds {MAX_DEPTH}")));
            }
            decode_list(items, shape, depth + 1)
        }
        Value::Bool(b) => match shape {
            AbiType::Any | AbiType::Bool => Ok(AbiValue::Bool(*b)),
            other => Err(malformed(format!("expected {other}, found JSON bool"))),
        },
        Value::Number(n) => match shape {
            AbiType::Any | AbiType::Int => n
                .to_string()
                .parse::<BigInt>()
                .map(AbiValue::Int)
                .map_err(|e| malformed(format!("integer result: {e}"))),
            other => Err(malformed(format!("expected {other}, found JSON number"))),
        },
        other => Err(malformed(format!("unexpected result {other}"))),
    }
}

fn decode_list(items: &[Value], shape: &AbiType, depth: usize) -> Result<AbiValue, AbiError> {
    let any = std::iter::repeat(&AbiType::Any);
    match shape {
        AbiType::Any => Ok(AbiValue::Array(decode_each(items, any, depth)?)),
        AbiType::Array(inner) => Ok(AbiValue::Array(decode_each(
            items,
            std::iter::repeat(inner.as_ref()),
            depth,
        )?)),
        AbiType::ArrayOf(shapes) => {
            expect_len(shapes.len(), items.len())?;
            Ok(AbiValue::Array(decode_each(items, shapes.iter(), depth)?))
        }
        AbiType::Struct(fields) if fields.is_empty() => {
            Ok(AbiValue::Struct(decode_each(items, any, depth)?))
        }
        AbiType::Struct(fields) => {
            expect_len(fields.len(), items.len())?;
            Ok(AbiValue::Struct(decode_each(items, fields.iter(), depth)?))
        }
        AbiType::Map(_) | AbiType::MapOf(_) => decode_pairs(items, shape, depth),
        other => Err(malformed(format!("expected {other}, found JSON array"))),
    }
}

fn decode_each<'a>(
    items: &[Value],
    shapes: impl Iterator<Item = &'a AbiType>,
    depth: usize,
) -> Result<Vec<AbiValue>, AbiError> {
    items
        .iter()
        .zip(shapes)
        .map(|(item, s)| decode_json(item, s, depth))
        .collect()
}

fn expect_len(expected: usize, found: usize) -> Result<(), AbiError> {
    if expected == found {
        Ok(())
    } else {
        Err(malformed(format!("expected {expected} items, found {found}")))
    }
}

fn decode_pairs(items: &[Value], shape: &AbiType, depth: usize) -> Result<AbiValue, AbiError> {
    let mut entries = BTreeMap::new();
    for item in items {
        let pair = item
            .as_array()
            .filter(|p| p.len() == 2)
            .ok_or_else(|| malformed("map entry is not a [key, value] pair"))?;
        let key = match decode_json(&pair[0], &AbiType::String, depth)? {
            AbiValue::String(k) => k,
            _ => return Err(malformed("map key is not a string")),
        };
        let value_shape = match shape {
            AbiType::Map(inner) => inner.as_ref(),
            AbiType::MapOf(shapes) => shapes
                .get(&key)
                .ok_or_else(|| malformed(format!("unexpected map key {key:?}")))?,
            _ => &AbiType::Any,
        };
        let value = decode_json(&pair[1], value_shape, depth)?;
        if entries.insert(key.clone(), value).is_some() {
            return Err(malformed(format!("duplicate map key {key:?}")));
        }
    }
    if let AbiType::MapOf(shapes) = shape {
        if shapes.len() != entries.len() {
            return Err(malformed("map result keys do not match the expected shape"));
        }
    }
    Ok(AbiValue::Map(entries))
}
