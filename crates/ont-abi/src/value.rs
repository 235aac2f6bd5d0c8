//! ABI value model and shapes.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use ont_script::Address;

use crate::AbiError;

/// A contract call parameter or return value.
///
/// `Map` keys are kept sorted, which is also their canonical encoding
/// order. `Struct` fields are positional and their order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Bool(bool),
    Int(BigInt),
    ByteArray(Vec<u8>),
    String(String),
    Address(Address),
    Array(Vec<AbiValue>),
    Map(BTreeMap<String, AbiValue>),
    Struct(Vec<AbiValue>),
}

/// The shape a value is expected to have.
///
/// Shapes steer decoding: the wire format only distinguishes byte strings,
/// booleans, integers and containers, so `String` and `Address` leaves and
/// heterogeneous containers are recovered through their shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    /// Whatever the wire says.
    Any,
    Bool,
    Int,
    ByteArray,
    String,
    Address,
    /// Array whose elements all share one shape.
    Array(Box<AbiType>),
    /// Array with a shape per position.
    ArrayOf(Vec<AbiType>),
    /// Positional fields; an empty list accepts any fields.
    Struct(Vec<AbiType>),
    /// Map whose values all share one shape.
    Map(Box<AbiType>),
    /// Map with a shape per key.
    MapOf(BTreeMap<String, AbiType>),
}

impl AbiValue {
    /// Build a map value from key/value pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AbiValue)>,
    {
        AbiValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The exact shape of this value.
    ///
    /// Containers whose members share a shape get the homogeneous form;
    /// otherwise the positional or per-key form is used.
    pub fn shape(&self) -> AbiType {
        match self {
            AbiValue::Bool(_) => AbiType::Bool,
            AbiValue::Int(_) => AbiType::Int,
            AbiValue::ByteArray(_) => AbiType::ByteArray,
            AbiValue::String(_) => AbiType::String,
            AbiValue::Address(_) => AbiType::Address,
            AbiValue::Array(items) => {
                let shapes: Vec<AbiType> = items.iter().map(AbiValue::shape).collect();
                match common_shape(shapes.iter()) {
                    Some(shape) => AbiType::Array(Box::new(shape)),
                    None => AbiType::ArrayOf(shapes),
                }
            }
            AbiValue::Struct(fields) => AbiType::Struct(fields.iter().map(AbiValue::shape).collect()),
            AbiValue::Map(entries) => {
                let shapes: BTreeMap<String, AbiType> =
                    entries.iter().map(|(k, v)| (k.clone(), v.shape())).collect();
                match common_shape(shapes.values()) {
                    Some(shape) => AbiType::Map(Box::new(shape)),
                    None => AbiType::MapOf(shapes),
                }
            }
        }
    }

    /// Container nesting depth; scalars are 0.
    pub fn depth(&self) -> usize {
        match self {
            AbiValue::Array(items) | AbiValue::Struct(items) => {
                1 + items.iter().map(AbiValue::depth).max().unwrap_or(0)
            }
            AbiValue::Map(entries) => 1 + entries.values().map(AbiValue::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            AbiValue::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::ByteArray(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            AbiValue::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Elements of an `Array` or fields of a `Struct`.
    pub fn as_list(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::Array(items) | AbiValue::Struct(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, AbiValue>> {
        match self {
            AbiValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// The shape every item has, if they agree. An empty set agrees on `Any`.
fn common_shape<'a, I: Iterator<Item = &'a AbiType>>(mut shapes: I) -> Option<AbiType> {
    let first = match shapes.next() {
        Some(s) => s,
        None => return Some(AbiType::Any),
    };
    if shapes.all(|s| s == first) {
        Some(first.clone())
    } else {
        None
    }
}

impl AbiType {
    /// Resolve a type name from an ABI definition file.
    ///
    /// `Void` is not a value type; see `AbiFunction::return_shape`.
    pub fn from_name(name: &str) -> Result<Self, AbiError> {
        match name {
            "Boolean" | "Bool" => Ok(AbiType::Bool),
            "Integer" | "Int" => Ok(AbiType::Int),
            "ByteArray" => Ok(AbiType::ByteArray),
            "String" => Ok(AbiType::String),
            "Address" | "Hash160" => Ok(AbiType::Address),
            "Array" => Ok(AbiType::Array(Box::new(AbiType::Any))),
            "Struct" => Ok(AbiType::Struct(Vec::new())),
            "Map" => Ok(AbiType::Map(Box::new(AbiType::Any))),
            "Any" => Ok(AbiType::Any),
            other => Err(AbiError::UnknownType(other.to_string())),
        }
    }

    /// Whether `value` fits this shape.
    pub fn accepts(&self, value: &AbiValue) -> bool {
        match (self, value) {
            (AbiType::Any, _) => true,
            (AbiType::Bool, AbiValue::Bool(_))
            | (AbiType::Int, AbiValue::Int(_))
            | (AbiType::ByteArray, AbiValue::ByteArray(_))
            | (AbiType::String, AbiValue::String(_))
            | (AbiType::Address, AbiValue::Address(_)) => true,
            (AbiType::Array(inner), AbiValue::Array(items)) => items.iter().all(|v| inner.accepts(v)),
            (AbiType::ArrayOf(shapes), AbiValue::Array(items)) => accepts_all(shapes, items),
            (AbiType::Struct(fields), AbiValue::Struct(items)) => {
                fields.is_empty() || accepts_all(fields, items)
            }
            (AbiType::Map(inner), AbiValue::Map(entries)) => entries.values().all(|v| inner.accepts(v)),
            (AbiType::MapOf(shapes), AbiValue::Map(entries)) => {
                shapes.len() == entries.len()
                    && entries
                        .iter()
                        .all(|(k, v)| shapes.get(k).is_some_and(|s| s.accepts(v)))
            }
            _ => false,
        }
    }
}

fn accepts_all(shapes: &[AbiType], items: &[AbiValue]) -> bool {
    shapes.len() == items.len() && shapes.iter().zip(items).all(|(s, v)| s.accepts(v))
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Any => f.write_str("Any"),
            AbiType::Bool => f.write_str("Boolean"),
            AbiType::Int => f.write_str("Integer"),
            AbiType::ByteArray => f.write_str("ByteArray"),
            AbiType::String => f.write_str("String"),
            AbiType::Address => f.write_str("Address"),
            AbiType::Array(inner) => write!(f, "Array<{inner}>"),
            AbiType::ArrayOf(_) => f.write_str("Array"),
            AbiType::Struct(_) => f.write_str("Struct"),
            AbiType::Map(inner) => write!(f, "Map<{inner}>"),
            AbiType::MapOf(_) => f.write_str("Map"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for AbiValue {
    fn from(v: bool) -> Self {
        AbiValue::Bool(v)
    }
}

impl From<i64> for AbiValue {
    fn from(v: i64) -> Self {
        AbiValue::Int(BigInt::from(v))
    }
}

impl From<u64> for AbiValue {
    fn from(v: u64) -> Self {
        AbiValue::Int(BigInt::from(v))
    }
}

impl From<BigInt> for AbiValue {
    fn from(v: BigInt) -> Self {
        AbiValue::Int(v)
    }
}

impl From<&str> for AbiValue {
    fn from(v: &str) -> Self {
        AbiValue::String(v.to_string())
    }
}

impl From<String> for AbiValue {
    fn from(v: String) -> Self {
        AbiValue::String(v)
    }
}

impl From<Vec<u8>> for AbiValue {
    fn from(v: Vec<u8>) -> Self {
        AbiValue::ByteArray(v)
    }
}

impl From<&[u8]> for AbiValue {
    fn from(v: &[u8]) -> Self {
        AbiValue::ByteArray(v.to_vec())
    }
}

impl From<Address> for AbiValue {
    fn from(v: Address) -> Self {
        AbiValue::Address(v)
    }
}

impl From<Vec<AbiValue>> for AbiValue {
    fn from(v: Vec<AbiValue>) -> Self {
        AbiValue::Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homogeneous_shapes() {
        let v = AbiValue::Array(vec![1i64.into(), 2i64.into()]);
        assert_eq!(v.shape(), AbiType::Array(Box::new(AbiType::Int)));
        let m = AbiValue::map([("a", "x".into()), ("b", "y".into())]);
        assert_eq!(m.shape(), AbiType::Map(Box::new(AbiType::String)));
        assert_eq!(AbiValue::Array(vec![]).shape(), AbiType::Array(Box::new(AbiType::Any)));
    }

    #[test]
    fn test_heterogeneous_shapes_are_positional() {
        let v = AbiValue::Array(vec![true.into(), "s".into()]);
        assert_eq!(v.shape(), AbiType::ArrayOf(vec![AbiType::Bool, AbiType::String]));
        let m = AbiValue::map([("n", 1i64.into()), ("s", "x".into())]);
        match m.shape() {
            AbiType::MapOf(shapes) => {
                assert_eq!(shapes["n"], AbiType::Int);
                assert_eq!(shapes["s"], AbiType::String);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_depth() {
        assert_eq!(AbiValue::from(1i64).depth(), 0);
        let nested = AbiValue::Array(vec![AbiValue::Struct(vec![AbiValue::map([("k", 1i64.into())])])]);
        assert_eq!(nested.depth(), 3);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(AbiType::from_name("Boolean").unwrap(), AbiType::Bool);
        assert_eq!(AbiType::from_name("Hash160").unwrap(), AbiType::Address);
        assert_eq!(AbiType::from_name("Struct").unwrap(), AbiType::Struct(vec![]));
        assert!(matches!(AbiType::from_name("Float"), Err(AbiError::UnknownType(_))));
    }

    #[test]
    fn test_accepts() {
        let s = AbiValue::Struct(vec![100i64.into(), b"claimid".to_vec().into()]);
        assert!(AbiType::Struct(vec![]).accepts(&s));
        assert!(s.shape().accepts(&s));
        assert!(!AbiType::Struct(vec![AbiType::Int]).accepts(&s));
        assert!(!AbiType::String.accepts(&AbiValue::ByteArray(vec![])));
        assert!(AbiType::Map(Box::new(AbiType::Any)).accepts(&AbiValue::map([("k", true.into())])));
    }
}
