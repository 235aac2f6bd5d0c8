//! NeoVM integer byte encoding.
//!
//! Integers are little-endian two's complement with the fewest bytes that
//! preserve the sign; zero is the empty byte string.

use num_bigint::BigInt;
use num_traits::Zero;

/// Encode an integer in NeoVM form.
pub fn int_to_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_signed_bytes_le()
}

/// Decode NeoVM integer bytes. The empty slice is zero.
pub fn int_from_bytes(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        return BigInt::zero();
    }
    BigInt::from_signed_bytes_le(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encodings() {
        let cases: &[(i64, &str)] = &[
            (0, ""),
            (1, "01"),
            (-1, "ff"),
            (127, "7f"),
            (128, "8000"),
            (-128, "80"),
            (-129, "7fff"),
            (255, "ff00"),
            (300, "2c01"),
            (65536, "000001"),
        ];
        for (value, expected) in cases {
            let n = BigInt::from(*value);
            assert_eq!(hex::encode(int_to_bytes(&n)), *expected, "{value}");
            assert_eq!(int_from_bytes(&hex::decode(expected).unwrap()), n);
        }
    }

    #[test]
    fn test_non_minimal_input_still_decodes() {
        assert_eq!(int_from_bytes(&[0x01, 0x00, 0x00]), BigInt::from(1));
        assert_eq!(int_from_bytes(&[0xff, 0xff]), BigInt::from(-1));
    }
}
