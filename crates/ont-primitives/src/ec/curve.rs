//! Algorithm identifiers for keys, curves and signature schemes.
//!
//! Each identifier has a wire label (used in serialized public keys and
//! signatures) and a name (used in wallet files).

use std::fmt;
use std::str::FromStr;

use crate::PrimitivesError;

/// Public key algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Ecdsa,
    Sm2,
}

impl KeyType {
    /// Type byte prefixed to serialized public keys.
    pub fn label(self) -> u8 {
        match self {
            KeyType::Ecdsa => 0x12,
            KeyType::Sm2 => 0x13,
        }
    }

    pub fn from_label(label: u8) -> Result<Self, PrimitivesError> {
        match label {
            0x12 => Ok(KeyType::Ecdsa),
            0x13 => Ok(KeyType::Sm2),
            other => Err(PrimitivesError::UnsupportedKeyType(format!("{other:#04x}"))),
        }
    }

    /// Name used in the `algorithm` field of wallet accounts.
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Ecdsa => "ECDSA",
            KeyType::Sm2 => "SM2",
        }
    }
}

impl FromStr for KeyType {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECDSA" => Ok(KeyType::Ecdsa),
            "SM2" => Ok(KeyType::Sm2),
            other => Err(PrimitivesError::UnsupportedKeyType(other.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Elliptic curve a key lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    P256,
    Secp256k1,
    Sm2P256V1,
}

impl Curve {
    /// Curve byte following the key type in serialized public keys.
    pub fn label(self) -> u8 {
        match self {
            Curve::P256 => 2,
            Curve::Secp256k1 => 5,
            Curve::Sm2P256V1 => 20,
        }
    }

    pub fn from_label(label: u8) -> Result<Self, PrimitivesError> {
        match label {
            2 => Ok(Curve::P256),
            5 => Ok(Curve::Secp256k1),
            20 => Ok(Curve::Sm2P256V1),
            other => Err(PrimitivesError::UnsupportedCurve(format!("label {other}"))),
        }
    }

    /// Name used in the `parameters.curve` field of wallet accounts.
    pub fn name(self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::Secp256k1 => "secp256k1",
            Curve::Sm2P256V1 => "sm2p256v1",
        }
    }

    pub fn key_type(self) -> KeyType {
        match self {
            Curve::P256 | Curve::Secp256k1 => KeyType::Ecdsa,
            Curve::Sm2P256V1 => KeyType::Sm2,
        }
    }

    /// Signature scheme keys on this curve sign with.
    pub fn scheme(self) -> SignatureScheme {
        match self.key_type() {
            KeyType::Ecdsa => SignatureScheme::Sha256WithEcdsa,
            KeyType::Sm2 => SignatureScheme::Sm3WithSm2,
        }
    }

    /// Resolve the curve for a wallet account's `algorithm` and curve name.
    ///
    /// # Returns
    /// The curve, or an error when either name is unknown or the curve
    /// does not belong to the algorithm.
    pub fn for_algorithm(algorithm: &str, curve: &str) -> Result<Self, PrimitivesError> {
        let key_type: KeyType = algorithm.parse()?;
        let curve: Curve = curve.parse()?;
        if curve.key_type() != key_type {
            return Err(PrimitivesError::UnsupportedCurve(format!(
                "{} is not a {} curve",
                curve, key_type
            )));
        }
        Ok(curve)
    }
}

impl FromStr for Curve {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P-256" | "P256" => Ok(Curve::P256),
            "secp256k1" => Ok(Curve::Secp256k1),
            "sm2p256v1" | "SM2P256V1" => Ok(Curve::Sm2P256V1),
            other => Err(PrimitivesError::UnsupportedCurve(other.to_string())),
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signature scheme, serialized as the first byte of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    Sha256WithEcdsa,
    Sm3WithSm2,
}

impl SignatureScheme {
    pub fn label(self) -> u8 {
        match self {
            SignatureScheme::Sha256WithEcdsa => 1,
            SignatureScheme::Sm3WithSm2 => 9,
        }
    }

    pub fn from_label(label: u8) -> Result<Self, PrimitivesError> {
        match label {
            1 => Ok(SignatureScheme::Sha256WithEcdsa),
            9 => Ok(SignatureScheme::Sm3WithSm2),
            other => Err(PrimitivesError::UnsupportedScheme(format!("label {other}"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignatureScheme::Sha256WithEcdsa => "SHA256withECDSA",
            SignatureScheme::Sm3WithSm2 => "SM3withSM2",
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHA256withECDSA" => Ok(SignatureScheme::Sha256WithEcdsa),
            "SM3withSM2" => Ok(SignatureScheme::Sm3WithSm2),
            other => Err(PrimitivesError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_names_resolve() {
        assert_eq!(Curve::for_algorithm("ECDSA", "P-256").unwrap(), Curve::P256);
        assert_eq!(Curve::for_algorithm("SM2", "sm2p256v1").unwrap(), Curve::Sm2P256V1);
        assert_eq!(Curve::for_algorithm("ECDSA", "secp256k1").unwrap(), Curve::Secp256k1);
    }

    #[test]
    fn test_mismatched_or_unknown_names_rejected() {
        assert!(matches!(
            Curve::for_algorithm("SM2", "P-256"),
            Err(PrimitivesError::UnsupportedCurve(_))
        ));
        assert!(matches!(
            Curve::for_algorithm("EdDSA", "ed25519"),
            Err(PrimitivesError::UnsupportedKeyType(_))
        ));
        assert!(matches!(
            "SHA3-256withECDSA".parse::<SignatureScheme>(),
            Err(PrimitivesError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_labels_roundtrip() {
        for curve in [Curve::P256, Curve::Secp256k1, Curve::Sm2P256V1] {
            assert_eq!(Curve::from_label(curve.label()).unwrap(), curve);
            assert_eq!(curve.name().parse::<Curve>().unwrap(), curve);
        }
        for scheme in [SignatureScheme::Sha256WithEcdsa, SignatureScheme::Sm3WithSm2] {
            assert_eq!(SignatureScheme::from_label(scheme.label()).unwrap(), scheme);
        }
        assert_eq!(Curve::Sm2P256V1.scheme(), SignatureScheme::Sm3WithSm2);
        assert_eq!(KeyType::from_label(0x13).unwrap(), KeyType::Sm2);
    }
}
