//! Private keys on the supported curves.
//!
//! A private key is a 32-byte scalar tagged with its curve.

use std::fmt;

use p256::ecdsa::signature::Signer;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::ec::curve::{Curve, KeyType, SignatureScheme};
use crate::ec::public_key::{PublicInner, PublicKey};
use crate::ec::signature::{Signature, SM2_DEFAULT_ID};
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

#[derive(Clone)]
enum SecretInner {
    P256(p256::ecdsa::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
    Sm2(sm2::SecretKey),
}

/// A private key for signing transactions.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SecretInner,
}

impl PrivateKey {
    /// Generate a random key on `curve` using the OS random number generator.
    pub fn random(curve: Curve) -> Self {
        let inner = match curve {
            Curve::P256 => SecretInner::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
            Curve::Secp256k1 => SecretInner::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng)),
            Curve::Sm2P256V1 => SecretInner::Sm2(sm2::SecretKey::random(&mut OsRng)),
        };
        PrivateKey { inner }
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `curve` - The curve the scalar belongs to.
    /// * `bytes` - Exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, or `InvalidPrivateKey` if the length is wrong or the
    /// scalar is zero or not below the curve order.
    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let invalid = |e: String| PrimitivesError::InvalidPrivateKey(format!("{curve}: {e}"));
        let inner = match curve {
            Curve::P256 => SecretInner::P256(
                p256::ecdsa::SigningKey::from_slice(bytes).map_err(|e| invalid(e.to_string()))?,
            ),
            Curve::Secp256k1 => SecretInner::Secp256k1(
                k256::ecdsa::SigningKey::from_slice(bytes).map_err(|e| invalid(e.to_string()))?,
            ),
            Curve::Sm2P256V1 => SecretInner::Sm2(
                sm2::SecretKey::from_slice(bytes).map_err(|e| invalid(e.to_string()))?,
            ),
        };
        Ok(PrivateKey { inner })
    }

    pub fn from_hex(curve: Curve, hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        PrivateKey::from_bytes(curve, &bytes)
    }

    /// The 32-byte big-endian scalar, zeroized on drop.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_BYTES_LEN]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_BYTES_LEN]);
        match &self.inner {
            SecretInner::P256(sk) => out.copy_from_slice(&sk.to_bytes()),
            SecretInner::Secp256k1(sk) => out.copy_from_slice(&sk.to_bytes()),
            SecretInner::Sm2(sk) => out.copy_from_slice(&sk.to_bytes()),
        }
        out
    }

    pub fn curve(&self) -> Curve {
        match self.inner {
            SecretInner::P256(_) => Curve::P256,
            SecretInner::Secp256k1(_) => Curve::Secp256k1,
            SecretInner::Sm2(_) => Curve::Sm2P256V1,
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.curve().key_type()
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.curve().scheme()
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        let inner = match &self.inner {
            SecretInner::P256(sk) => PublicInner::P256(sk.verifying_key().clone()),
            SecretInner::Secp256k1(sk) => PublicInner::Secp256k1(sk.verifying_key().clone()),
            SecretInner::Sm2(sk) => PublicInner::Sm2(sk.public_key()),
        };
        PublicKey { inner }
    }

    /// Sign `message` with the key's scheme.
    ///
    /// ECDSA keys hash with SHA-256 and use RFC6979 nonces; SM2 keys hash
    /// with SM3 over the default user ID.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, PrimitivesError> {
        let failed = |e: String| PrimitivesError::InvalidSignature(format!("signing failed: {e}"));
        let value = match &self.inner {
            SecretInner::P256(sk) => {
                let sig: p256::ecdsa::Signature =
                    sk.try_sign(message).map_err(|e| failed(e.to_string()))?;
                sig.to_bytes().to_vec()
            }
            SecretInner::Secp256k1(sk) => {
                let sig: k256::ecdsa::Signature =
                    sk.try_sign(message).map_err(|e| failed(e.to_string()))?;
                sig.to_bytes().to_vec()
            }
            SecretInner::Sm2(sk) => {
                let signer = sm2::dsa::SigningKey::new(SM2_DEFAULT_ID, sk)
                    .map_err(|e| failed(e.to_string()))?;
                let sig: sm2::dsa::Signature =
                    signer.try_sign(message).map_err(|e| failed(e.to_string()))?;
                sig.to_bytes().to_vec()
            }
        };
        Signature::new(self.scheme(), &value)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve())
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}
