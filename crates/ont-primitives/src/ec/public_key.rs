//! Public keys on the supported curves.
//!
//! Serialized form: a P-256 key is its bare 33-byte compressed point; any
//! other key is `key type || curve label || compressed point`.

use p256::ecdsa::signature::Verifier;
use sm2::elliptic_curve::sec1::ToEncodedPoint;

use crate::ec::curve::{Curve, KeyType, SignatureScheme};
use crate::ec::signature::{Signature, SM2_DEFAULT_ID};
use crate::PrimitivesError;

/// Length of a compressed SEC1 point.
pub const COMPRESSED_LEN: usize = 33;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PublicInner {
    P256(p256::ecdsa::VerifyingKey),
    Secp256k1(k256::ecdsa::VerifyingKey),
    Sm2(sm2::PublicKey),
}

/// A public key for signature verification and address derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) inner: PublicInner,
}

impl PublicKey {
    /// Parse a SEC1 point (compressed or uncompressed) on `curve`.
    pub fn from_sec1(curve: Curve, point: &[u8]) -> Result<Self, PrimitivesError> {
        let invalid = |e: String| PrimitivesError::InvalidPublicKey(format!("{curve}: {e}"));
        let inner = match curve {
            Curve::P256 => PublicInner::P256(
                p256::ecdsa::VerifyingKey::from_sec1_bytes(point).map_err(|e| invalid(e.to_string()))?,
            ),
            Curve::Secp256k1 => PublicInner::Secp256k1(
                k256::ecdsa::VerifyingKey::from_sec1_bytes(point).map_err(|e| invalid(e.to_string()))?,
            ),
            Curve::Sm2P256V1 => PublicInner::Sm2(
                sm2::PublicKey::from_sec1_bytes(point).map_err(|e| invalid(e.to_string()))?,
            ),
        };
        Ok(PublicKey { inner })
    }

    /// Parse the serialized form.
    ///
    /// # Arguments
    /// * `data` - Either a bare SEC1 point (P-256) or a key type byte and
    ///   curve label followed by a SEC1 point.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PrimitivesError> {
        match data.first() {
            None => Err(PrimitivesError::InvalidPublicKey("empty public key".to_string())),
            Some(0x02..=0x04) => PublicKey::from_sec1(Curve::P256, data),
            Some(&tag) => {
                let key_type = KeyType::from_label(tag)?;
                let label = *data.get(1).ok_or_else(|| {
                    PrimitivesError::InvalidPublicKey("missing curve label".to_string())
                })?;
                let curve = Curve::from_label(label)?;
                if curve.key_type() != key_type {
                    return Err(PrimitivesError::UnsupportedCurve(format!(
                        "{curve} is not a {key_type} curve"
                    )));
                }
                PublicKey::from_sec1(curve, &data[2..])
            }
        }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        PublicKey::from_bytes(&hex::decode(hex_str)?)
    }

    pub fn curve(&self) -> Curve {
        match self.inner {
            PublicInner::P256(_) => Curve::P256,
            PublicInner::Secp256k1(_) => Curve::Secp256k1,
            PublicInner::Sm2(_) => Curve::Sm2P256V1,
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.curve().key_type()
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.curve().scheme()
    }

    /// The 33-byte compressed SEC1 point.
    pub fn compressed(&self) -> Vec<u8> {
        match &self.inner {
            PublicInner::P256(vk) => vk.to_encoded_point(true).as_bytes().to_vec(),
            PublicInner::Secp256k1(vk) => vk.to_encoded_point(true).as_bytes().to_vec(),
            PublicInner::Sm2(pk) => pk.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    /// Serialize in the ledger's public key format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let point = self.compressed();
        match self.curve() {
            Curve::P256 => point,
            curve => {
                let mut out = Vec::with_capacity(2 + point.len());
                out.push(curve.key_type().label());
                out.push(curve.label());
                out.extend_from_slice(&point);
                out
            }
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verify `sig` over `message`.
    ///
    /// The message is hashed by the scheme (SHA-256 or SM3 with the SM2
    /// user ID), so callers pass the data that was signed, not a digest of it.
    ///
    /// # Returns
    /// `true` only when the scheme matches this key and the signature verifies.
    pub fn verify(&self, message: &[u8], sig: &Signature) -> bool {
        if sig.scheme() != self.scheme() {
            return false;
        }
        match &self.inner {
            PublicInner::P256(vk) => p256::ecdsa::Signature::from_slice(sig.value())
                .map(|s| vk.verify(message, &s).is_ok())
                .unwrap_or(false),
            PublicInner::Secp256k1(vk) => k256::ecdsa::Signature::from_slice(sig.value())
                .map(|s| vk.verify(message, &s).is_ok())
                .unwrap_or(false),
            PublicInner::Sm2(pk) => {
                let id = sig.user_id().unwrap_or(SM2_DEFAULT_ID);
                let Ok(vk) = sm2::dsa::VerifyingKey::new(id, pk.clone()) else {
                    return false;
                };
                sm2::dsa::Signature::try_from(sig.value())
                    .map(|s| vk.verify(message, &s).is_ok())
                    .unwrap_or(false)
            }
        }
    }
}
