//! Signatures in the ledger's serialized form.
//!
//! A serialized signature is the scheme byte followed by `r || s`; SM2
//! signatures additionally carry the signer's distinguishing ID, NUL
//! terminated, between the two.

use crate::ec::curve::SignatureScheme;
use crate::PrimitivesError;

/// Default SM2 distinguishing ID used when signing.
pub const SM2_DEFAULT_ID: &str = "1234567812345678";

/// Length of the `r || s` component.
pub const SIGNATURE_VALUE_LEN: usize = 64;

/// A signature with its scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    scheme: SignatureScheme,
    user_id: Option<String>,
    value: [u8; SIGNATURE_VALUE_LEN],
}

impl Signature {
    /// Wrap a raw `r || s` value.
    ///
    /// SM2 signatures get the default distinguishing ID.
    pub fn new(scheme: SignatureScheme, value: &[u8]) -> Result<Self, PrimitivesError> {
        let value: [u8; SIGNATURE_VALUE_LEN] = value.try_into().map_err(|_| {
            PrimitivesError::InvalidSignature(format!(
                "signature value must be {} bytes, got {}",
                SIGNATURE_VALUE_LEN,
                value.len()
            ))
        })?;
        let user_id = match scheme {
            SignatureScheme::Sm3WithSm2 => Some(SM2_DEFAULT_ID.to_string()),
            SignatureScheme::Sha256WithEcdsa => None,
        };
        Ok(Signature { scheme, user_id, value })
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// SM2 distinguishing ID carried by the signature, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The raw `r || s` bytes.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Serialize as `scheme || [id || 0x00] || r || s`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let id_len = self.user_id.as_ref().map(|id| id.len() + 1).unwrap_or(0);
        let mut out = Vec::with_capacity(1 + id_len + SIGNATURE_VALUE_LEN);
        out.push(self.scheme.label());
        if let Some(id) = &self.user_id {
            out.extend_from_slice(id.as_bytes());
            out.push(0);
        }
        out.extend_from_slice(&self.value);
        out
    }

    /// Parse a serialized signature.
    ///
    /// A bare 64-byte value is accepted as SHA256withECDSA.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PrimitivesError> {
        if data.len() == SIGNATURE_VALUE_LEN {
            return Signature::new(SignatureScheme::Sha256WithEcdsa, data);
        }
        let (&label, rest) = data
            .split_first()
            .ok_or_else(|| PrimitivesError::InvalidSignature("empty signature".to_string()))?;
        let scheme = SignatureScheme::from_label(label)?;
        match scheme {
            SignatureScheme::Sha256WithEcdsa => Signature::new(scheme, rest),
            SignatureScheme::Sm3WithSm2 => {
                let nul = rest.iter().position(|&b| b == 0).ok_or_else(|| {
                    PrimitivesError::InvalidSignature("SM2 signature lacks an ID terminator".to_string())
                })?;
                let id = std::str::from_utf8(&rest[..nul])
                    .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
                let mut sig = Signature::new(scheme, &rest[nul + 1..])?;
                sig.user_id = Some(id.to_string());
                Ok(sig)
            }
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Signature::from_bytes(&hex::decode(hex_str)?)
    }
}
