//! Password-based key derivation.
//!
//! Wallet records protect private keys with a key stretched from the
//! password by scrypt. The parameters travel with the wallet document, so
//! `ScryptParams` (de)serializes with the wallet field names.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::PrimitivesError;

/// Upper bound on scrypt working memory (128 * n * r bytes).
const MAX_SCRYPT_MEMORY: u64 = 1 << 30;

/// scrypt cost parameters as stored in wallet files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// CPU/memory cost; must be a power of two greater than one.
    pub n: u64,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
    /// Derived key length in bytes (32 or 64).
    #[serde(rename = "dkLen")]
    pub dk_len: usize,
}

impl Default for ScryptParams {
    fn default() -> Self {
        ScryptParams { n: 16384, r: 8, p: 8, dk_len: 64 }
    }
}

impl ScryptParams {
    /// Check the parameters without running scrypt.
    ///
    /// # Returns
    /// `Ok(())` or a `KeyDerivation` error describing the first violation.
    pub fn validate(&self) -> Result<(), PrimitivesError> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(PrimitivesError::KeyDerivation(format!(
                "n must be a power of two greater than 1, got {}",
                self.n
            )));
        }
        if self.r == 0 || self.p == 0 {
            return Err(PrimitivesError::KeyDerivation(
                "r and p must be positive".to_string(),
            ));
        }
        if self.dk_len != 32 && self.dk_len != 64 {
            return Err(PrimitivesError::KeyDerivation(format!(
                "dkLen must be 32 or 64, got {}",
                self.dk_len
            )));
        }
        let memory = 128u64
            .saturating_mul(self.n)
            .saturating_mul(self.r as u64);
        if memory > MAX_SCRYPT_MEMORY {
            return Err(PrimitivesError::KeyDerivation(format!(
                "scrypt memory cost {} exceeds limit {}",
                memory, MAX_SCRYPT_MEMORY
            )));
        }
        Ok(())
    }
}

/// Derive `params.dk_len` bytes from a password with scrypt.
///
/// Pure and deterministic: identical inputs always produce identical keys.
///
/// # Arguments
/// * `password` - The UTF-8 password bytes.
/// * `salt` - The per-account salt.
/// * `params` - scrypt cost parameters.
///
/// # Returns
/// The derived key (zeroized on drop), or `KeyDerivation` for bad parameters.
pub fn derive(
    password: &[u8],
    salt: &[u8],
    params: &ScryptParams,
) -> Result<Zeroizing<Vec<u8>>, PrimitivesError> {
    params.validate()?;
    let log_n = params.n.trailing_zeros() as u8;
    let scrypt_params = scrypt::Params::new(log_n, params.r, params.p, params.dk_len)
        .map_err(|e| PrimitivesError::KeyDerivation(e.to_string()))?;
    let mut out = Zeroizing::new(vec![0u8; params.dk_len]);
    scrypt::scrypt(password, salt, &scrypt_params, &mut out)
        .map_err(|e| PrimitivesError::KeyDerivation(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap(dk_len: usize) -> ScryptParams {
        ScryptParams { n: 16, r: 1, p: 1, dk_len }
    }

    #[test]
    fn test_rfc7914_vector() {
        // RFC 7914 section 12, first vector: empty password and salt.
        let params = ScryptParams { n: 16, r: 1, p: 1, dk_len: 64 };
        let key = derive(b"", b"", &params).unwrap();
        assert_eq!(
            hex::encode(&key[..]),
            "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442\
             fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
        );
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive(b"123456", b"salt-salt-salt-1", &cheap(32)).unwrap();
        let b = derive(b"123456", b"salt-salt-salt-1", &cheap(32)).unwrap();
        let c = derive(b"123457", b"salt-salt-salt-1", &cheap(32)).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let bad = [
            ScryptParams { n: 1000, ..cheap(64) },
            ScryptParams { n: 0, ..cheap(64) },
            ScryptParams { r: 0, ..cheap(64) },
            ScryptParams { p: 0, ..cheap(64) },
            cheap(48),
            ScryptParams { n: 1 << 24, r: 8, p: 1, dk_len: 64 },
        ];
        for params in bad {
            assert!(
                matches!(derive(b"pw", b"salt", &params), Err(PrimitivesError::KeyDerivation(_))),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_params_wallet_json_shape() {
        let params: ScryptParams =
            serde_json::from_str(r#"{"p":8,"n":16384,"r":8,"dkLen":64}"#).unwrap();
        assert_eq!(params, ScryptParams::default());
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(json["dkLen"], 64);
    }
}
