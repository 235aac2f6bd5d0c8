//! Password-protected account records.
//!
//! The private key is sealed with AES-256-GCM under a key stretched from
//! the password:
//!
//! ```text
//! dk    = scrypt(password, salt, n, r, p, 64)
//! nonce = dk[0..12]
//! key   = dk[32..64]
//! aad   = base58 address string
//! blob  = base64(ciphertext || tag)
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use ont_primitives::aes;
use ont_primitives::ec::{Curve, PrivateKey, PublicKey};
use ont_primitives::kdf::{self, ScryptParams};
use ont_script::Address;

use crate::WalletError;

/// The only supported cipher name.
pub const ENC_ALG: &str = "aes-256-gcm";

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length the cipher layout needs.
const DERIVED_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountParameters {
    pub curve: String,
}

/// One account entry of a wallet document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedAccount {
    pub address: String,
    #[serde(rename = "enc-alg")]
    pub enc_alg: String,
    /// base64 `ciphertext || tag`.
    pub key: String,
    pub algorithm: String,
    /// base64, 16 bytes.
    pub salt: String,
    pub parameters: AccountParameters,
    #[serde(default)]
    pub label: String,
    pub public_key: String,
    pub signature_scheme: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub lock: bool,
}

impl EncryptedAccount {
    /// The account address, parsed without touching the key.
    pub fn address(&self) -> Result<Address, WalletError> {
        Ok(Address::from_base58(&self.address)?)
    }

    /// The curve named by `algorithm` and `parameters.curve`.
    pub fn curve(&self) -> Result<Curve, WalletError> {
        Curve::for_algorithm(&self.algorithm, &self.parameters.curve)
            .map_err(|e| WalletError::InvalidAccount(e.to_string()))
    }

    pub fn public_key(&self) -> Result<PublicKey, WalletError> {
        PublicKey::from_hex(&self.public_key)
            .map_err(|e| WalletError::InvalidAccount(format!("publicKey: {e}")))
    }

    /// Recover the account's private key with `password`.
    ///
    /// # Returns
    /// The key, `Authentication` for a wrong password or tampered blob,
    /// `Decryption` when the key does not match the record's public key
    /// or address, `InvalidAccount` for malformed fields, and
    /// `KeyDerivation` for unusable scrypt parameters.
    pub fn decrypt_private_key(
        &self,
        password: &str,
        scrypt: &ScryptParams,
    ) -> Result<PrivateKey, WalletError> {
        if self.enc_alg != ENC_ALG {
            return Err(WalletError::InvalidAccount(format!(
                "unsupported enc-alg {:?}",
                self.enc_alg
            )));
        }
        let curve = self.curve()?;
        let expected_key = self.public_key()?;
        let expected_address = self.address()?;
        let salt = decode_salt(&self.salt)?;
        let sealed = BASE64
            .decode(&self.key)
            .map_err(|e| WalletError::InvalidAccount(format!("key: {e}")))?;

        let derived = derive_key(password, &salt, scrypt)?;
        let plaintext = aes::decrypt(
            &derived[32..64],
            &derived[..aes::NONCE_SIZE],
            self.address.as_bytes(),
            &sealed,
        )
        .map_err(|e| {
            warn!(address = %self.address, "account key failed to authenticate");
            WalletError::from(e)
        })?;

        let private_key = PrivateKey::from_bytes(curve, &plaintext)
            .map_err(|e| WalletError::Decryption(e.to_string()))?;
        let public_key = private_key.public_key();
        if public_key != expected_key {
            return Err(WalletError::Decryption(
                "decrypted key does not match publicKey".to_string(),
            ));
        }
        if Address::from_public_key(&public_key) != expected_address {
            return Err(WalletError::Decryption(
                "decrypted key does not match address".to_string(),
            ));
        }

        debug!(address = %self.address, curve = %curve, "decrypted account key");
        Ok(private_key)
    }

    /// Seal `private_key` into a new record with a random salt.
    pub fn encrypt(
        private_key: &PrivateKey,
        password: &str,
        label: &str,
        scrypt: &ScryptParams,
    ) -> Result<Self, WalletError> {
        let salt: [u8; SALT_LEN] = rand::random();
        let public_key = private_key.public_key();
        let address = Address::from_public_key(&public_key).to_base58();

        let derived = derive_key(password, &salt, scrypt)?;
        let sealed = aes::encrypt(
            &derived[32..64],
            &derived[..aes::NONCE_SIZE],
            address.as_bytes(),
            private_key.to_bytes().as_slice(),
        )?;

        let curve = private_key.curve();
        debug!(address = %address, curve = %curve, "sealed account key");
        Ok(EncryptedAccount {
            address,
            enc_alg: ENC_ALG.to_string(),
            key: BASE64.encode(sealed),
            algorithm: curve.key_type().name().to_string(),
            salt: BASE64.encode(salt),
            parameters: AccountParameters { curve: curve.name().to_string() },
            label: label.to_string(),
            public_key: public_key.to_hex(),
            signature_scheme: curve.scheme().name().to_string(),
            is_default: false,
            lock: false,
        })
    }
}

fn decode_salt(salt: &str) -> Result<[u8; SALT_LEN], WalletError> {
    let bytes = BASE64
        .decode(salt)
        .map_err(|e| WalletError::InvalidAccount(format!("salt: {e}")))?;
    bytes.as_slice().try_into().map_err(|_| {
        WalletError::InvalidAccount(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            bytes.len()
        ))
    })
}

fn derive_key(
    password: &str,
    salt: &[u8],
    scrypt: &ScryptParams,
) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    if scrypt.dk_len != DERIVED_LEN {
        return Err(WalletError::KeyDerivation(format!(
            "account keys need dkLen {DERIVED_LEN}, got {}",
            scrypt.dk_len
        )));
    }
    Ok(kdf::derive(password.as_bytes(), salt, scrypt)?)
}
