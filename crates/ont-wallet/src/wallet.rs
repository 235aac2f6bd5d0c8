//! Wallet documents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ont_primitives::ec::PrivateKey;
use ont_primitives::kdf::ScryptParams;

use crate::account::EncryptedAccount;
use crate::WalletError;

/// A parsed wallet: scrypt settings shared by every account, plus the
/// accounts themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub scrypt: ScryptParams,
    #[serde(default)]
    pub accounts: Vec<EncryptedAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_account_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl Wallet {
    pub fn new(name: &str) -> Self {
        Wallet {
            name: name.to_string(),
            version: "1.1".to_string(),
            scrypt: ScryptParams::default(),
            accounts: Vec::new(),
            create_time: None,
            default_account_address: None,
            extra: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, WalletError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WalletError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Look up an account by its base58 address.
    pub fn account(&self, address: &str) -> Option<&EncryptedAccount> {
        self.accounts.iter().find(|a| a.address == address)
    }

    /// The account flagged `isDefault`, else the one named by
    /// `defaultAccountAddress`.
    pub fn default_account(&self) -> Option<&EncryptedAccount> {
        self.accounts.iter().find(|a| a.is_default).or_else(|| {
            self.default_account_address
                .as_deref()
                .and_then(|addr| self.account(addr))
        })
    }

    /// Decrypt the key of the account at `address` with the wallet's
    /// scrypt settings.
    pub fn decrypt_account(&self, address: &str, password: &str) -> Result<PrivateKey, WalletError> {
        self.account(address)
            .ok_or_else(|| WalletError::AccountNotFound(address.to_string()))?
            .decrypt_private_key(password, &self.scrypt)
    }

    /// Seal `private_key` and append it as a new account.
    pub fn add_account(
        &mut self,
        private_key: &PrivateKey,
        password: &str,
        label: &str,
    ) -> Result<&EncryptedAccount, WalletError> {
        let mut account = EncryptedAccount::encrypt(private_key, password, label, &self.scrypt)?;
        if let Some(existing) = self.accounts.iter().position(|a| a.address == account.address) {
            return Err(WalletError::InvalidAccount(format!(
                "account {} already present at index {existing}",
                account.address
            )));
        }
        account.is_default = self.accounts.is_empty();
        self.accounts.push(account);
        Ok(&self.accounts[self.accounts.len() - 1])
    }
}

impl FromStr for Wallet {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Wallet::from_json(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ont_primitives::ec::Curve;

    fn cheap_wallet() -> Wallet {
        let mut w = Wallet::new("test");
        w.scrypt = ScryptParams { n: 16, r: 1, p: 1, dk_len: 64 };
        w
    }

    #[test]
    fn test_add_and_lookup() {
        let mut w = cheap_wallet();
        let k1 = PrivateKey::random(Curve::P256);
        let k2 = PrivateKey::random(Curve::Sm2P256V1);
        let a1 = w.add_account(&k1, "pw", "first").unwrap().address.clone();
        let a2 = w.add_account(&k2, "pw", "second").unwrap().address.clone();

        assert_eq!(w.default_account().unwrap().address, a1);
        assert_eq!(w.account(&a2).unwrap().label, "second");
        assert!(w.account("AXXXX").is_none());
        assert!(w.add_account(&k1, "pw", "dup").is_err());

        let recovered = w.decrypt_account(&a2, "pw").unwrap();
        assert_eq!(*recovered.to_bytes(), *k2.to_bytes());
        assert!(matches!(
            w.decrypt_account("AXXXX", "pw"),
            Err(WalletError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_passthrough_fields() {
        let mut w = cheap_wallet();
        w.create_time = Some("2018-06-01T00:00:00Z".into());
        w.extra = Some(serde_json::json!({"note": 1}));
        w.add_account(&PrivateKey::random(Curve::P256), "pw", "").unwrap();

        let json = w.to_json().unwrap();
        assert!(json.contains("\"createTime\""));
        assert!(json.contains("\"enc-alg\":\"aes-256-gcm\""));
        assert!(!json.contains("defaultAccountAddress"));
        assert_eq!(json.parse::<Wallet>().unwrap(), w);
    }

    #[test]
    fn test_default_account_falls_back_to_address_field() {
        let mut w = cheap_wallet();
        w.add_account(&PrivateKey::random(Curve::P256), "pw", "").unwrap();
        w.add_account(&PrivateKey::random(Curve::P256), "pw", "").unwrap();
        w.accounts[0].is_default = false;
        assert!(w.default_account().is_none());
        w.default_account_address = Some(w.accounts[1].address.clone());
        assert_eq!(w.default_account().unwrap().address, w.accounts[1].address);
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(Wallet::from_json("{"), Err(WalletError::Json(_))));
        assert!(Wallet::from_json(r#"{"name":"x"}"#).is_err());
    }
}
