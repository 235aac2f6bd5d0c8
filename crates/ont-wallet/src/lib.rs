/// Ontology SDK - Wallet documents and encrypted accounts.
///
/// Parses the JSON wallet format, derives account keys from a password
/// with scrypt and AES-256-GCM, and seals new keys in the same scheme.

mod error;
pub use error::WalletError;

pub mod account;
pub mod wallet;

pub use account::{AccountParameters, EncryptedAccount, ENC_ALG, SALT_LEN};
pub use ont_primitives::kdf::ScryptParams;
pub use wallet::Wallet;
