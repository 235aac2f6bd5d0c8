/// Elliptic curve keys and signatures.
///
/// Accounts sign with ECDSA over P-256 (the default), ECDSA over
/// secp256k1, or SM2 over sm2p256v1. Public keys and signatures use the
/// ledger's own serialization, which tags non-default curves and SM2
/// signatures with their algorithm identifiers.

pub mod curve;
pub mod private_key;
pub mod public_key;
pub mod signature;

pub use curve::{Curve, KeyType, SignatureScheme};
pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
