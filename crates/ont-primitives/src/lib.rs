/// Ontology SDK - Cryptographic primitives, hashing, and utilities.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - Binary reader/writer with VarInt length prefixes
/// - Base58 and Base58Check encoding
/// - scrypt password-based key derivation
/// - AES-256-GCM authenticated encryption
/// - Elliptic curve keys and signatures (P-256, secp256k1, SM2)

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod kdf;
pub mod aes;
pub mod ec;

mod error;
pub use error::PrimitivesError;
