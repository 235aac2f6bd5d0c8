#![deny(missing_docs)]

//! Ontology SDK - Complete SDK.
//!
//! Re-exports all Ontology SDK components for convenient single-crate usage.

pub use ont_primitives as primitives;
pub use ont_script as script;
pub use ont_abi as abi;
pub use ont_transaction as transaction;
pub use ont_wallet as wallet;
pub use ont_rpc as rpc;
