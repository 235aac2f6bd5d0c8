/// Ontology SDK - Transaction building, signing, and serialization.
///
/// Provides the `Transaction` type with Deploy and Invoke payloads, the
/// NeoVM invocation script compiler, attributes, signature entries and
/// the `TransactionBuilder` used to assemble them.

pub mod transaction;
pub mod payload;
pub mod attribute;
pub mod signature;
pub mod invoke;
pub mod builder;

mod error;
pub use error::TransactionError;
pub use transaction::{Transaction, MAX_TX_SIZE, TX_VERSION};
pub use payload::{DeployCode, InvokeCode, Payload, TransactionType};
pub use attribute::TxAttribute;
pub use signature::TxSignature;
pub use builder::TransactionBuilder;
