//! Transaction assembly from user-facing inputs.
//!
//! Gas values arrive as decimal strings (as typed into a form or read from
//! configuration) and are validated here. The nonce is random unless
//! pinned, after which building is deterministic.

use ont_abi::AbiValue;
use ont_script::Address;
use tracing::debug;

use crate::invoke::build_invoke_script;
use crate::payload::{DeployCode, InvokeCode, Payload};
use crate::transaction::{Transaction, MAX_TX_SIZE};
use crate::TransactionError;

#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    nonce: Option<u32>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        TransactionBuilder::default()
    }

    /// Use a fixed nonce instead of a random one.
    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Build an unsigned contract deployment.
    ///
    /// # Returns
    /// The transaction, or `InvalidTransaction` for empty code, gas values
    /// that are not unsigned integers, or an oversize result.
    #[allow(clippy::too_many_arguments)]
    pub fn build_deploy(
        &self,
        code: &[u8],
        name: &str,
        code_version: &str,
        author: &str,
        email: &str,
        description: &str,
        need_storage: bool,
        gas_price: &str,
        gas_limit: &str,
        payer: &Address,
    ) -> Result<Transaction, TransactionError> {
        if code.is_empty() {
            return Err(TransactionError::InvalidTransaction(
                "contract code is empty".to_string(),
            ));
        }
        let deploy = DeployCode {
            code: code.to_vec(),
            need_storage,
            name: name.to_string(),
            version: code_version.to_string(),
            author: author.to_string(),
            email: email.to_string(),
            description: description.to_string(),
        };
        debug!(contract = %deploy.contract_address().to_hex_reversed(), "building deploy transaction");
        self.assemble(Payload::Deploy(deploy), gas_price, gas_limit, payer)
    }

    /// Build an unsigned call to `function_name` on `contract`.
    pub fn build_invoke(
        &self,
        contract: &Address,
        function_name: &str,
        parameters: &[AbiValue],
        gas_price: &str,
        gas_limit: &str,
        payer: &Address,
    ) -> Result<Transaction, TransactionError> {
        let code = build_invoke_script(contract, function_name, parameters)?;
        debug!(
            contract = %contract.to_hex_reversed(),
            function = function_name,
            args = parameters.len(),
            "building invoke transaction"
        );
        self.assemble(Payload::Invoke(InvokeCode { code }), gas_price, gas_limit, payer)
    }

    fn assemble(
        &self,
        payload: Payload,
        gas_price: &str,
        gas_limit: &str,
        payer: &Address,
    ) -> Result<Transaction, TransactionError> {
        let gas_price = parse_gas("gas price", gas_price)?;
        let gas_limit = parse_gas("gas limit", gas_limit)?;
        let nonce = self.nonce.unwrap_or_else(rand::random);
        let tx = Transaction::new(payload, nonce, gas_price, gas_limit, *payer);

        let size = tx.unsigned_bytes().len();
        if size > MAX_TX_SIZE {
            return Err(TransactionError::InvalidTransaction(format!(
                "transaction is {size} bytes, limit is {MAX_TX_SIZE}"
            )));
        }
        Ok(tx)
    }
}

fn parse_gas(what: &str, value: &str) -> Result<u64, TransactionError> {
    value.trim().parse::<u64>().map_err(|_| {
        TransactionError::InvalidTransaction(format!(
            "{what} must be a non-negative integer, got {value:?}"
        ))
    })
}
