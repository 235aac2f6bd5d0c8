//! Tracking of contract deployments.
//!
//! A deployment starts `Pending` and moves exactly once, to `Deployed`
//! when the node reports successful execution or to `Failed` otherwise.
//! Any number of tasks may query or await the outcome.

use ont_script::Address;
use ont_transaction::{Payload, Transaction};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::client::RpcClient;
use crate::error::RpcError;
use crate::types::{RpcResponse, SendMode};

/// Where a deployment stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentState {
    /// Submitted or about to be; no outcome yet.
    Pending,
    /// Executed on chain.
    Deployed,
    /// Rejected, failed to execute, or never confirmed.
    Failed(String),
}

impl DeploymentState {
    /// Whether the state is final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeploymentState::Pending)
    }
}

/// Outcome tracker for one deploy transaction.
#[derive(Debug)]
pub struct Deployment {
    contract: Address,
    tx_hash: String,
    state: watch::Sender<DeploymentState>,
}

impl Deployment {
    /// Start tracking `tx`, which must carry a deploy payload.
    pub fn track(tx: &Transaction) -> Result<Self, RpcError> {
        let contract = match &tx.payload {
            Payload::Deploy(deploy) => deploy.contract_address(),
            Payload::Invoke(_) => {
                return Err(RpcError::InvalidRequest(
                    "not a deploy transaction".to_string(),
                ))
            }
        };
        let (state, _) = watch::channel(DeploymentState::Pending);
        Ok(Self {
            contract,
            tx_hash: tx.hash_hex(),
            state,
        })
    }

    /// Address the contract is deployed at.
    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Display hash of the deploy transaction.
    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    /// Current state.
    pub fn state(&self) -> DeploymentState {
        self.state.borrow().clone()
    }

    /// A receiver observing every state change.
    pub fn subscribe(&self) -> watch::Receiver<DeploymentState> {
        self.state.subscribe()
    }

    /// Record the result of submitting the deployment.
    ///
    /// Only the first outcome counts; later calls leave a terminal state
    /// untouched. Returns whether the state changed.
    pub fn resolve(&self, outcome: &Result<RpcResponse, RpcError>) -> bool {
        let next = match outcome {
            Ok(_) => DeploymentState::Deployed,
            Err(e) => DeploymentState::Failed(e.to_string()),
        };
        let changed = self.state.send_if_modified(|state| {
            if state.is_terminal() {
                return false;
            }
            *state = next.clone();
            true
        });
        if changed {
            match &next {
                DeploymentState::Failed(reason) => {
                    warn!(tx = %self.tx_hash, reason = %reason, "deployment failed")
                }
                _ => info!(tx = %self.tx_hash, contract = %self.contract.to_hex_reversed(), "contract deployed"),
            }
        }
        changed
    }

    /// Submit `tx` through `client`, wait for its notification and record
    /// the outcome.
    pub async fn run<C>(&self, client: &C, tx: &Transaction) -> DeploymentState
    where
        C: RpcClient + Sync,
    {
        let outcome = client.send_transaction(tx, SendMode::BroadcastAndWait).await;
        self.resolve(&outcome);
        self.state()
    }

    /// Wait until the deployment reaches a terminal state.
    pub async fn wait(&self) -> DeploymentState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(DeploymentState::is_terminal).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use ont_transaction::TransactionBuilder;

    struct Stub(Result<(), &'static str>);

    impl RpcClient for Stub {
        async fn send(&self, _raw: &str, mode: SendMode) -> Result<RpcResponse, RpcError> {
            assert_eq!(mode, SendMode::BroadcastAndWait);
            match self.0 {
                Ok(()) => Ok(RpcResponse {
                    action: "Notify".into(),
                    desc: "SUCCESS".into(),
                    error: 0,
                    result: serde_json::json!({"TxHash": "00", "State": 1}),
                    id: None,
                    version: "1.0.0".into(),
                }),
                Err(desc) => Err(RpcError::RemoteExecution { code: 1, desc: desc.into() }),
            }
        }
    }

    fn deploy_tx() -> Transaction {
        let payer = Address::new([1u8; 20]);
        TransactionBuilder::new()
            .with_nonce(9)
            .build_deploy(&[0x51, 0x66], "c", "1", "a", "e", "d", false, "0", "20000", &payer)
            .unwrap()
    }

    #[tokio::test]
    async fn test_deployed() {
        let tx = deploy_tx();
        let d = Deployment::track(&tx).unwrap();
        assert_eq!(d.state(), DeploymentState::Pending);
        assert_eq!(d.contract_address(), Address::from_vm_code(&[0x51, 0x66]));
        assert_eq!(d.run(&Stub(Ok(())), &tx).await, DeploymentState::Deployed);
        assert_eq!(d.wait().await, DeploymentState::Deployed);
    }

    #[tokio::test]
    async fn test_failed_is_sticky() {
        let tx = deploy_tx();
        let d = Deployment::track(&tx).unwrap();
        let state = d.run(&Stub(Err("boom")), &tx).await;
        assert!(matches!(&state, DeploymentState::Failed(reason) if reason.contains("boom")));
        assert!(!d.resolve(&Err(RpcError::Timeout)));
        assert!(!d.resolve(&Ok(RpcResponse {
            action: String::new(),
            desc: String::new(),
            error: 0,
            result: serde_json::Value::Null,
            id: None,
            version: String::new(),
        })));
        assert_eq!(d.state(), state);
    }

    #[tokio::test]
    async fn test_waiters_see_outcome() {
        let tx = deploy_tx();
        let d = Arc::new(Deployment::track(&tx).unwrap());
        let waiter = {
            let d = Arc::clone(&d);
            tokio::spawn(async move { d.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        d.resolve(&Err(RpcError::Timeout));
        let state = waiter.await.unwrap();
        assert!(matches!(state, DeploymentState::Failed(_)));
    }

    #[test]
    fn test_rejects_invoke() {
        let payer = Address::new([1u8; 20]);
        let tx = TransactionBuilder::new()
            .build_invoke(&payer, "f", &[], "0", "0", &payer)
            .unwrap();
        assert!(Deployment::track(&tx).is_err());
    }
}
