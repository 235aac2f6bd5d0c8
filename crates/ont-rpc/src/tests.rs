//! Tests for the WebSocket and JSON-RPC clients against in-process
//! servers.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ont_abi::{decode_result, AbiType, AbiValue};
use ont_script::Address;
use ont_transaction::TransactionBuilder;

use crate::{JsonRpcClient, JsonRpcConfig, RpcClient, RpcError, SendMode, WsRpcClient, WsRpcConfig};

fn raw_tx() -> (String, String) {
    let payer = Address::new([3u8; 20]);
    let tx = TransactionBuilder::new()
        .with_nonce(42)
        .build_invoke(&payer, "hello", &[AbiValue::from("world")], "500", "20000", &payer)
        .unwrap();
    (tx.to_hex().unwrap(), tx.hash_hex())
}

fn ack(req: &Value, result: Value) -> Value {
    json!({
        "Action": "sendrawtransaction",
        "Desc": "SUCCESS",
        "Error": 0,
        "Id": req["Id"],
        "Result": result,
        "Version": "1.0.0",
    })
}

fn notify(hash: &str, state: u8) -> Value {
    json!({
        "Action": "Notify",
        "Desc": "SUCCESS",
        "Error": 0,
        "Result": {"TxHash": hash, "State": state, "GasConsumed": 10000, "Notify": []},
        "Version": "1.0.0",
    })
}

// -----------------------------------------------------------------------
// WebSocket
// -----------------------------------------------------------------------

/// Accept one connection and answer each request with the frames the
/// handler returns. `None` closes the connection.
async fn serve<F>(handler: F) -> String
where
    F: Fn(&Value) -> Option<Vec<Value>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if !msg.is_text() {
                continue;
            }
            let req: Value = serde_json::from_str(msg.to_text().unwrap()).unwrap();
            if req["Action"] == "heartbeat" {
                continue;
            }
            match handler(&req) {
                Some(frames) => {
                    for frame in frames {
                        ws.send(Message::text(frame.to_string())).await.unwrap();
                    }
                }
                None => {
                    let _ = ws.close(None).await;
                    break;
                }
            }
        }
    });
    format!("ws://{addr}")
}

fn ws_config(url: String) -> WsRpcConfig {
    WsRpcConfig {
        url,
        request_timeout: Duration::from_secs(2),
        notify_timeout: Duration::from_secs(2),
        heartbeat_interval: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn test_ws_simulate() {
    let url = serve(|req| {
        assert_eq!(req["PreExec"], "1");
        assert_eq!(req["Version"], "1.0.0");
        Some(vec![ack(req, json!({"State": 1, "Gas": 20000, "Result": req["Data"]}))])
    })
    .await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    let resp = client.send("00d1", SendMode::Simulate).await.unwrap();
    let result = resp.pre_exec_result().unwrap();
    assert_eq!(result.gas, 20000);
    assert_eq!(result.result, json!("00d1"));
    assert_eq!(client.pending_count(), 0);
}

#[tokio::test]
async fn test_ws_simulate_bool_results() {
    let url = serve(|req| {
        let leaf = if req["Data"] == "aa" { "01" } else { "00" };
        Some(vec![ack(req, json!({"State": 1, "Gas": 20000, "Result": leaf}))])
    })
    .await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    for (raw, expected) in [("aa", true), ("bb", false)] {
        let resp = client.send(raw, SendMode::Simulate).await.unwrap();
        let pre = resp.pre_exec_result().unwrap();
        assert_eq!(pre.state, 1);
        let value = decode_result(&pre.result, &AbiType::Bool).unwrap();
        assert_eq!(value, AbiValue::Bool(expected));
    }
}

#[tokio::test]
async fn test_ws_concurrent_requests_are_correlated() {
    let url = serve(|req| {
        Some(vec![ack(req, json!({"State": 1, "Gas": 0, "Result": req["Data"]}))])
    })
    .await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    let (a, b) = tokio::join!(
        client.send("aa", SendMode::Simulate),
        client.send("bb", SendMode::Simulate)
    );
    assert_eq!(a.unwrap().pre_exec_result().unwrap().result, json!("aa"));
    assert_eq!(b.unwrap().pre_exec_result().unwrap().result, json!("bb"));
}

#[tokio::test]
async fn test_ws_broadcast_resolves_on_ack() {
    let (raw, hash) = raw_tx();
    let expected = hash.clone();
    let url = serve(move |req| {
        assert!(req.get("PreExec").is_none());
        Some(vec![ack(req, json!(expected))])
    })
    .await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    let resp = client.send(&raw, SendMode::Broadcast).await.unwrap();
    assert_eq!(resp.tx_hash(), Some(hash.as_str()));
}

#[tokio::test]
async fn test_ws_broadcast_and_wait_resolves_on_notify() {
    let (raw, hash) = raw_tx();
    let notified = hash.clone();
    // The notification overtakes the acknowledgement.
    let url = serve(move |req| Some(vec![notify(&notified, 1), ack(req, json!(notified))])).await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    let resp = client.send(&raw, SendMode::BroadcastAndWait).await.unwrap();
    assert_eq!(resp.action, "Notify");
    let n = resp.execute_notify().unwrap();
    assert_eq!(n.tx_hash, hash);
    assert_eq!(n.gas_consumed, 10000);
    assert_eq!(client.pending_count(), 0);
}

#[tokio::test]
async fn test_ws_failed_execution() {
    let (raw, hash) = raw_tx();
    let url = serve(move |req| Some(vec![ack(req, json!(hash)), notify(&hash, 0)])).await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    assert!(matches!(
        client.send(&raw, SendMode::BroadcastAndWait).await,
        Err(RpcError::RemoteExecution { .. })
    ));
}

#[tokio::test]
async fn test_ws_remote_error() {
    let url = serve(|req| {
        Some(vec![json!({
            "Action": "sendrawtransaction",
            "Desc": "INTERNAL ERROR",
            "Error": 43001,
            "Id": req["Id"],
            "Result": "",
            "Version": "1.0.0",
        })])
    })
    .await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    match client.send("00", SendMode::Broadcast).await {
        Err(RpcError::RemoteExecution { code, desc }) => {
            assert_eq!(code, 43001);
            assert_eq!(desc, "INTERNAL ERROR");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_ws_timeout_cleans_up() {
    let url = serve(|_| Some(vec![])).await;
    let mut config = ws_config(url);
    config.request_timeout = Duration::from_millis(100);
    let client = WsRpcClient::connect(config).await.unwrap();

    assert!(matches!(
        client.send("00", SendMode::Broadcast).await,
        Err(RpcError::Timeout)
    ));
    assert_eq!(client.pending_count(), 0);
}

#[tokio::test]
async fn test_ws_connection_drop_fails_pending() {
    let (raw, _) = raw_tx();
    let url = serve(|_| None).await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();

    assert!(matches!(
        client.send(&raw, SendMode::BroadcastAndWait).await,
        Err(RpcError::Connection(_))
    ));
    assert_eq!(client.pending_count(), 0);
    assert!(matches!(
        client.send("00", SendMode::Broadcast).await,
        Err(RpcError::Connection(_))
    ));
}

#[tokio::test]
async fn test_ws_connect_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    assert!(matches!(
        WsRpcClient::connect(ws_config(format!("ws://{addr}"))).await,
        Err(RpcError::Connection(_))
    ));
}

#[tokio::test]
async fn test_ws_rejects_unparseable_transaction_for_wait() {
    let url = serve(|req| Some(vec![ack(req, json!(""))])).await;
    let client = WsRpcClient::connect(ws_config(url)).await.unwrap();
    assert!(matches!(
        client.send("zz", SendMode::BroadcastAndWait).await,
        Err(RpcError::InvalidRequest(_))
    ));
    assert_eq!(client.pending_count(), 0);
}

// -----------------------------------------------------------------------
// JSON-RPC over HTTP
// -----------------------------------------------------------------------

fn http_config(url: String) -> JsonRpcConfig {
    JsonRpcConfig {
        url,
        request_timeout: Duration::from_secs(2),
        notify_timeout: Duration::from_secs(2),
        poll_interval: Duration::from_millis(20),
    }
}

fn rpc_reply(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "desc": "SUCCESS", "error": 0, "id": 1, "jsonrpc": "2.0", "result": result
    }))
}

#[tokio::test]
async fn test_http_simulate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0", "method": "sendrawtransaction", "params": ["00d1", 1]
        })))
        .respond_with(rpc_reply(json!({"State": 1, "Gas": "20000", "Result": "01"})))
        .mount(&server)
        .await;

    let client = JsonRpcClient::new(http_config(server.uri())).unwrap();
    let resp = client.send("00d1", SendMode::Simulate).await.unwrap();
    assert_eq!(resp.action, "sendrawtransaction");
    assert_eq!(resp.pre_exec_result().unwrap().result, json!("01"));
}

#[tokio::test]
async fn test_http_simulation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_reply(json!({"State": 0, "Gas": 0, "Result": null})))
        .mount(&server)
        .await;

    let client = JsonRpcClient::new(http_config(server.uri())).unwrap();
    assert!(matches!(
        client.send("00d1", SendMode::Simulate).await,
        Err(RpcError::RemoteExecution { .. })
    ));
}

#[tokio::test]
async fn test_http_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "desc": "INTERNAL ERROR", "error": 43001, "id": 1, "jsonrpc": "2.0", "result": ""
        })))
        .mount(&server)
        .await;

    let client = JsonRpcClient::new(http_config(server.uri())).unwrap();
    assert!(matches!(
        client.send("00d1", SendMode::Broadcast).await,
        Err(RpcError::RemoteExecution { code: 43001, .. })
    ));
}

#[tokio::test]
async fn test_http_broadcast_and_wait_polls_for_event() {
    let (raw, hash) = raw_tx();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "sendrawtransaction"})))
        .respond_with(rpc_reply(json!(hash)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "getsmartcodeevent", "params": [hash]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "desc": "UNKNOWN TRANSACTION", "error": 44001, "id": 1, "jsonrpc": "2.0", "result": ""
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "getsmartcodeevent"})))
        .respond_with(rpc_reply(
            json!({"TxHash": hash, "State": 1, "GasConsumed": 0, "Notify": []}),
        ))
        .mount(&server)
        .await;

    let client = JsonRpcClient::new(http_config(server.uri())).unwrap();
    let resp = client.send(&raw, SendMode::BroadcastAndWait).await.unwrap();
    assert_eq!(resp.action, "Notify");
    assert_eq!(resp.execute_notify().unwrap().tx_hash, hash);
}

#[tokio::test]
async fn test_http_poll_times_out() {
    let (raw, hash) = raw_tx();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "sendrawtransaction"})))
        .respond_with(rpc_reply(json!(hash)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "getsmartcodeevent"})))
        .respond_with(rpc_reply(Value::Null))
        .mount(&server)
        .await;

    let mut config = http_config(server.uri());
    config.notify_timeout = Duration::from_millis(100);
    let client = JsonRpcClient::new(config).unwrap();
    assert!(matches!(
        client.send(&raw, SendMode::BroadcastAndWait).await,
        Err(RpcError::Timeout)
    ));
}
