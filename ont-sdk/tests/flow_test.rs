//! End-to-end flow: wallet key, contract call, signing, wire bytes and
//! result decoding.

use num_bigint::BigInt;
use serde_json::json;

use ont_sdk::abi::{decode_result, AbiFile, AbiType, AbiValue};
use ont_sdk::primitives::ec::{Curve, PrivateKey};
use ont_sdk::primitives::kdf::ScryptParams;
use ont_sdk::script::Address;
use ont_sdk::transaction::{Transaction, TransactionBuilder};
use ont_sdk::wallet::Wallet;

const ABI: &str = r#"{
    "hash": "0xd0ed0f908896b4eb916584d461ca3e8b60b52c36",
    "entrypoint": "Main",
    "functions": [
        {"name": "testHello", "parameters": [
            {"name": "msgBool", "type": "Boolean"},
            {"name": "msgInt", "type": "Integer"},
            {"name": "msgByteArray", "type": "ByteArray"},
            {"name": "msgStr", "type": "String"},
            {"name": "msgAddress", "type": "Address"}], "returntype": "Array"}
    ]
}"#;

fn wallet_with_keys() -> (Wallet, String, String) {
    let mut wallet = Wallet::new("flow");
    wallet.scrypt = ScryptParams { n: 16, r: 1, p: 1, dk_len: 64 };
    let payer = wallet
        .add_account(&PrivateKey::random(Curve::P256), "pw", "payer")
        .unwrap()
        .address
        .clone();
    let cosigner = wallet
        .add_account(&PrivateKey::random(Curve::Sm2P256V1), "pw", "cosigner")
        .unwrap()
        .address
        .clone();
    (wallet, payer, cosigner)
}

#[test]
fn test_invoke_flow() {
    let (wallet, payer_addr, cosigner_addr) = wallet_with_keys();
    let wallet = Wallet::from_json(&wallet.to_json().unwrap()).unwrap();
    let payer_key = wallet.decrypt_account(&payer_addr, "pw").unwrap();
    let cosigner_key = wallet.decrypt_account(&cosigner_addr, "pw").unwrap();
    let payer: Address = payer_addr.parse().unwrap();

    let abi = AbiFile::from_json(ABI).unwrap();
    let function = abi.function("testHello").unwrap();
    let args = vec![
        AbiValue::from(false),
        AbiValue::from(300i64),
        AbiValue::from(vec![1u8, 2, 3]),
        AbiValue::from("string"),
        AbiValue::from(payer),
    ];
    function.check_arguments(&args).unwrap();

    let mut tx = TransactionBuilder::new()
        .with_nonce(7)
        .build_invoke(
            &abi.contract_address().unwrap(),
            &function.name,
            &args,
            "500",
            "20000",
            &payer,
        )
        .unwrap();
    tx.sign(&payer_key).unwrap();
    tx.sign(&cosigner_key).unwrap();

    let parsed = Transaction::from_hex(&tx.to_hex().unwrap()).unwrap();
    assert!(parsed.verify_signatures());
    assert_eq!(parsed.signers().len(), 2);
    assert_eq!(parsed.signers()[0], payer);
    assert_eq!(parsed.payer, payer);

    // What a node would return for the echoed arguments.
    let shape = AbiType::ArrayOf(vec![
        AbiType::Bool,
        AbiType::Int,
        AbiType::ByteArray,
        AbiType::String,
        AbiType::Address,
    ]);
    let returned = json!(["00", "2c01", "010203", "737472696e67", payer.to_hex()]);
    let decoded = decode_result(&returned, &shape).unwrap();
    assert_eq!(decoded, AbiValue::Array(args));
    assert_eq!(decoded.as_list().unwrap()[1].as_int(), Some(&BigInt::from(300)));
}

#[test]
fn test_deploy_contract_address_matches_code_hash() {
    let code = vec![0x51u8, 0xc5, 0x6b];
    let payer = Address::new([5u8; 20]);
    let tx = TransactionBuilder::new()
        .build_deploy(&code, "n", "1", "a", "e", "d", true, "0", "30000000", &payer)
        .unwrap();
    match &tx.payload {
        ont_sdk::transaction::Payload::Deploy(d) => {
            assert_eq!(d.contract_address(), Address::from_vm_code(&code))
        }
        other => panic!("unexpected payload {other:?}"),
    }
}
