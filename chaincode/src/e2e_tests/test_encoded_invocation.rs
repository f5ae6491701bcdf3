//! Test full invocations delivered as encoded protobuf envelopes.

use prost::Message;

use crate::e2e_tests::helpers::*;
use crate::proto::{self, ChaincodeInput, invoke_encoded};
use crate::shim;

fn invoke(ledger: &mut TestLedger, args: &[&str]) -> proto::Response {
    let input = ChaincodeInput::from_strings(args.iter().copied());
    let output = invoke_encoded(&ledger.contract, &mut ledger.state, &input.encode_to_vec());
    proto::Response::decode(output.as_slice()).unwrap()
}

#[test]
fn test_encoded_lifecycle() {
    let mut ledger = TestLedger::new();

    let seeded = invoke(&mut ledger, &["initLedger"]);
    assert_eq!(seeded.status, shim::OK);
    assert!(seeded.payload.is_empty());

    let changed = invoke(
        &mut ledger,
        &["alterarOperadorAerogerador", "AEROGERADOR0", "Carlos"],
    );
    assert_eq!(changed.status, shim::OK);

    let listed = invoke(&mut ledger, &["queryAll"]);
    assert_eq!(listed.status, shim::OK);
    let direct = ledger.invoke("queryAll", &[]);
    assert_eq!(listed.payload, direct.payload);
    assert!(payload_str(&direct).contains(r#""operador":"Carlos""#));
}

#[test]
fn test_encoded_failure_carries_message() {
    let mut ledger = TestLedger::new();

    let response = invoke(&mut ledger, &["queryAerogerador"]);

    assert_eq!(response.status, shim::ERROR);
    assert_eq!(
        response.message,
        "Número incorreto de argumentos. Esperado 1 argumento."
    );
    assert!(response.payload.is_empty());
}

#[test]
fn test_encoded_empty_input_is_unknown_function() {
    let mut ledger = TestLedger::new();

    let output = invoke_encoded(&ledger.contract, &mut ledger.state, &[]);
    let response = proto::Response::decode(output.as_slice()).unwrap();

    assert_eq!(response.status, shim::ERROR);
    assert_eq!(response.message, "Invalid Smart Contract function name.");
    assert!(ledger.state.is_empty());
}

#[test]
fn test_encoded_and_direct_agree() {
    let mut encoded = TestLedger::new();
    let mut direct = TestLedger::new();
    let call = ["criarAerogerador", "X1", "RS", "Ana", "OK", "Balanceado"];

    let via_proto = invoke(&mut encoded, &call);
    let via_args = direct.invoke(call[0], &call[1..]);

    assert_eq!(shim::Response::from(via_proto), via_args);
    assert_eq!(
        encoded.state.keys().collect::<Vec<_>>(),
        direct.state.keys().collect::<Vec<_>>()
    );
}
