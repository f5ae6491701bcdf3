//! Test strict decoding of stored records.

use crate::contract::ContractConfig;
use crate::e2e_tests::helpers::*;

#[test]
fn test_strict_alterar_missing_record() {
    let mut ledger = TestLedger::with_config(ContractConfig::strict());

    let response = ledger.invoke("alterarOperadorAerogerador", &["AEROGERADOR7", "Carlos"]);

    assert!(!is_ok(&response));
    assert_eq!(response.message, "Aerogerador AEROGERADOR7 não encontrado.");
    assert!(ledger.state.is_empty());
}

#[test]
fn test_strict_alterar_undecodable_record() {
    let mut ledger = TestLedger::with_config(ContractConfig::strict());
    ledger.put_raw("X1", b"{broken");

    let response = ledger.invoke("alterarOperadorAerogerador", &["X1", "Carlos"]);

    assert!(!is_ok(&response));
    assert_eq!(ledger.state.value("X1"), Some(&b"{broken"[..]));
}

#[test]
fn test_strict_alterar_existing_record() {
    let mut ledger = TestLedger::with_config(ContractConfig::strict());
    ledger.init_ledger();

    let response = ledger.invoke("alterarOperadorAerogerador", &["AEROGERADOR2", "Carlos"]);

    assert!(is_ok(&response));
    assert_eq!(ledger.stored_record("AEROGERADOR2").localizacao, "RJ");
    assert_eq!(ledger.stored_record("AEROGERADOR2").operador, "Carlos");
}

#[test]
fn test_strict_query_all_rejects_bad_record() {
    let mut ledger = TestLedger::with_config(ContractConfig::strict());
    ledger.init_ledger();
    ledger.put_raw("AEROGERADOR1", b"not json");

    let response = ledger.invoke("queryAll", &[]);

    assert!(!is_ok(&response));
    assert!(response.payload.is_empty());
    assert_eq!(ledger.state.open_scans(), 0);
}

#[test]
fn test_lenient_query_all_passes_bad_record_through() {
    let mut ledger = TestLedger::new();
    ledger.put_raw("AEROGERADOR1", b"not json");

    let response = ledger.invoke("queryAll", &[]);

    assert!(is_ok(&response));
    assert_eq!(
        payload_str(&response),
        r#"[{"Key":"AEROGERADOR1", "Record":not json}]"#
    );
}

#[test]
fn test_strict_query_missing_is_still_empty_success() {
    let mut ledger = TestLedger::with_config(ContractConfig::strict());

    let response = ledger.invoke("queryAerogerador", &["AEROGERADOR0"]);

    assert!(is_ok(&response));
    assert!(response.payload.is_empty());
}
