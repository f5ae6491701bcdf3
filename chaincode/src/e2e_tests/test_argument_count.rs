//! Test argument count validation for every operation.

use crate::e2e_tests::helpers::*;

#[test]
fn test_criar_wrong_counts_write_nothing() {
    for arguments in [
        &[][..],
        &["X1"][..],
        &["X1", "RS", "Ana", "OK"][..],
        &["X1", "RS", "Ana", "OK", "Balanceado", "extra"][..],
    ] {
        let mut ledger = TestLedger::new();

        let response = ledger.invoke("criarAerogerador", arguments);

        assert!(!is_ok(&response), "{arguments:?} should fail");
        assert_eq!(
            response.message,
            "Número incorreto de argumentos. Esperado 5 argumentos."
        );
        assert!(ledger.state.is_empty());
    }
}

#[test]
fn test_query_wrong_count() {
    let mut ledger = TestLedger::new();
    ledger.init_ledger();

    for arguments in [&[][..], &["AEROGERADOR0", "AEROGERADOR1"][..]] {
        let response = ledger.invoke("queryAerogerador", arguments);
        assert!(!is_ok(&response));
        assert_eq!(
            response.message,
            "Número incorreto de argumentos. Esperado 1 argumento."
        );
        assert!(response.payload.is_empty());
    }
}

#[test]
fn test_alterar_wrong_count_writes_nothing() {
    let mut ledger = TestLedger::new();
    ledger.init_ledger();
    let before = ledger.state.mutation_count();

    let response = ledger.invoke("alterarOperadorAerogerador", &["AEROGERADOR0"]);

    assert!(!is_ok(&response));
    assert_eq!(
        response.message,
        "Número incorreto de argumentos. Esperado 2 argumentos."
    );
    assert_eq!(ledger.state.mutation_count(), before);
    assert_eq!(ledger.stored_record("AEROGERADOR0").operador, "José");
}

#[test]
fn test_query_all_ignores_arguments() {
    let mut ledger = TestLedger::new();
    ledger.init_ledger();

    let plain = ledger.invoke("queryAll", &[]);
    let extra = ledger.invoke("queryAll", &["ignored", "too"]);

    assert!(is_ok(&extra));
    assert_eq!(plain.payload, extra.payload);
}
