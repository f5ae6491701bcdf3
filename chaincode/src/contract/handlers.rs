//! Operation handlers.
//!
//! Each handler receives already arity-checked arguments and returns the
//! success payload. Writes are applied one at a time with no rollback: if a
//! later write fails, earlier writes from the same call stay in state.

use crate::contract::{ContractConfig, ContractError, QueryResultsWriter};
use crate::index::{INDEX_ENTRY_VALUE, owner_index_key};
use crate::shim::ChaincodeStub;
use crate::types::Aerogerador;

/// Prefix of the keys written by `initLedger`.
pub const RECORD_KEY_PREFIX: &str = "AEROGERADOR";

/// Inclusive lower bound of the `queryAll` scan.
pub const QUERY_ALL_START_KEY: &str = "AEROGERADOR0";

/// Exclusive upper bound of the `queryAll` scan.
pub const QUERY_ALL_END_KEY: &str = "AEROGERADOR999";

/// Records written by `initLedger`, in key order.
#[must_use]
pub fn seed_records() -> [Aerogerador; 4] {
    [
        Aerogerador::new("RS", "José", "Em operacao", "Balanceado"),
        Aerogerador::new("RS", "Matheus", "Falha", "Sem dados"),
        Aerogerador::new("RJ", "Eduardo", "Em operacao", "Desbalanceado"),
        Aerogerador::new("MG", "Ricardo", "Em operacao", "Balanceado"),
    ]
}

/// Store key for the `ordinal`th seed record.
#[must_use]
pub fn record_key(ordinal: usize) -> String {
    format!("{RECORD_KEY_PREFIX}{ordinal}")
}

pub(super) fn init_ledger<S: ChaincodeStub + ?Sized>(
    stub: &mut S,
) -> Result<Vec<u8>, ContractError> {
    for (ordinal, record) in seed_records().iter().enumerate() {
        let key = record_key(ordinal);
        stub.put_state(&key, &record.to_bytes()?)?;
        tracing::debug!(key = %key, "seeded record");
    }
    Ok(Vec::new())
}

pub(super) fn criar_aerogerador<S: ChaincodeStub + ?Sized>(
    stub: &mut S,
    args: &[String],
) -> Result<Vec<u8>, ContractError> {
    let [key, localizacao, operador, status, balanceado] = args else {
        return Err(ContractError::ArgumentCount {
            expected: 5,
            actual: args.len(),
        });
    };

    let record = Aerogerador::new(
        localizacao.as_str(),
        operador.as_str(),
        status.as_str(),
        balanceado.as_str(),
    );
    let bytes = record.to_bytes()?;
    stub.put_state(key, &bytes)?;

    let index_key = owner_index_key(&*stub, &record.operador, key)?;
    stub.put_state(&index_key, &INDEX_ENTRY_VALUE)?;

    Ok(bytes)
}

pub(super) fn query_aerogerador<S: ChaincodeStub + ?Sized>(
    stub: &S,
    args: &[String],
    config: &ContractConfig,
) -> Result<Vec<u8>, ContractError> {
    let [key] = args else {
        return Err(ContractError::ArgumentCount {
            expected: 1,
            actual: args.len(),
        });
    };

    match stub.get_state(key) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(e) if config.strict_decoding => Err(e.into()),
        Err(e) => {
            tracing::warn!(key = %key, "ignoring read failure: {e}");
            Ok(Vec::new())
        }
    }
}

pub(super) fn alterar_operador_aerogerador<S: ChaincodeStub + ?Sized>(
    stub: &mut S,
    args: &[String],
    config: &ContractConfig,
) -> Result<Vec<u8>, ContractError> {
    let [key, operador] = args else {
        return Err(ContractError::ArgumentCount {
            expected: 2,
            actual: args.len(),
        });
    };

    let (mut record, existed) = load_record(&*stub, key, config)?;
    let previous_operador = std::mem::replace(&mut record.operador, operador.clone());

    let bytes = record.to_bytes()?;
    stub.put_state(key, &bytes)?;

    if config.reindex_on_update && previous_operador != record.operador {
        if existed {
            let stale_key = owner_index_key(&*stub, &previous_operador, key)?;
            stub.del_state(&stale_key)?;
        }
        let index_key = owner_index_key(&*stub, &record.operador, key)?;
        stub.put_state(&index_key, &INDEX_ENTRY_VALUE)?;
    }

    Ok(bytes)
}

/// Read and decode the record at `key`.
///
/// Returns the record and whether it was present. In lenient mode read and
/// decode failures yield the zero record; in strict mode they are errors,
/// as is a missing key.
fn load_record<S: ChaincodeStub + ?Sized>(
    stub: &S,
    key: &str,
    config: &ContractConfig,
) -> Result<(Aerogerador, bool), ContractError> {
    let stored = match stub.get_state(key) {
        Ok(stored) => stored,
        Err(e) if config.strict_decoding => return Err(e.into()),
        Err(e) => {
            tracing::warn!(key, "ignoring read failure: {e}");
            None
        }
    };

    match stored {
        Some(bytes) if config.strict_decoding => Ok((Aerogerador::from_bytes(&bytes)?, true)),
        Some(bytes) => Ok((Aerogerador::from_bytes_lenient(&bytes), true)),
        None if config.strict_decoding => Err(ContractError::NotFound(key.to_owned())),
        None => Ok((Aerogerador::default(), false)),
    }
}

pub(super) fn query_all<S: ChaincodeStub + ?Sized>(
    stub: &S,
    config: &ContractConfig,
) -> Result<Vec<u8>, ContractError> {
    let mut results = stub.get_state_by_range(QUERY_ALL_START_KEY, QUERY_ALL_END_KEY)?;

    let mut writer = QueryResultsWriter::new();
    for entry in results.by_ref() {
        let entry = entry?;
        if config.strict_decoding {
            Aerogerador::from_bytes(&entry.value)?;
        }
        writer.push(&entry)?;
    }
    results.close();

    let records = writer.len();
    let payload = writer.finish();
    tracing::debug!(
        records,
        "- queryAll:\n {}",
        String::from_utf8_lossy(&payload)
    );
    Ok(payload)
}
