//! Wind turbine ledger contract.
//!
//! An invocation names one [`Operation`] and passes positional string
//! arguments. The contract checks the argument count, runs the handler
//! against the host's [`ChaincodeStub`] and wraps the outcome in a
//! [`Response`]. Handlers keep no state between invocations.
//!
//! # Operations
//!
//! | name | args | payload |
//! |---|---|---|
//! | `initLedger` | - | empty |
//! | `criarAerogerador` | key, localizacao, operador, status, balanceado | new record |
//! | `queryAerogerador` | key | stored bytes (empty if absent) |
//! | `alterarOperadorAerogerador` | key, operador | updated record |
//! | `queryAll` | - | JSON array of `{"Key", "Record"}` |

mod error;
mod handlers;
mod operation;
mod results;

pub use error::ContractError;
pub use handlers::{
    QUERY_ALL_END_KEY, QUERY_ALL_START_KEY, RECORD_KEY_PREFIX, record_key, seed_records,
};
pub use operation::Operation;
pub use results::QueryResultsWriter;

use crate::shim::{ChaincodeStub, Response, function_and_parameters};

/// Behavior switches for the contract.
///
/// Both default to `false`, which reproduces the ledger's established
/// behavior: read and decode failures become zero-valued records, and the
/// operator index is never touched by updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractConfig {
    /// Treat read failures, undecodable records and updates of missing keys
    /// as errors instead of zero-valued records.
    pub strict_decoding: bool,
    /// Move the operator index entry when an update changes the operator.
    pub reindex_on_update: bool,
}

impl ContractConfig {
    /// Strict decoding with the index left as-is.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict_decoding: true,
            reindex_on_update: false,
        }
    }
}

/// The ledger contract.
#[derive(Debug, Clone, Default)]
pub struct SmartContract {
    config: ContractConfig,
}

impl SmartContract {
    #[must_use]
    pub const fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Instantiation entry point. Touches no state.
    pub fn init<S: ChaincodeStub + ?Sized>(&self, _stub: &mut S) -> Response {
        tracing::info!("contract instantiated");
        Response::success(Vec::new())
    }

    /// Run one invocation.
    pub fn invoke<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &mut S,
        function: &str,
        args: &[String],
    ) -> Response {
        let span = tracing::info_span!("invoke", function);
        let _enter = span.enter();

        tracing::info!("Function name is: {function}");
        tracing::info!("Args length is: {}", args.len());

        let Some(operation) = Operation::from_name(function) else {
            let err = ContractError::UnknownFunction(function.to_owned());
            tracing::warn!("{err}");
            return Response::error(err.to_string());
        };

        match self.dispatch(stub, operation, args) {
            Ok(payload) => {
                tracing::debug!(
                    write = operation.is_write(),
                    payload_len = payload.len(),
                    "invocation succeeded"
                );
                Response::success(payload)
            }
            Err(err) => {
                tracing::warn!("invocation failed: {err}");
                Response::error(err.to_string())
            }
        }
    }

    /// Run one invocation whose first argument is the function name.
    pub fn invoke_args<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &mut S,
        args: Vec<String>,
    ) -> Response {
        let (function, params) = function_and_parameters(args);
        self.invoke(stub, &function, &params)
    }

    fn dispatch<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &mut S,
        operation: Operation,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        operation.check_arity(args)?;

        match operation {
            Operation::InitLedger => handlers::init_ledger(stub),
            Operation::CriarAerogerador => handlers::criar_aerogerador(stub, args),
            Operation::QueryAerogerador => handlers::query_aerogerador(&*stub, args, &self.config),
            Operation::AlterarOperadorAerogerador => {
                handlers::alterar_operador_aerogerador(stub, args, &self.config)
            }
            Operation::QueryAll => handlers::query_all(&*stub, &self.config),
        }
    }
}
