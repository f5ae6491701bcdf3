//! Operation table.
//!
//! Maps function names to operations and their expected argument counts.
//! Dispatch matches on [`Operation`] exhaustively, so adding a variant
//! without a handler does not compile.

use crate::contract::ContractError;

/// The operations a contract invocation can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InitLedger,
    CriarAerogerador,
    QueryAerogerador,
    AlterarOperadorAerogerador,
    QueryAll,
}

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Self; 5] = [
        Self::QueryAerogerador,
        Self::InitLedger,
        Self::CriarAerogerador,
        Self::QueryAll,
        Self::AlterarOperadorAerogerador,
    ];

    /// Function name used by callers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InitLedger => "initLedger",
            Self::CriarAerogerador => "criarAerogerador",
            Self::QueryAerogerador => "queryAerogerador",
            Self::AlterarOperadorAerogerador => "alterarOperadorAerogerador",
            Self::QueryAll => "queryAll",
        }
    }

    /// Required number of positional arguments.
    ///
    /// `None` means the operation takes no arguments and ignores any it is
    /// given.
    #[must_use]
    pub const fn arity(self) -> Option<usize> {
        match self {
            Self::InitLedger | Self::QueryAll => None,
            Self::CriarAerogerador => Some(5),
            Self::QueryAerogerador => Some(1),
            Self::AlterarOperadorAerogerador => Some(2),
        }
    }

    /// Whether the operation writes to state.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(
            self,
            Self::InitLedger | Self::CriarAerogerador | Self::AlterarOperadorAerogerador
        )
    }

    /// Look up an operation by function name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operation| operation.name() == name)
    }

    /// Reject argument lists of the wrong length.
    pub fn check_arity(self, args: &[String]) -> Result<(), ContractError> {
        match self.arity() {
            Some(expected) if args.len() != expected => Err(ContractError::ArgumentCount {
                expected,
                actual: args.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
