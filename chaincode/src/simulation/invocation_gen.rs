//! Invocation generator for deterministic simulation testing.
//!
//! Generates random but reproducible invocation argument lists, function
//! name first, including both well-formed and malformed ones.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::contract::{Operation, record_key};

const OPERATORS: [&str; 5] = ["José", "Matheus", "Eduardo", "Ricardo", "Ana"];
const LOCATIONS: [&str; 4] = ["RS", "RJ", "MG", "SC"];
const STATUSES: [&str; 2] = ["Em operacao", "Falha"];
const BALANCE_STATES: [&str; 3] = ["Balanceado", "Desbalanceado", "Sem dados"];
const UNKNOWN_FUNCTIONS: [&str; 4] = ["deleteAerogerador", "queryall", "", "InitLedger"];

/// Configuration for invocation generation.
#[derive(Debug, Clone)]
pub struct InvocationGenConfig {
    /// Probability of generating a malformed invocation (0.0 - 1.0).
    pub malformed_rate: f64,
    /// Probability of a read vs a write (0.0 = always write, 1.0 = always read).
    pub query_rate: f64,
    /// Number of distinct record keys to draw from.
    pub key_pool_size: usize,
}

impl Default for InvocationGenConfig {
    fn default() -> Self {
        Self {
            malformed_rate: 0.0,
            query_rate: 0.4,
            key_pool_size: 12,
        }
    }
}

/// Types of malformations that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformationType {
    /// A known operation with the wrong number of arguments.
    WrongArity,
    /// A function name no operation matches.
    UnknownFunction,
    /// A write to the empty key.
    EmptyKey,
    /// An operator name that cannot be part of a composite key.
    ReservedCharacter,
}

impl MalformationType {
    /// All malformation types.
    pub const ALL: [Self; 4] = [
        Self::WrongArity,
        Self::UnknownFunction,
        Self::EmptyKey,
        Self::ReservedCharacter,
    ];
}

/// Generator for random invocations.
pub struct InvocationGenerator {
    rng: StdRng,
    config: InvocationGenConfig,
    /// Keys both inside and outside the `queryAll` range.
    keys: Vec<String>,
}

impl InvocationGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, InvocationGenConfig::default())
    }

    #[must_use]
    pub fn with_config(seed: u64, config: InvocationGenConfig) -> Self {
        let keys = (0..config.key_pool_size.max(1))
            .map(|i| if i % 3 == 2 { format!("X{i}") } else { record_key(i) })
            .collect();

        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            keys,
        }
    }

    /// Generate the next invocation.
    pub fn next_invocation(&mut self) -> Vec<String> {
        if self.rng.random::<f64>() < self.config.malformed_rate {
            let malformation_idx = self.rng.random_range(0..MalformationType::ALL.len());
            let malformation = MalformationType::ALL[malformation_idx];
            return self.malformed(malformation);
        }

        if self.rng.random::<f64>() < self.config.query_rate {
            if self.rng.random_bool(0.25) {
                return vec![Operation::QueryAll.name().to_owned()];
            }
            return vec![
                Operation::QueryAerogerador.name().to_owned(),
                self.random_key(),
            ];
        }

        match self.rng.random_range(0..20) {
            0 => vec![Operation::InitLedger.name().to_owned()],
            1..=10 => {
                let key = self.random_key();
                let operator = self.random_operator();
                self.criar(key, operator)
            }
            _ => vec![
                Operation::AlterarOperadorAerogerador.name().to_owned(),
                self.random_key(),
                self.random_operator(),
            ],
        }
    }

    /// Generate an invocation with the given malformation.
    pub fn malformed(&mut self, malformation: MalformationType) -> Vec<String> {
        match malformation {
            MalformationType::WrongArity => {
                let operation = [
                    Operation::CriarAerogerador,
                    Operation::QueryAerogerador,
                    Operation::AlterarOperadorAerogerador,
                ][self.rng.random_range(0..3)];
                let expected = operation.arity().unwrap_or_default();
                let mut count = self.rng.random_range(0..=6);
                if count == expected {
                    count += 1;
                }

                let mut invocation = vec![operation.name().to_owned()];
                invocation.extend((0..count).map(|_| self.random_key()));
                invocation
            }
            MalformationType::UnknownFunction => {
                let name = UNKNOWN_FUNCTIONS[self.rng.random_range(0..UNKNOWN_FUNCTIONS.len())];
                vec![name.to_owned(), self.random_key()]
            }
            MalformationType::EmptyKey => {
                let operator = self.random_operator();
                if self.rng.random_bool(0.5) {
                    self.criar(String::new(), operator)
                } else {
                    vec![
                        Operation::AlterarOperadorAerogerador.name().to_owned(),
                        String::new(),
                        operator,
                    ]
                }
            }
            MalformationType::ReservedCharacter => {
                let operator = if self.rng.random_bool(0.5) {
                    "Ana\u{0}"
                } else {
                    "\u{10FFFF}Ana"
                };
                let key = self.random_key();
                if self.rng.random_bool(0.5) {
                    self.criar(key, operator.to_owned())
                } else {
                    vec![
                        Operation::AlterarOperadorAerogerador.name().to_owned(),
                        key,
                        operator.to_owned(),
                    ]
                }
            }
        }
    }

    fn criar(&mut self, key: String, operator: String) -> Vec<String> {
        vec![
            Operation::CriarAerogerador.name().to_owned(),
            key,
            self.pick(&LOCATIONS),
            operator,
            self.pick(&STATUSES),
            self.pick(&BALANCE_STATES),
        ]
    }

    fn random_key(&mut self) -> String {
        self.keys[self.rng.random_range(0..self.keys.len())].clone()
    }

    fn random_operator(&mut self) -> String {
        self.pick(&OPERATORS)
    }

    fn pick(&mut self, values: &[&str]) -> String {
        values[self.rng.random_range(0..values.len())].to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_deterministic() {
        let mut first = InvocationGenerator::new(42);
        let mut second = InvocationGenerator::new(42);

        for _ in 0..100 {
            assert_eq!(first.next_invocation(), second.next_invocation());
        }
    }

    #[test]
    fn test_well_formed_invocations_match_arity() {
        let mut generator = InvocationGenerator::new(7);

        for _ in 0..500 {
            let invocation = generator.next_invocation();
            let operation = Operation::from_name(&invocation[0]).unwrap();
            if let Some(arity) = operation.arity() {
                assert_eq!(invocation.len() - 1, arity, "{invocation:?}");
            }
        }
    }

    #[test]
    fn test_wrong_arity_is_wrong() {
        let mut generator = InvocationGenerator::new(3);

        for _ in 0..100 {
            let invocation = generator.malformed(MalformationType::WrongArity);
            let operation = Operation::from_name(&invocation[0]).unwrap();
            assert_ne!(Some(invocation.len() - 1), operation.arity());
        }
    }

    #[test]
    fn test_key_pool_spans_query_all_range() {
        let generator = InvocationGenerator::new(1);
        let keys = &generator.keys;
        assert!(keys.iter().any(|key| key.starts_with("AEROGERADOR")));
        assert!(keys.iter().any(|key| key.starts_with('X')));
    }
}
