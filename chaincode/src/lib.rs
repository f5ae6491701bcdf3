// Life of an invocation:
// 1. The host delivers a function name and string arguments
//    (directly, or as an encoded `ChaincodeInput`)
// 2. The contract looks the name up in the operation table and checks
//    the argument count
// 3. The handler reads and writes records through the host's stub:
//     - Records are JSON objects stored under plain keys
//     - Created records also get an `owner~key` composite index entry
//     - `queryAll` range-scans the `AEROGERADOR` key space
// 4. The outcome goes back as a status/message/payload response
//
// System components:
//  - State access interface (stub trait, composite keys, memory and file state)
//  - Record codec
//  - Operation dispatcher and handlers

pub mod config;
pub mod contract;
pub mod index;
pub mod proto;
pub mod shim;
pub mod types;

#[cfg(test)]
mod e2e_tests;

pub use contract::{ContractConfig, ContractError, Operation, SmartContract};
pub use shim::{ChaincodeStub, FileState, MemoryState, Response};
pub use types::Aerogerador;
