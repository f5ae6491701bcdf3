//! Protobuf invocation envelope.
//!
//! Hosts deliver an invocation as an encoded `ChaincodeInput` whose first
//! argument is the function name, and expect an encoded `Response` back.
//! The message layouts follow the ledger peer protocol:
//!
//! ```text
//! message ChaincodeInput { repeated bytes args = 1; bool is_init = 3; }
//! message Response { int32 status = 1; string message = 2; bytes payload = 3; }
//! ```

use prost::Message;

use crate::contract::SmartContract;
use crate::shim::{self, ChaincodeStub};

/// Arguments of one invocation.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ChaincodeInput {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub args: Vec<Vec<u8>>,
    #[prost(bool, tag = "3")]
    pub is_init: bool,
}

/// Outcome of one invocation.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Response {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(bytes = "vec", tag = "3")]
    pub payload: Vec<u8>,
}

impl ChaincodeInput {
    /// Build an input from string arguments, function name first.
    #[must_use]
    pub fn from_strings<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            args: args.into_iter().map(|arg| arg.into().into_bytes()).collect(),
            is_init: false,
        }
    }
}

impl From<shim::Response> for Response {
    fn from(response: shim::Response) -> Self {
        Self {
            status: response.status,
            message: response.message,
            payload: response.payload,
        }
    }
}

impl From<Response> for shim::Response {
    fn from(response: Response) -> Self {
        Self {
            status: response.status,
            message: response.message,
            payload: response.payload,
        }
    }
}

/// Decode an invocation, run it and encode the result.
///
/// Undecodable input and non-UTF-8 arguments produce an encoded failure
/// response rather than an error.
pub fn invoke_encoded<S: ChaincodeStub + ?Sized>(
    contract: &SmartContract,
    stub: &mut S,
    input: &[u8],
) -> Vec<u8> {
    let response = match ChaincodeInput::decode(input) {
        Ok(input) => run(contract, stub, input),
        Err(e) => {
            tracing::warn!("failed to decode chaincode input: {e}");
            shim::Response::error(format!("failed to decode chaincode input: {e}"))
        }
    };
    Response::from(response).encode_to_vec()
}

fn run<S: ChaincodeStub + ?Sized>(
    contract: &SmartContract,
    stub: &mut S,
    input: ChaincodeInput,
) -> shim::Response {
    if input.is_init {
        return contract.init(stub);
    }

    let mut args = Vec::with_capacity(input.args.len());
    for (position, arg) in input.args.into_iter().enumerate() {
        match String::from_utf8(arg) {
            Ok(arg) => args.push(arg),
            Err(_) => {
                return shim::Response::error(format!("argument {position} is not valid UTF-8"));
            }
        }
    }
    contract.invoke_args(stub, args)
}
