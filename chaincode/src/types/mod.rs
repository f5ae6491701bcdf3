pub mod aerogerador;

pub use aerogerador::{Aerogerador, CodecError};
