//! Chain access: ABIs, the read seam and its JSON-RPC implementation

pub mod interfaces;
mod reader;
pub mod units;

pub use reader::{read, CallFailure, ContractReader, RetryingReader, RpcReader};
