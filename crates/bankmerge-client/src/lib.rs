pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod merge;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
