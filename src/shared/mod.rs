/// Shared kernel: error types, result aliases and path pre-checks
pub mod error;
pub mod result;
pub mod security;

pub use result::{Result, StreamResult};
