/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public AllCash adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;

// Re-export commonly used types from http
pub use http::{AllcashClient, AllcashError, ClientConfig, DEFAULT_BASE_URL, ErrorKind, Result};

// Re-export all types
pub use types::*;
