/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

pub mod enums;
pub mod requests;
pub mod symbol;

pub use enums::*;
pub use requests::*;
pub use symbol::normalize_symbol;

/// Request envelope: flat JSON object built per call
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Decoded response object, returned to callers verbatim
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
