/*
[INPUT]:  Human-readable trading symbols (e.g. "GBP/USD")
[OUTPUT]: Broker path/body form of the symbol (e.g. "GBPUSD")
[POS]:    Data layer - symbol encoding shared by every symbol call site
[UPDATE]: When the broker changes how symbols are encoded
*/

use crate::http::{AllcashError, Result};

/// Strip the `/` separator the broker does not accept in paths or bodies
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let normalized: String = symbol.trim().chars().filter(|c| *c != '/').collect();
    if normalized.is_empty() {
        return Err(AllcashError::InvalidArgument(format!(
            "symbol must not be empty (got {symbol:?})"
        )));
    }
    Ok(normalized)
}
