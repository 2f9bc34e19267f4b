/*
[INPUT]:  Trading symbol
[OUTPUT]: Current market data (bid, ask, ...)
[POS]:    HTTP layer - market data endpoint (failures propagate to caller)
[UPDATE]: When adding market endpoints or changing symbol encoding
*/

use reqwest::Method;

use crate::http::{AllcashClient, Result};
use crate::types::{JsonMap, normalize_symbol};

impl AllcashClient {
    /// Get current market data for a symbol
    ///
    /// GET /market/{symbol}, with `/` stripped from the symbol
    pub async fn get_market_data(&self, symbol: &str) -> Result<JsonMap> {
        let symbol = normalize_symbol(symbol)?;
        self.request_segments(Method::GET, &["market", symbol.as_str()], None)
            .await
    }
}
