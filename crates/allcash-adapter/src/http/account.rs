/*
[INPUT]:  Authenticated client
[OUTPUT]: Account summary and open positions
[POS]:    HTTP layer - account endpoints (failures propagate to caller)
[UPDATE]: When adding new account endpoints or changing response lookups
*/

use reqwest::Method;
use serde_json::Value;

use crate::http::{AllcashClient, AllcashError, Result};
use crate::types::JsonMap;

impl AllcashClient {
    /// Get account information (balance, equity, ...)
    ///
    /// GET /account
    pub async fn get_account_info(&self) -> Result<JsonMap> {
        self.request(Method::GET, "/account", None).await
    }

    /// Get all open positions
    ///
    /// GET /positions
    ///
    /// A response without a `positions` key yields an empty list.
    pub async fn get_open_positions(&self) -> Result<Vec<JsonMap>> {
        let mut response = self.request(Method::GET, "/positions", None).await?;
        let positions = match response.remove("positions") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(positions)) => positions,
            Some(other) => {
                return Err(AllcashError::InvalidResponse(format!(
                    "positions must be an array, got {other}"
                )));
            }
        };

        positions
            .into_iter()
            .map(|position| match position {
                Value::Object(map) => Ok(map),
                other => Err(AllcashError::InvalidResponse(format!(
                    "position entry must be an object, got {other}"
                ))),
            })
            .collect()
    }
}
