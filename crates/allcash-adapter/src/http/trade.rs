/*
[INPUT]:  Order parameters (symbol, amount, TP/SL levels) and order ids
[OUTPUT]: Order ids, close/modify confirmations, order status
[POS]:    HTTP layer - trading endpoints
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::http::routing::OPEN_TRADE_ENDPOINT;
use crate::http::{AllcashClient, AllcashError, Result};
use crate::types::requests::require_order_id;
use crate::types::{
    CloseTradeRequest, Direction, JsonMap, ModifyTradeRequest, OpenTradeRequest, to_payload,
};

const CLOSE_TRADE_ENDPOINT: &str = "/trades/close";
const ORDER_ID_FIELDS: [&str; 2] = ["orderId", "order_id"];

impl AllcashClient {
    /// Open a trade and return the broker's order id.
    ///
    /// POST /trades/open
    ///
    /// Take profit and stop loss of zero are treated as unset.
    pub async fn open_trade(
        &self,
        direction: Direction,
        symbol: &str,
        amount: Decimal,
        take_profit: Decimal,
        stop_loss: Decimal,
    ) -> Result<String> {
        let request = OpenTradeRequest::new(
            direction,
            symbol,
            amount,
            take_profit,
            stop_loss,
            self.is_demo(),
        )?;

        info!(
            symbol = %request.symbol,
            direction = %direction,
            amount = %amount,
            demo = self.is_demo(),
            "placing order"
        );

        let payload = to_payload(&request)?;
        let response = self
            .request(Method::POST, OPEN_TRADE_ENDPOINT, Some(payload))
            .await?;

        let order_id = extract_order_id(&response).ok_or_else(|| {
            AllcashError::InvalidResponse(format!(
                "order placed but no order id in response: {}",
                Value::Object(response.clone())
            ))
        })?;

        info!(
            order_id = %order_id,
            symbol = %request.symbol,
            direction = %direction,
            "order placed"
        );
        Ok(order_id)
    }

    /// Place a buy order.
    ///
    /// Returns the order id, or an empty string if anything went wrong. The
    /// failure is logged, never returned.
    pub async fn place_buy_order(
        &self,
        symbol: &str,
        amount: Decimal,
        take_profit: Decimal,
        stop_loss: Decimal,
    ) -> String {
        self.place_order_or_empty(Direction::Buy, symbol, amount, take_profit, stop_loss)
            .await
    }

    /// Place a sell order. Same contract as [`AllcashClient::place_buy_order`].
    pub async fn place_sell_order(
        &self,
        symbol: &str,
        amount: Decimal,
        take_profit: Decimal,
        stop_loss: Decimal,
    ) -> String {
        self.place_order_or_empty(Direction::Sell, symbol, amount, take_profit, stop_loss)
            .await
    }

    async fn place_order_or_empty(
        &self,
        direction: Direction,
        symbol: &str,
        amount: Decimal,
        take_profit: Decimal,
        stop_loss: Decimal,
    ) -> String {
        match self
            .open_trade(direction, symbol, amount, take_profit, stop_loss)
            .await
        {
            Ok(order_id) => order_id,
            Err(err) => {
                error!(
                    symbol,
                    direction = %direction,
                    amount = %amount,
                    error = %err,
                    "failed to place order"
                );
                String::new()
            }
        }
    }

    /// Close an existing order, propagating any failure.
    ///
    /// POST /trades/close
    pub async fn try_close_order(&self, order_id: &str) -> Result<bool> {
        let request = CloseTradeRequest::new(order_id, self.is_demo())?;
        let payload = to_payload(&request)?;
        let response = self
            .request(Method::POST, CLOSE_TRADE_ENDPOINT, Some(payload))
            .await?;

        let success = success_flag(&response);
        if success {
            info!(order_id = %request.order_id, "closed order");
        } else {
            warn!(order_id = %request.order_id, "broker did not confirm order close");
        }
        Ok(success)
    }

    /// Close an existing order; any failure is logged and reported as `false`
    pub async fn close_order(&self, order_id: &str) -> bool {
        match self.try_close_order(order_id).await {
            Ok(success) => success,
            Err(err) => {
                error!(order_id, error = %err, "error closing order");
                false
            }
        }
    }

    /// Get the status of an order
    ///
    /// GET /trades/{order_id}, with the id escaped as a single path segment
    pub async fn get_order_status(&self, order_id: &str) -> Result<JsonMap> {
        let order_id = require_order_id(order_id)?;
        self.request_segments(Method::GET, &["trades", order_id], None)
            .await
    }

    /// Update take profit and/or stop loss of an open order.
    ///
    /// PUT /trades/{order_id}
    ///
    /// With neither level given nothing is sent and the call reports success.
    pub async fn modify_order(
        &self,
        order_id: &str,
        take_profit: Option<Decimal>,
        stop_loss: Option<Decimal>,
    ) -> Result<bool> {
        let request = ModifyTradeRequest {
            is_demo: self.is_demo(),
            take_profit,
            stop_loss,
        };
        if request.is_empty() {
            debug!(order_id, "no order changes requested");
            return Ok(true);
        }

        let order_id = require_order_id(order_id)?;
        let payload = to_payload(&request)?;
        let response = self
            .request_segments(Method::PUT, &["trades", order_id], Some(payload))
            .await?;

        let success = success_flag(&response);
        if success {
            info!(order_id, changes = %request.describe_changes(), "modified order");
        } else {
            warn!(order_id, changes = %request.describe_changes(), "failed to modify order");
        }
        Ok(success)
    }
}

/// Order id from `orderId`, falling back to the older `order_id` key
fn extract_order_id(response: &JsonMap) -> Option<String> {
    ORDER_ID_FIELDS
        .iter()
        .filter_map(|field| response.get(*field))
        .find_map(|value| match value {
            Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
}

fn success_flag(response: &JsonMap) -> bool {
    response
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_extract_order_id() {
        assert_eq!(
            extract_order_id(&object(json!({"orderId": "abc"}))),
            Some("abc".to_string())
        );
        assert_eq!(
            extract_order_id(&object(json!({"orderId": 42}))),
            Some("42".to_string())
        );
        assert_eq!(
            extract_order_id(&object(json!({"order_id": "legacy"}))),
            Some("legacy".to_string())
        );
        assert_eq!(extract_order_id(&object(json!({"orderId": ""}))), None);
        assert_eq!(extract_order_id(&object(json!({"status": "ok"}))), None);
    }

    #[test]
    fn test_success_flag_defaults_to_false() {
        assert!(success_flag(&object(json!({"success": true}))));
        assert!(!success_flag(&object(json!({"success": false}))));
        assert!(!success_flag(&object(json!({"success": "yes"}))));
        assert!(!success_flag(&object(json!({}))));
    }

    #[tokio::test]
    async fn test_modify_without_changes_is_noop() {
        let client = AllcashClient::with_config(
            "test-key",
            true,
            crate::http::ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        )
        .expect("client init");

        let modified = client
            .modify_order("order-1", None, None)
            .await
            .expect("no-op modify");
        assert!(modified);
    }
}
