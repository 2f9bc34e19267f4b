/*
[INPUT]:  Endpoint arguments (symbol, amount, price levels, order ids)
[OUTPUT]: Validated request structs and the JSON envelopes sent to the broker
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::Serialize;

use super::Payload;
use super::enums::{CloseType, Direction, ExpirationType};
use super::symbol::normalize_symbol;
use crate::http::{AllcashError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTradeRequest {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub direction: Direction,
    pub expiration_type: ExpirationType,
    pub close_type: CloseType,
    pub is_demo: bool,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
}

impl OpenTradeRequest {
    /// Validate arguments and build the body for `POST /trades/open`.
    ///
    /// A take profit or stop loss of zero means "unset" and is left out.
    pub fn new(
        direction: Direction,
        symbol: &str,
        amount: Decimal,
        take_profit: Decimal,
        stop_loss: Decimal,
        is_demo: bool,
    ) -> Result<Self> {
        let symbol = normalize_symbol(symbol)?;
        if amount <= Decimal::ZERO {
            return Err(AllcashError::InvalidArgument(format!(
                "amount must be positive (got {amount})"
            )));
        }

        Ok(Self {
            symbol,
            amount,
            direction,
            expiration_type: ExpirationType::CandleClose,
            close_type: CloseType::FiveMinutes,
            is_demo,
            take_profit: price_level("take_profit", take_profit)?,
            stop_loss: price_level("stop_loss", stop_loss)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseTradeRequest {
    pub order_id: String,
    #[serde(rename = "isDemo")]
    pub is_demo: bool,
}

impl CloseTradeRequest {
    pub fn new(order_id: &str, is_demo: bool) -> Result<Self> {
        Ok(Self {
            order_id: require_order_id(order_id)?.to_string(),
            is_demo,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyTradeRequest {
    pub is_demo: bool,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
}

impl ModifyTradeRequest {
    /// True when neither level would change
    pub fn is_empty(&self) -> bool {
        self.take_profit.is_none() && self.stop_loss.is_none()
    }

    /// Human-readable summary of the requested changes, e.g. `TP=1.5, SL=1.25`
    pub fn describe_changes(&self) -> String {
        let mut changes = Vec::new();
        if let Some(tp) = self.take_profit {
            changes.push(format!("TP={tp}"));
        }
        if let Some(sl) = self.stop_loss {
            changes.push(format!("SL={sl}"));
        }
        changes.join(", ")
    }
}

/// Serialize a request struct into a flat JSON envelope
pub fn to_payload<T: Serialize>(request: &T) -> Result<Payload> {
    match serde_json::to_value(request)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AllcashError::InvalidArgument(format!(
            "request must serialize to a JSON object, got {other}"
        ))),
    }
}

pub(crate) fn require_order_id(order_id: &str) -> Result<&str> {
    let trimmed = order_id.trim();
    if trimmed.is_empty() {
        return Err(AllcashError::InvalidArgument(
            "order_id must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

fn price_level(name: &str, value: Decimal) -> Result<Option<Decimal>> {
    if value < Decimal::ZERO {
        return Err(AllcashError::InvalidArgument(format!(
            "{name} must not be negative (got {value})"
        )));
    }
    Ok((value > Decimal::ZERO).then_some(value))
}
