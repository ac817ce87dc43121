/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::LiquidityOperation;

// ### Broker

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccount {
    #[serde(rename = "subaccountId", deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub sub_account_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableFuturesResponse {
    #[serde(rename = "subaccountId", deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub sub_account_id: String,
    #[serde(default)]
    pub enable_futures: bool,
    #[serde(default)]
    pub update_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableMarginResponse {
    #[serde(rename = "subaccountId", deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub sub_account_id: String,
    #[serde(default)]
    pub enable_margin: bool,
    #[serde(default)]
    pub update_time: i64,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyResponse {
    #[serde(rename = "subaccountId", deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub sub_account_id: String,
    pub api_key: String,
    pub secret_key: String,
    #[serde(default, alias = "catTrade")]
    pub can_trade: bool,
    #[serde(default)]
    pub margin_trade: bool,
    #[serde(default)]
    pub futures_trade: bool,
}

impl std::fmt::Debug for CreateApiKeyResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateApiKeyResponse")
            .field("sub_account_id", &self.sub_account_id)
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .field("can_trade", &self.can_trade)
            .field("margin_trade", &self.margin_trade)
            .field("futures_trade", &self.futures_trade)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeApiPermissionResponse {
    #[serde(rename = "subaccountId", deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub sub_account_id: String,
    #[serde(alias = "apikey")]
    pub api_key: String,
    #[serde(default, alias = "catTrade")]
    pub can_trade: bool,
    #[serde(default)]
    pub margin_trade: bool,
    #[serde(default)]
    pub futures_trade: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCommissionResponse {
    #[serde(rename = "subaccountId", deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub sub_account_id: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub maker_commission: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub taker_commission: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub margin_maker_commission: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub margin_taker_commission: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountTransferResponse {
    #[serde(deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub txn_id: String,
    #[serde(default, rename = "clientTranId")]
    pub client_transfer_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub from_id: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub to_id: String,
    pub asset: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub qty: Decimal,
    #[serde(default)]
    pub time: i64,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_string_or_number")]
    pub txn_id: String,
    #[serde(default, rename = "clientTranId")]
    pub client_transfer_id: String,
    #[serde(default)]
    pub status: String,
}

// ### BSwap

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub pool_id: i64,
    pub pool_name: String,
    #[serde(default)]
    pub assets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_asset: String,
    pub base_asset: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub quote_qty: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub base_qty: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub slippage: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub swap_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    #[serde(default)]
    pub swap_id: i64,
    #[serde(default)]
    pub swap_time: i64,
    #[serde(default)]
    pub status: i32,
    pub quote_asset: String,
    pub base_asset: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub quote_qty: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub base_qty: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub slippage: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolLiquidity {
    pub pool_id: i64,
    pub pool_name: String,
    #[serde(default)]
    pub update_time: i64,
    /// Pool reserves by asset
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_map")]
    pub liquidity: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub share: PoolShare,
}

/// The caller's share of a pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolShare {
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub share_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub share_percentage: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_map")]
    pub asset: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityOperationId {
    pub operation_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityOperationRecord {
    pub operation_id: i64,
    pub pool_id: i64,
    #[serde(default)]
    pub pool_name: String,
    pub operation: LiquidityOperation,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub update_time: i64,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub share_amount: Decimal,
}

// ### Deposit

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    #[serde(default)]
    pub insert_time: i64,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub amount: Decimal,
    #[serde(alias = "asset")]
    pub coin: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address_tag: String,
    #[serde(default)]
    pub tx_id: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub transfer_type: i32,
    #[serde(default)]
    pub confirm_times: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub address: String,
    pub coin: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub url: String,
}

mod serde_helpers {
    use super::{BTreeMap, Decimal};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        decimal_from_value(Value::deserialize(deserializer)?)
    }

    pub fn deserialize_decimal_map<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values: BTreeMap<String, Value> = Option::deserialize(deserializer)?.unwrap_or_default();
        values
            .into_iter()
            .map(|(asset, value)| decimal_from_value::<D::Error>(value).map(|amount| (asset, amount)))
            .collect()
    }

    fn decimal_from_value<E: serde::de::Error>(value: Value) -> Result<Decimal, E> {
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }

        if let Some(raw) = value.as_str() {
            if raw.trim().is_empty() {
                return Ok(Decimal::ZERO);
            }
            return Decimal::from_str(raw)
                .or_else(|_| Decimal::from_scientific(raw))
                .map_err(E::custom);
        }

        if value.is_number() {
            let raw = value.to_string();
            return Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .map_err(E::custom);
        }

        Err(E::custom("invalid decimal value"))
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    /// Identifiers arrive as JSON strings on some endpoints and numbers on others.
    pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(raw) => Ok(raw),
            Value::Number(number) => Ok(number.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }
}
