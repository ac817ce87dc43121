/*
[INPUT]:  Caller-supplied endpoint parameters
[OUTPUT]: Typed request structs with mandatory-field validation
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;

use crate::http::{Result, SapiError};

use super::enums::{LiquidityOperation, RemoveLiquidityType};

fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SapiError::mandatory_field(field));
    }
    Ok(())
}

fn require_positive(value: Decimal, field: &str) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(SapiError::mandatory_field(field));
    }
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// ### Broker

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateApiKeyRequest {
    pub sub_account_id: String,
    pub can_trade: bool,
    pub margin_trade: bool,
    pub futures_trade: bool,
}

impl CreateApiKeyRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.sub_account_id, "subAccountId")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteSubApiKeyRequest {
    pub sub_account_id: String,
    pub api_key: String,
}

impl DeleteSubApiKeyRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.sub_account_id, "subAccountId")?;
        require_non_empty(&self.api_key, "subAccountApiKey")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeApiPermissionRequest {
    pub sub_account_id: String,
    pub sub_account_api_key: String,
    pub can_trade: bool,
    pub margin_trade: bool,
    pub futures_trade: bool,
}

impl ChangeApiPermissionRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.sub_account_id, "subAccountId")?;
        require_non_empty(&self.sub_account_api_key, "subAccountApiKey")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeCommissionRequest {
    pub sub_account_id: String,
    pub maker_commission: Decimal,
    pub taker_commission: Decimal,
    pub margin_maker_commission: Decimal,
    pub margin_taker_commission: Decimal,
}

impl ChangeCommissionRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.sub_account_id, "subAccountId")
    }
}

/// Transfer between the master account and sub-accounts.
///
/// At least one of `from_id`/`to_id` is required; an absent side means the
/// broker master account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubAccountTransferRequest {
    pub from_id: Option<String>,
    pub to_id: Option<String>,
    pub client_transfer_id: Option<String>,
    pub asset: String,
    pub amount: Decimal,
}

impl SubAccountTransferRequest {
    pub fn validate(&self) -> Result<()> {
        if self.from_id().is_none() && self.to_id().is_none() {
            return Err(SapiError::mandatory_field("fromId or toId"));
        }
        require_non_empty(&self.asset, "asset")?;
        require_positive(self.amount, "amount")
    }

    pub fn from_id(&self) -> Option<&str> {
        non_empty(&self.from_id)
    }

    pub fn to_id(&self) -> Option<&str> {
        non_empty(&self.to_id)
    }

    pub fn client_transfer_id(&self) -> Option<&str> {
        non_empty(&self.client_transfer_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferHistoryRequest {
    pub from_id: Option<String>,
    pub to_id: Option<String>,
    pub client_transfer_id: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

// ### BSwap

/// Parameters shared by quote requests and swaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapQuoteRequest {
    /// Asset being sold
    pub quote_asset: String,
    /// Asset being bought
    pub base_asset: String,
    pub quote_qty: Decimal,
}

impl SwapQuoteRequest {
    pub fn new(quote_asset: impl Into<String>, base_asset: impl Into<String>, quote_qty: Decimal) -> Self {
        Self {
            quote_asset: quote_asset.into(),
            base_asset: base_asset.into(),
            quote_qty,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.quote_asset, "quoteAsset")?;
        require_non_empty(&self.base_asset, "baseAsset")?;
        require_positive(self.quote_qty, "quoteQty")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapHistoryRequest {
    pub swap_id: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub status: Option<i32>,
    pub quote_asset: Option<String>,
    pub base_asset: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddLiquidityRequest {
    pub pool_id: i64,
    pub asset: String,
    pub quantity: Decimal,
}

impl AddLiquidityRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.asset, "asset")?;
        require_positive(self.quantity, "quantity")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveLiquidityRequest {
    pub pool_id: i64,
    pub remove_type: RemoveLiquidityType,
    /// Sent as repeated `asset` query parameters
    pub assets: Vec<String>,
    pub share_amount: Decimal,
}

impl RemoveLiquidityRequest {
    pub fn validate(&self) -> Result<()> {
        if self.remove_type == RemoveLiquidityType::Single && self.assets.is_empty() {
            return Err(SapiError::mandatory_field("asset"));
        }
        require_positive(self.share_amount, "shareAmount")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiquidityOperationRecordsRequest {
    pub operation_id: Option<i64>,
    pub pool_id: Option<i64>,
    pub operation: Option<LiquidityOperation>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub limit: Option<u32>,
}

// ### Deposit

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepositHistoryRequest {
    pub coin: Option<String>,
    pub status: Option<i32>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl DepositHistoryRequest {
    pub fn validate(&self) -> Result<()> {
        match (self.start_time, self.end_time) {
            (Some(_), None) => Err(SapiError::mandatory_field("endTime")),
            (None, Some(_)) => Err(SapiError::mandatory_field("startTime")),
            (Some(start), Some(end)) if end < start => Err(SapiError::Validation(
                "endTime must not be earlier than startTime".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepositAddressRequest {
    pub coin: String,
    pub network: Option<String>,
}

impl DepositAddressRequest {
    pub fn new(coin: impl Into<String>) -> Self {
        Self {
            coin: coin.into(),
            network: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.coin, "coin")
    }

    pub fn network(&self) -> Option<&str> {
        non_empty(&self.network)
    }
}
