/*
[INPUT]:  Broker sub-account requests (ids, permissions, commissions, transfers)
[OUTPUT]: Sub-account, API key and transfer records
[POS]:    HTTP layer - broker endpoints (all SIGNED)
[UPDATE]: When adding broker endpoints or changing mandatory fields
*/

use crate::http::request::{Request, RequestOption, SecurityLevel};
use crate::http::response::decode_payload;
use crate::http::{Result, SapiClient, SapiError};
use crate::types::{
    ChangeApiPermissionRequest, ChangeApiPermissionResponse, ChangeCommissionRequest,
    ChangeCommissionResponse, CreateApiKeyRequest, CreateApiKeyResponse, DeleteSubApiKeyRequest,
    EnableFuturesResponse, EnableMarginResponse, SubAccount, SubAccountTransferRequest,
    SubAccountTransferResponse, Transfer, TransferHistoryRequest,
};

const SUB_ACCOUNT: &str = "/sapi/v1/broker/subAccount";
const SUB_ACCOUNT_FUTURES: &str = "/sapi/v1/broker/subAccount/futures";
const SUB_ACCOUNT_MARGIN: &str = "/sapi/v1/broker/subAccount/margin";
const SUB_ACCOUNT_API: &str = "/sapi/v1/broker/subAccountApi";
const SUB_ACCOUNT_API_PERMISSION: &str = "/sapi/v1/broker/subAccountApi/permission";
const SUB_ACCOUNT_API_COMMISSION: &str = "/sapi/v1/broker/subAccountApi/commission";
const TRANSFER: &str = "/sapi/v1/broker/transfer";

fn require_sub_account_id(sub_account_id: &str) -> Result<()> {
    if sub_account_id.trim().is_empty() {
        return Err(SapiError::mandatory_field("subAccountId"));
    }
    Ok(())
}

impl SapiClient {
    /// Create a broker sub-account
    ///
    /// POST /sapi/v1/broker/subAccount
    pub async fn create_sub_account(&self, opts: &[RequestOption]) -> Result<SubAccount> {
        let request = Request::post(SUB_ACCOUNT, SecurityLevel::Signed);
        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Enable futures trading for a sub-account
    ///
    /// POST /sapi/v1/broker/subAccount/futures
    pub async fn enable_futures_sub_account(
        &self,
        sub_account_id: &str,
        opts: &[RequestOption],
    ) -> Result<EnableFuturesResponse> {
        require_sub_account_id(sub_account_id)?;
        let mut request = Request::post(SUB_ACCOUNT_FUTURES, SecurityLevel::Signed);
        request
            .set_param("subAccountId", sub_account_id)
            .set_param("futures", true);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Enable margin trading for a sub-account
    ///
    /// POST /sapi/v1/broker/subAccount/margin
    pub async fn enable_margin_sub_account(
        &self,
        sub_account_id: &str,
        opts: &[RequestOption],
    ) -> Result<EnableMarginResponse> {
        require_sub_account_id(sub_account_id)?;
        let mut request = Request::post(SUB_ACCOUNT_MARGIN, SecurityLevel::Signed);
        request
            .set_param("subAccountId", sub_account_id)
            .set_param("margin", true);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Create an API key for a sub-account
    ///
    /// POST /sapi/v1/broker/subAccountApi
    pub async fn create_sub_account_api_key(
        &self,
        req: &CreateApiKeyRequest,
        opts: &[RequestOption],
    ) -> Result<CreateApiKeyResponse> {
        req.validate()?;
        let mut request = Request::post(SUB_ACCOUNT_API, SecurityLevel::Signed);
        request
            .set_param("subAccountId", &req.sub_account_id)
            .set_param("canTrade", req.can_trade)
            .set_param("marginTrade", req.margin_trade)
            .set_param("futuresTrade", req.futures_trade);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Delete a sub-account API key
    ///
    /// DELETE /sapi/v1/broker/subAccountApi
    pub async fn delete_sub_account_api_key(
        &self,
        req: &DeleteSubApiKeyRequest,
        opts: &[RequestOption],
    ) -> Result<()> {
        req.validate()?;
        let mut request = Request::delete(SUB_ACCOUNT_API, SecurityLevel::Signed);
        request
            .set_param("subAccountId", &req.sub_account_id)
            .set_param("subAccountApiKey", &req.api_key);

        self.call_api(request, opts).await?;
        Ok(())
    }

    /// Change the permissions of a sub-account API key
    ///
    /// POST /sapi/v1/broker/subAccountApi/permission
    pub async fn change_sub_account_api_permission(
        &self,
        req: &ChangeApiPermissionRequest,
        opts: &[RequestOption],
    ) -> Result<ChangeApiPermissionResponse> {
        req.validate()?;
        let mut request = Request::post(SUB_ACCOUNT_API_PERMISSION, SecurityLevel::Signed);
        request
            .set_param("subAccountId", &req.sub_account_id)
            .set_param("subAccountApiKey", &req.sub_account_api_key)
            .set_param("canTrade", req.can_trade)
            .set_param("marginTrade", req.margin_trade)
            .set_param("futuresTrade", req.futures_trade);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Change the spot/margin commission of a sub-account
    ///
    /// POST /sapi/v1/broker/subAccountApi/commission
    pub async fn change_sub_account_commission(
        &self,
        req: &ChangeCommissionRequest,
        opts: &[RequestOption],
    ) -> Result<ChangeCommissionResponse> {
        req.validate()?;
        let mut request = Request::post(SUB_ACCOUNT_API_COMMISSION, SecurityLevel::Signed);
        request
            .set_param("subAccountId", &req.sub_account_id)
            .set_param("makerCommission", req.maker_commission)
            .set_param("takerCommission", req.taker_commission)
            .set_param("marginMakerCommission", req.margin_maker_commission)
            .set_param("marginTakerCommission", req.margin_taker_commission);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Transfer an asset between the broker and its sub-accounts
    ///
    /// POST /sapi/v1/broker/transfer
    pub async fn sub_account_transfer(
        &self,
        req: &SubAccountTransferRequest,
        opts: &[RequestOption],
    ) -> Result<SubAccountTransferResponse> {
        req.validate()?;
        let mut request = Request::post(TRANSFER, SecurityLevel::Signed);
        request
            .set_opt_param("fromId", req.from_id())
            .set_opt_param("toId", req.to_id())
            .set_param("asset", &req.asset)
            .set_opt_param("clientTranId", req.client_transfer_id())
            .set_param("amount", req.amount);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Query broker transfer history
    ///
    /// GET /sapi/v1/broker/transfer
    pub async fn transfer_history(
        &self,
        req: &TransferHistoryRequest,
        opts: &[RequestOption],
    ) -> Result<Vec<Transfer>> {
        let mut request = Request::get(TRANSFER, SecurityLevel::Signed);
        request
            .set_opt_param("fromId", req.from_id.as_deref())
            .set_opt_param("toId", req.to_id.as_deref())
            .set_opt_param("clientTranId", req.client_transfer_id.as_deref())
            .set_opt_param("startTime", req.start_time)
            .set_opt_param("endTime", req.end_time)
            .set_opt_param("limit", req.limit)
            .set_opt_param("page", req.page);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }
}
