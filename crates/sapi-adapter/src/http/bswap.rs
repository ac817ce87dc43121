/*
[INPUT]:  BSwap pool, quote, swap and liquidity requests
[OUTPUT]: Pools, quotes, swap records and liquidity operations
[POS]:    HTTP layer - BSwap endpoints (pool listing is public, the rest SIGNED)
[UPDATE]: When adding BSwap endpoints or changing parameter placement
*/

use crate::http::request::{Request, RequestOption, SecurityLevel};
use crate::http::response::decode_payload;
use crate::http::{Result, SapiClient};
use crate::types::{
    AddLiquidityRequest, LiquidityOperationId, LiquidityOperationRecord,
    LiquidityOperationRecordsRequest, Pool, PoolLiquidity, Quote, RemoveLiquidityRequest, Swap,
    SwapHistoryRequest, SwapQuoteRequest, SwapResponse,
};

const POOLS: &str = "/sapi/v1/bswap/pools";
const QUOTE: &str = "/sapi/v1/bswap/quote";
const SWAP: &str = "/sapi/v1/bswap/swap";
const LIQUIDITY: &str = "/sapi/v1/bswap/liquidity";
const LIQUIDITY_ADD: &str = "/sapi/v1/bswap/liquidityAdd";
const LIQUIDITY_REMOVE: &str = "/sapi/v1/bswap/liquidityRemove";
const LIQUIDITY_OPS: &str = "/sapi/v1/bswap/liquidityOps";

impl SapiClient {
    /// List all swap pools
    ///
    /// GET /sapi/v1/bswap/pools
    pub async fn list_swap_pools(&self, opts: &[RequestOption]) -> Result<Vec<Pool>> {
        let request = Request::get(POOLS, SecurityLevel::None);
        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Request a quote for swapping quote asset into base asset
    ///
    /// GET /sapi/v1/bswap/quote
    pub async fn request_quote(
        &self,
        req: &SwapQuoteRequest,
        opts: &[RequestOption],
    ) -> Result<Quote> {
        req.validate()?;
        let mut request = Request::get(QUOTE, SecurityLevel::Signed);
        request
            .set_param("quoteAsset", &req.quote_asset)
            .set_param("baseAsset", &req.base_asset)
            .set_param("quoteQty", req.quote_qty);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Swap quote asset into base asset
    ///
    /// POST /sapi/v1/bswap/swap
    pub async fn swap(&self, req: &SwapQuoteRequest, opts: &[RequestOption]) -> Result<SwapResponse> {
        req.validate()?;
        let mut request = Request::post(SWAP, SecurityLevel::Signed);
        request
            .set_form_param("quoteAsset", &req.quote_asset)
            .set_form_param("baseAsset", &req.base_asset)
            .set_form_param("quoteQty", req.quote_qty);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Query swap history
    ///
    /// GET /sapi/v1/bswap/swap
    pub async fn swap_history(
        &self,
        req: &SwapHistoryRequest,
        opts: &[RequestOption],
    ) -> Result<Vec<Swap>> {
        let mut request = Request::get(SWAP, SecurityLevel::Signed);
        request
            .set_opt_param("swapId", req.swap_id)
            .set_opt_param("startTime", req.start_time)
            .set_opt_param("endTime", req.end_time)
            .set_opt_param("status", req.status)
            .set_opt_param("quoteAsset", req.quote_asset.as_deref())
            .set_opt_param("baseAsset", req.base_asset.as_deref())
            .set_opt_param("limit", req.limit);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Liquidity information and the caller's share, for one pool or all
    ///
    /// GET /sapi/v1/bswap/liquidity
    pub async fn liquidity_information(
        &self,
        pool_id: Option<i64>,
        opts: &[RequestOption],
    ) -> Result<Vec<PoolLiquidity>> {
        let mut request = Request::get(LIQUIDITY, SecurityLevel::Signed);
        request.set_opt_param("poolId", pool_id);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Add liquidity to a pool
    ///
    /// POST /sapi/v1/bswap/liquidityAdd
    pub async fn add_liquidity(
        &self,
        req: &AddLiquidityRequest,
        opts: &[RequestOption],
    ) -> Result<LiquidityOperationId> {
        req.validate()?;
        let mut request = Request::post(LIQUIDITY_ADD, SecurityLevel::Signed);
        request
            .set_form_param("poolId", req.pool_id)
            .set_form_param("asset", &req.asset)
            .set_form_param("quantity", req.quantity);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Remove liquidity from a pool
    ///
    /// POST /sapi/v1/bswap/liquidityRemove
    ///
    /// Assets travel as repeated `asset` query parameters, everything else
    /// in the form body.
    pub async fn remove_liquidity(
        &self,
        req: &RemoveLiquidityRequest,
        opts: &[RequestOption],
    ) -> Result<LiquidityOperationId> {
        req.validate()?;
        let mut request = Request::post(LIQUIDITY_REMOVE, SecurityLevel::Signed);
        request
            .set_form_param("poolId", req.pool_id)
            .set_form_param("type", req.remove_type)
            .set_form_param("shareAmount", req.share_amount);
        for asset in &req.assets {
            request.add_param("asset", asset);
        }

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Query liquidity add/remove records
    ///
    /// GET /sapi/v1/bswap/liquidityOps
    pub async fn liquidity_operation_records(
        &self,
        req: &LiquidityOperationRecordsRequest,
        opts: &[RequestOption],
    ) -> Result<Vec<LiquidityOperationRecord>> {
        let mut request = Request::get(LIQUIDITY_OPS, SecurityLevel::Signed);
        request
            .set_opt_param("operationId", req.operation_id)
            .set_opt_param("poolId", req.pool_id)
            .set_opt_param("operation", req.operation)
            .set_opt_param("startTime", req.start_time)
            .set_opt_param("endTime", req.end_time)
            .set_opt_param("limit", req.limit);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }
}
