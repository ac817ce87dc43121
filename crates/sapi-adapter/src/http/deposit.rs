/*
[INPUT]:  Deposit history filters and coin/network selection
[OUTPUT]: Deposit records and deposit addresses
[POS]:    HTTP layer - capital deposit endpoints (SIGNED)
[UPDATE]: When adding deposit endpoints or filters
*/

use crate::http::request::{Request, RequestOption, SecurityLevel};
use crate::http::response::decode_payload;
use crate::http::{Result, SapiClient};
use crate::types::{Deposit, DepositAddress, DepositAddressRequest, DepositHistoryRequest};

const DEPOSIT_HISTORY: &str = "/sapi/v1/capital/deposit/hisrec";
const DEPOSIT_ADDRESS: &str = "/sapi/v1/capital/deposit/address";

impl SapiClient {
    /// Query deposit history
    ///
    /// GET /sapi/v1/capital/deposit/hisrec
    pub async fn deposit_history(
        &self,
        req: &DepositHistoryRequest,
        opts: &[RequestOption],
    ) -> Result<Vec<Deposit>> {
        req.validate()?;
        let mut request = Request::get(DEPOSIT_HISTORY, SecurityLevel::Signed);
        request
            .set_opt_param("coin", req.coin.as_deref())
            .set_opt_param("status", req.status)
            .set_opt_param("startTime", req.start_time)
            .set_opt_param("endTime", req.end_time)
            .set_opt_param("offset", req.offset)
            .set_opt_param("limit", req.limit);

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }

    /// Fetch the deposit address for a coin, optionally on a specific network
    ///
    /// GET /sapi/v1/capital/deposit/address
    pub async fn deposit_address(
        &self,
        req: &DepositAddressRequest,
        opts: &[RequestOption],
    ) -> Result<DepositAddress> {
        req.validate()?;
        let mut request = Request::get(DEPOSIT_ADDRESS, SecurityLevel::Signed);
        request
            .set_param("coin", &req.coin)
            .set_opt_param("network", req.network());

        let data = self.call_api(request, opts).await?;
        decode_payload(&data)
    }
}
