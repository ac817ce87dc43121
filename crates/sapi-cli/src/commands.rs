/*
[INPUT]:  Parsed subcommand, configured SapiClient, per-request options
[OUTPUT]: Endpoint result as a JSON value, rendered as JSON or YAML
[POS]:    Command layer - maps CLI subcommands onto client endpoints
[UPDATE]: When adding subcommands or output formats
*/

use std::future::Future;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use sapi_adapter::{
    DepositAddressRequest, DepositHistoryRequest, LiquidityOperationRecordsRequest,
    RequestOption, SapiClient, SwapHistoryRequest, SwapQuoteRequest, TransferHistoryRequest,
    with_cancellation,
};

/// Read-only queries exposed by the CLI
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List BSwap pools (public)
    Pools,
    /// Request a BSwap quote
    Quote {
        #[arg(long)]
        quote_asset: String,
        #[arg(long)]
        base_asset: String,
        #[arg(long)]
        quote_qty: Decimal,
    },
    /// Pool liquidity and the account's share
    Liquidity {
        #[arg(long)]
        pool_id: Option<i64>,
    },
    /// Liquidity add/remove records
    LiquidityOps {
        #[arg(long)]
        pool_id: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// BSwap swap history
    Swaps {
        #[arg(long)]
        swap_id: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Deposit history
    Deposits {
        #[arg(long)]
        coin: Option<String>,
        #[arg(long)]
        status: Option<i32>,
        #[arg(long)]
        start_time: Option<i64>,
        #[arg(long)]
        end_time: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Deposit address for a coin
    DepositAddress {
        #[arg(long)]
        coin: String,
        #[arg(long)]
        network: Option<String>,
    },
    /// Broker transfer history
    Transfers {
        #[arg(long)]
        from_id: Option<String>,
        #[arg(long)]
        to_id: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

impl Command {
    /// Whether the command hits a signed endpoint
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, Command::Pools)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Await one endpoint call under `cancel` and turn its result into JSON
async fn fetch<T, F>(cancel: &CancellationToken, call: F) -> Result<Value>
where
    T: Serialize,
    F: Future<Output = sapi_adapter::Result<T>>,
{
    let result = with_cancellation(cancel, call)
        .await
        .context("request failed")?;
    serde_json::to_value(result).context("serialize result")
}

/// Execute one command against the client, aborting when `cancel` fires
pub async fn run(
    client: &SapiClient,
    command: &Command,
    opts: &[RequestOption],
    cancel: &CancellationToken,
) -> Result<Value> {
    debug!(?command, "running command");
    match command {
        Command::Pools => fetch(cancel, client.list_swap_pools(opts)).await,
        Command::Quote {
            quote_asset,
            base_asset,
            quote_qty,
        } => {
            let request = SwapQuoteRequest::new(quote_asset, base_asset, *quote_qty);
            fetch(cancel, client.request_quote(&request, opts)).await
        }
        Command::Liquidity { pool_id } => {
            fetch(cancel, client.liquidity_information(*pool_id, opts)).await
        }
        Command::LiquidityOps { pool_id, limit } => {
            let request = LiquidityOperationRecordsRequest {
                pool_id: *pool_id,
                limit: *limit,
                ..Default::default()
            };
            fetch(cancel, client.liquidity_operation_records(&request, opts)).await
        }
        Command::Swaps { swap_id, limit } => {
            let request = SwapHistoryRequest {
                swap_id: *swap_id,
                limit: *limit,
                ..Default::default()
            };
            fetch(cancel, client.swap_history(&request, opts)).await
        }
        Command::Deposits {
            coin,
            status,
            start_time,
            end_time,
            limit,
        } => {
            let request = DepositHistoryRequest {
                coin: coin.clone(),
                status: *status,
                start_time: *start_time,
                end_time: *end_time,
                limit: *limit,
                ..Default::default()
            };
            fetch(cancel, client.deposit_history(&request, opts)).await
        }
        Command::DepositAddress { coin, network } => {
            let request = DepositAddressRequest {
                coin: coin.clone(),
                network: network.clone(),
            };
            fetch(cancel, client.deposit_address(&request, opts)).await
        }
        Command::Transfers {
            from_id,
            to_id,
            limit,
        } => {
            let request = TransferHistoryRequest {
                from_id: from_id.clone(),
                to_id: to_id.clone(),
                limit: *limit,
                ..Default::default()
            };
            fetch(cancel, client.transfer_history(&request, opts)).await
        }
    }
}

/// Render a command result for stdout
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("render json"),
        OutputFormat::Yaml => serde_yaml::to_string(value).context("render yaml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapi_adapter::{ClientConfig, Credentials, SapiError};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SapiClient {
        let config = ClientConfig {
            base_url: Some(server.uri()),
            ..ClientConfig::default()
        };
        SapiClient::with_config(Credentials::new("cli-key", "cli-secret"), config)
            .expect("client init")
    }

    #[tokio::test]
    async fn test_pools_command_returns_json_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sapi/v1/bswap/pools"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"poolId": 2, "poolName": "BUSD/USDT", "assets": ["BUSD", "USDT"]}
            ])))
            .mount(&server)
            .await;

        let value = run(&client_for(&server), &Command::Pools, &[], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(value[0]["poolId"], 2);
        assert_eq!(value[0]["poolName"], "BUSD/USDT");
    }

    #[tokio::test]
    async fn test_deposit_address_command_passes_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sapi/v1/capital/deposit/address"))
            .and(query_param("coin", "BTC"))
            .and(query_param("network", "BTC"))
            .and(query_param("recvWindow", "10000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": "1HPn8Rx2y6nNSfagQBKy27GB99Vbzg89wv",
                "coin": "BTC"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let command = Command::DepositAddress {
            coin: "BTC".to_string(),
            network: Some("BTC".to_string()),
        };
        let value = run(
            &client_for(&server),
            &command,
            &[RequestOption::recv_window(10_000)],
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(value["address"], "1HPn8Rx2y6nNSfagQBKy27GB99Vbzg89wv");
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sapi/v1/bswap/quote"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"code":-2015,"msg":"Invalid API-key"}"#),
            )
            .mount(&server)
            .await;

        let command = Command::Quote {
            quote_asset: "USDT".to_string(),
            base_asset: "BUSD".to_string(),
            quote_qty: Decimal::from(10),
        };
        let err = run(&client_for(&server), &command, &[], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("request failed"));
        match err.downcast_ref::<SapiError>() {
            Some(SapiError::Api(api)) => assert_eq!(api.code, -2015),
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_command() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(0)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = run(&client_for(&server), &Command::Pools, &[], &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<SapiError>(), Some(SapiError::Cancelled)));
    }

    #[tokio::test]
    async fn test_unserializable_result_is_not_a_decode_error() {
        // Tuple keys have no JSON object form.
        let result: std::collections::BTreeMap<(i32, i32), i32> = [((1, 2), 3)].into();
        let err = fetch(&CancellationToken::new(), async move { Ok(result) })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "serialize result");
        assert!(err.downcast_ref::<SapiError>().is_none());
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn test_only_pools_is_public() {
        assert!(!Command::Pools.requires_credentials());
        assert!(Command::Liquidity { pool_id: None }.requires_credentials());
    }

    #[test]
    fn test_render_formats() {
        let value = serde_json::json!({"swapId": 2314});
        assert!(render(&value, OutputFormat::Json).unwrap().contains("\"swapId\": 2314"));
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap().trim(), "swapId: 2314");
    }
}
