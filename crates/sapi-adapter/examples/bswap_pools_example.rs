/*
[INPUT]:  Optional quote pair from the pool listing
[OUTPUT]: Swap pools and, with credentials, a swap quote
[POS]:    Examples - public pool listing and signed quote request
[UPDATE]: When adding new BSwap endpoints
*/

use rust_decimal::Decimal;
use sapi_adapter::*;

/// Example: List swap pools (public) and request a quote (signed)
///
/// Set SAPI_API_KEY and SAPI_SECRET_KEY to run the signed part.
#[tokio::main]
async fn main() {
    println!("=== BSwap Pools Example ===\n");

    let credentials = match (
        std::env::var("SAPI_API_KEY"),
        std::env::var("SAPI_SECRET_KEY"),
    ) {
        (Ok(api_key), Ok(secret_key)) => Some(Credentials::new(api_key, secret_key)),
        _ => None,
    };
    let signed = credentials.is_some();

    let client = match SapiClient::new(credentials.unwrap_or_else(Credentials::anonymous)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created for {}\n", client.base_url());

    println!("Listing swap pools...");
    let pools = match client.list_swap_pools(&[]).await {
        Ok(pools) => pools,
        Err(e) => {
            println!("✗ Error: {}", e);
            return;
        }
    };
    for pool in pools.iter().take(5) {
        println!("  #{} {} {:?}", pool.pool_id, pool.pool_name, pool.assets);
    }
    println!("✓ {} pools\n", pools.len());

    if !signed {
        println!("Skipping quote (no credentials in environment)");
        return;
    }

    let Some(pool) = pools.iter().find(|pool| pool.assets.len() == 2) else {
        println!("No two-asset pool to quote");
        return;
    };

    let request = SwapQuoteRequest::new(&pool.assets[0], &pool.assets[1], Decimal::from(100));
    println!("Requesting quote {} -> {}...", request.quote_asset, request.base_asset);
    match client
        .request_quote(&request, &[RequestOption::recv_window(5000)])
        .await
    {
        Ok(quote) => println!("✓ Quote: {:?}", quote),
        Err(SapiError::Api(api)) => println!("✗ Exchange rejected quote: {}", api),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ BSwap example complete");
}
