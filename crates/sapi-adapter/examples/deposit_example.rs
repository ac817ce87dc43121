/*
[INPUT]:  API key/secret from the environment, coin symbol
[OUTPUT]: Deposit address and recent deposit history
[POS]:    Examples - signed capital deposit queries
[UPDATE]: When adding new deposit endpoints
*/

use sapi_adapter::*;

/// Example: Query deposit address and history (signed)
#[tokio::main]
async fn main() {
    println!("=== Deposit Example ===\n");

    let (Ok(api_key), Ok(secret_key)) = (
        std::env::var("SAPI_API_KEY"),
        std::env::var("SAPI_SECRET_KEY"),
    ) else {
        eprintln!("Set SAPI_API_KEY and SAPI_SECRET_KEY");
        return;
    };

    let config = ClientConfig {
        debug: std::env::var("SAPI_DEBUG").is_ok(),
        ..ClientConfig::default()
    };
    let client = match SapiClient::with_config(Credentials::new(api_key, secret_key), config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    let coin = std::env::args().nth(1).unwrap_or_else(|| "USDT".to_string());

    println!("Fetching deposit address for {}...", coin);
    match client
        .deposit_address(&DepositAddressRequest::new(coin.as_str()), &[])
        .await
    {
        Ok(address) => println!("✓ Address: {} (tag: {:?})", address.address, address.tag),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nFetching deposit history for {}...", coin);
    let request = DepositHistoryRequest {
        coin: Some(coin.clone()),
        limit: Some(10),
        ..Default::default()
    };
    match client.deposit_history(&request, &[]).await {
        Ok(deposits) => {
            for deposit in &deposits {
                println!(
                    "  {} {} via {} status={} ({})",
                    deposit.amount, deposit.coin, deposit.network, deposit.status, deposit.confirm_times
                );
            }
            println!("✓ {} deposits", deposits.len());
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Deposit example complete");
}
