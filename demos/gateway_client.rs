//! Example: sign in through the gateway and read the first vehicle's doors
//!
//! Start a gateway first, for instance with the stand-in backend:
//!
//! ```bash
//! SECRET_KEY=dev MOCK_CLIENT=true cargo run -p mazda-gateway
//! ```
//!
//! then run `cargo run --example gateway_client`. `GATEWAY_URL`,
//! `MAZDA_EMAIL`, `MAZDA_PASSWORD` and `MAZDA_REGION` override the defaults.

use anyhow::{bail, Context};
use mazda_client::Vehicle;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("gateway_client=info")
        .init();

    let base_url = std::env::var("GATEWAY_URL").unwrap_or_else(|_| "http://127.0.0.1:5000/api".to_string());
    let email = std::env::var("MAZDA_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let password = std::env::var("MAZDA_PASSWORD").unwrap_or_else(|_| "demo".to_string());
    let region = std::env::var("MAZDA_REGION").unwrap_or_else(|_| "MNAO".to_string());

    let http = reqwest::Client::new();

    println!("=== Mazda Gateway Demo ===\n");

    // 1. Exchange credentials for a session token
    let response = http
        .post(format!("{}/auth", base_url))
        .json(&json!({ "email": email, "password": password, "region": region }))
        .send()
        .await
        .context("gateway unreachable")?;
    if !response.status().is_success() {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        bail!("sign-in failed ({}): {}", status, body);
    }
    let token = response.text().await?;
    println!("1. Signed in, token is {} bytes", token.len());

    // 2. List vehicles
    let vehicles: Vec<Vehicle> = http
        .get(format!("{}/vehicles", base_url))
        .bearer_auth(&token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("2. Found {} vehicle(s)", vehicles.len());
    for vehicle in &vehicles {
        let field = |name: &str| vehicle.get(name).cloned().unwrap_or(Value::Null);
        println!(
            "   - {} {} (id {}, vin {})",
            field("modelYear"),
            field("modelName"),
            field("id"),
            field("vin")
        );
    }

    let Some(vehicle_id) = vehicles.iter().find_map(Vehicle::id) else {
        println!("\nNo vehicles on this account.");
        return Ok(());
    };

    // 3. Door summary
    let doors: Value = http
        .get(format!("{}/doors/status/{}", base_url, vehicle_id))
        .bearer_auth(&token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("3. Doors: {}", doors);

    println!("\n=== Demo Complete ===");
    Ok(())
}
