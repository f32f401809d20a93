//! Mazda Gateway - authenticated vehicle-control API

use clap::{ArgAction, Parser};
use mazda_client::is_truthy;
use mazda_gateway::{run_server_with_shutdown, GatewayConfig};
use std::convert::Infallible;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mazda-gateway")]
#[command(about = "Authenticated HTTP gateway for Mazda connected-vehicle control")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "MAZDA_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "MAZDA_PORT")]
    port: u16,

    /// Path prefix for every route
    #[arg(long, default_value = "/api", env = "MAZDA_API_PREFIX")]
    api_prefix: String,

    /// Secret key signing session tokens
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    secret_key: String,

    /// Serve every request from the stand-in backend (`true`, `1` or `t`)
    #[arg(
        long,
        env = "MOCK_CLIENT",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = parse_truthy
    )]
    mock_client: bool,

    /// Vehicle-cloud bridge URL for the live backend
    #[arg(long, env = "MAZDA_BACKEND_URL")]
    backend_url: Option<String>,

    /// Live backend request timeout in seconds
    #[arg(long, default_value = "30", env = "MAZDA_BACKEND_TIMEOUT")]
    backend_timeout: u64,

    /// Session token lifetime in seconds (0 = never expire)
    #[arg(long, default_value = "604800", env = "TOKEN_TTL_SECS")]
    token_ttl: u64,

    /// Disable CORS headers
    #[arg(long, env = "MAZDA_NO_CORS")]
    no_cors: bool,

    /// Emit logs as JSON
    #[arg(long, env = "MAZDA_LOG_JSON")]
    log_json: bool,

    /// Enable debug logging
    #[arg(short, long, env = "MAZDA_DEBUG")]
    debug: bool,
}

/// Anything other than a truthy spelling leaves the stand-in off
fn parse_truthy(value: &str) -> Result<bool, Infallible> {
    Ok(is_truthy(value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "mazda_gateway={level},mazda_client={level},tower_http=debug",
            level = log_level
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if args.secret_key.is_empty() {
        anyhow::bail!("SECRET_KEY must not be empty");
    }

    tracing::info!("Starting Mazda Gateway on {}:{}", args.host, args.port);

    if args.mock_client {
        tracing::warn!("⚠️  Stand-in backend enabled - no requests reach the vehicle cloud");
    }

    // Build configuration
    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        api_prefix: args.api_prefix,
        secret_key: args.secret_key,
        use_stand_in: args.mock_client,
        backend_url: args.backend_url,
        backend_timeout_secs: args.backend_timeout,
        token_ttl_secs: args.token_ttl,
        cors_enabled: !args.no_cors,
        ..Default::default()
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    // Run the server
    run_server_with_shutdown(config, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["mazda-gateway", "--secret-key", "s"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_mock_client_flag_spellings() {
        assert!(parse(&["--mock-client"]).mock_client);
        assert!(parse(&["--mock-client=T"]).mock_client);
        assert!(!parse(&["--mock-client=off"]).mock_client);
    }

    // The only test touching MOCK_CLIENT, so the env changes cannot race
    #[test]
    fn test_mock_client_env_spellings() {
        let cases = [
            ("true", true),
            ("True", true),
            ("1", true),
            ("t", true),
            ("False", false),
            ("false", false),
            ("0", false),
            ("yes", false),
        ];
        for (value, expected) in cases {
            std::env::set_var("MOCK_CLIENT", value);
            let args = Args::try_parse_from(["mazda-gateway", "--secret-key", "s"]);
            assert_eq!(args.map(|a| a.mock_client).ok(), Some(expected), "MOCK_CLIENT={}", value);
        }

        std::env::remove_var("MOCK_CLIENT");
        assert!(!parse(&[]).mock_client);
    }
}
