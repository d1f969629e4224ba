use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, build_router};
use tpa_core::ProxyConfig;
use tpa_core::config::{
    forward_headers_from_env_value, rest_addr_from_env_value, upstream_base_url_from_env_value,
};

/// Main entry point for the TPA proxy
///
/// Resolves configuration once, then serves the REST proxy routes, page-context routes and
/// Swagger UI until the process is stopped.
///
/// # Environment Variables
/// - `TPA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TPA_UPSTREAM_BASE_URL`: Backend API base URL (default: "http://localhost:8080")
/// - `TPA_FORWARD_HEADERS`: Comma-separated inbound headers passed upstream (default: none)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tpa=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ProxyConfig::new(
        upstream_base_url_from_env_value(std::env::var("TPA_UPSTREAM_BASE_URL").ok()),
        rest_addr_from_env_value(std::env::var("TPA_REST_ADDR").ok()),
        forward_headers_from_env_value(std::env::var("TPA_FORWARD_HEADERS").ok())?,
    )?;

    tracing::info!("++ Starting TPA proxy on {}", cfg.rest_addr());
    tracing::info!("++ Forwarding to {}", cfg.upstream_base_url());
    if cfg.forward_headers().is_empty() {
        tracing::info!("no inbound headers are forwarded upstream");
    } else {
        let names: Vec<&str> = cfg.forward_headers().iter().map(|h| h.as_str()).collect();
        tracing::info!("forwarding inbound headers: {}", names.join(", "));
    }

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    let app = build_router(AppState::new(cfg));
    axum::serve(listener, app).await?;

    Ok(())
}
