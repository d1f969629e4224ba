use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tpa_core::config::upstream_base_url_from_env_value;
use tpa_core::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tpa_core::{ForwardOptions, Forwarder, Method, PageRoute, QueryParams, ALL_ROUTES};
use tpa_types::EntityKind;

#[derive(Parser)]
#[command(name = "tpa")]
#[command(about = "TPA proxy operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the proxy routes
    Routes,
    /// Send a request to the upstream through the forwarder
    Forward {
        /// Upstream path, e.g. /api/v1/policies/exclusions
        path: String,
        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,
        /// Query parameter as key=value (repeatable)
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
        /// Upstream base URL (defaults to TPA_UPSTREAM_BASE_URL)
        #[arg(long)]
        upstream: Option<String>,
    },
    /// Resolve a detail-page path to its page context
    ResolvePage {
        /// Page path, e.g. /policies/new
        path: String,
    },
    /// Check a JSON payload file against an entity shape
    CheckPayload {
        /// Entity kind, e.g. price-list
        entity: String,
        /// JSON file to check
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}

/// Execute one command. Any failure is returned so the process exits non-zero.
async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Routes) => {
            for route in ALL_ROUTES {
                println!(
                    "{:<5} {:<48} -> {}  [{}]",
                    route.method().as_str(),
                    route.inbound,
                    route.upstream,
                    route.failure_message
                );
            }
        }
        Some(Commands::Forward {
            path,
            method,
            query,
            body,
            upstream,
        }) => {
            let base = upstream.unwrap_or_else(|| {
                upstream_base_url_from_env_value(std::env::var("TPA_UPSTREAM_BASE_URL").ok())
            });
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            let query = parse_query_pairs(&query)?;

            let mut headers = HeaderMap::new();
            if body.is_some() {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            let options = ForwardOptions {
                method: Some(method),
                headers,
                body: body.map(Into::into),
            };

            let resp = Forwarder::new(base)
                .forward(&path, options, &query)
                .await
                .context("Error forwarding request")?;
            println!("{}", resp.status);
            println!("{}", String::from_utf8_lossy(&resp.body));
        }
        Some(Commands::ResolvePage { path }) => {
            let route = PageRoute::parse(&path).context("Error resolving page")?;
            println!("{}", serde_json::to_string_pretty(&route.context())?);
        }
        Some(Commands::CheckPayload { entity, file }) => {
            let kind: EntityKind = entity.parse()?;
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Error reading {}", file.display()))?;
            let value = kind
                .normalise(&contents)
                .with_context(|| format!("Error checking {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        None => {
            println!("Use 'tpa --help' for commands");
        }
    }

    Ok(())
}

fn parse_query_pairs(raw: &[String]) -> anyhow::Result<QueryParams> {
    let pairs = raw
        .iter()
        .map(|item| {
            item.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| anyhow!("query parameter must be KEY=VALUE: {item}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(QueryParams::Pairs(pairs))
}
