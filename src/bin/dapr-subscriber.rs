//! # Dapr Subscriber
//!
//! Serves the subscriptions listed in a JSON definitions file. Every
//! subscription route logs the delivered event and acknowledges it with
//! `{"status": "SUCCESS"}`; `GET /dapr/subscribe` lists them for the sidecar.
//!
//! Useful for wiring up and checking pubsub components before the real
//! consumer exists.

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::http::Uri;
use axum::Json;
use axum_dapr_helper::logging::init_structured_logging;
use axum_dapr_helper::{load_definitions, DaprDiscovery, DaprSettings, SubscriptionRouter};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "dapr-subscriber")]
#[command(about = "Serve Dapr pubsub subscriptions declared in a definitions file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Settings file (default: dapr-helper.toml, or DAPR_HELPER_SETTINGS)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Definitions file, overriding the one named in settings
    #[arg(short, long)]
    definitions: Option<PathBuf>,

    /// Print the discovery response and exit instead of serving
    #[arg(long)]
    print_subscriptions: bool,
}

/// Logs the delivered event and acknowledges it
async fn acknowledge(uri: Uri, body: Bytes) -> Json<Value> {
    let event: Value = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    info!(route = %uri.path(), %event, "📨 Event delivered");
    Json(json!({"status": "SUCCESS"}))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let settings = match &cli.settings {
        Some(path) => DaprSettings::load_from(Some(path.as_path())),
        None => DaprSettings::load(),
    }
    .context("loading settings")?;

    let definitions_file = cli
        .definitions
        .or_else(|| settings.definitions_file.clone())
        .context("no definitions file given (use --definitions or definitions_file)")?;

    let mut app: SubscriptionRouter = SubscriptionRouter::new();
    for definition in load_definitions(&definitions_file)? {
        definition.into_subscribe().register(&mut app, acknowledge)?;
    }

    let dapr = DaprDiscovery::from_settings(&settings);
    let subscriptions = dapr.generate_subscribe_route(&mut app)?;

    if cli.print_subscriptions {
        println!("{}", serde_json::to_string_pretty(&subscriptions)?);
        return Ok(());
    }

    let addr = settings.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(
        %addr,
        subscriptions = subscriptions.len(),
        "🚀 Dapr subscriber listening"
    );

    axum::serve(listener, app.into_router().layer(TraceLayer::new_for_http())).await?;
    Ok(())
}
