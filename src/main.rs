//! M365 License Report - a license assignment report generator
//!
//! Fetches users and their assigned Microsoft 365 license SKUs from
//! Microsoft Graph and exports the result as a CSV or JSON report.

mod api;
mod auth;
mod config;
mod export;
mod models;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::GraphClient;
use crate::auth::DeviceCodeAuthenticator;
use crate::config::Config;
use crate::export::ExportFormat;

/// M365 License Report Generator
#[derive(Parser, Debug)]
#[command(name = "m365-license-report")]
#[command(about = "Reports Microsoft 365 user license assignments to CSV or JSON")]
#[command(version)]
struct Args {
    /// Directory (tenant) id to report on
    #[arg(short, long, env = "M365_TENANT_ID")]
    tenant: String,

    /// Output file path
    #[arg(short, long, default_value = "m365_license_report.csv")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Application (client) id to authenticate as
    #[arg(long, env = "M365_CLIENT_ID")]
    client_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (for debugging, set RUST_LOG=debug)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::load().context("Failed to load config file")?;

    let client_id = args
        .client_id
        .unwrap_or_else(|| config.client_id().to_string());

    // Set up authentication
    let authenticator = Arc::new(
        DeviceCodeAuthenticator::new(config.graph_base_url(), &args.tenant, &client_id)
            .with_authority(config.authority()),
    );
    let client = GraphClient::new(authenticator);

    eprintln!("Signing in to tenant {}...", args.tenant);
    let report = client
        .license_report()
        .await
        .context("Failed to fetch the license report from Microsoft Graph")?;
    eprintln!("Fetched {} users", report.len());

    export::export_report(&report, args.format, &args.output)
        .context("Failed to write the report")?;

    Ok(())
}
