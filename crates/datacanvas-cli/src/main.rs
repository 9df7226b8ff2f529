//! # DataCanvas CLI
//!
//! Lists devices or queries datatables and prints the response as JSON.
//!
//! Credentials come from `DATACANVAS_*` environment variables, optionally
//! loaded from a local `.env` file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datacanvas_client::{DataCanvas, Transport};
use datacanvas_core::{parse_devices, DataCanvasError, DataQuery, SdkConfig};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "datacanvas", version, about = "Query the DataCanvas IoT platform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all devices in the configured project
    Devices,
    /// Fetch one page of rows from a datatable
    Data {
        /// Datatable name
        #[arg(long = "table")]
        table: String,
        /// Comma-separated device IDs to filter on
        #[arg(long)]
        devices: Option<String>,
        /// Page number (0-indexed)
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,
        /// Rows per page (1-1000)
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        /// Sort order: asc or desc
        #[arg(long)]
        order: Option<String>,
    },
}

fn build_query(
    table: String,
    devices: Option<&str>,
    page: Option<i64>,
    limit: Option<i64>,
    order: Option<String>,
) -> Result<DataQuery, DataCanvasError> {
    let mut query = DataQuery::new(table);
    if let Some(raw) = devices {
        query = query.devices(parse_devices(raw)?);
    }
    query.page = page;
    query.limit = limit;
    query.order = order;
    Ok(query)
}

fn run<T: Transport>(client: &DataCanvas<T>, command: Command) -> Result<Value> {
    match command {
        Command::Devices => {
            let response = client.devices().list().context("Failed to list devices")?;
            Ok(serde_json::to_value(response)?)
        }
        Command::Data {
            table,
            devices,
            page,
            limit,
            order,
        } => {
            let query = build_query(table, devices.as_deref(), page, limit, order)
                .context("Invalid data query")?;
            let response = client
                .data()
                .list(&query)
                .with_context(|| format!("Failed to query datatable {:?}", query.table_name))?;
            Ok(serde_json::to_value(response)?)
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SdkConfig::from_env().context("Failed to load configuration")?;
    let client = DataCanvas::new(config).context("Failed to create client")?;

    tracing::debug!(command = ?cli.command, project_id = client.config().project_id(), "Running");
    let output = run(&client, cli.command)?;
    client.close();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
