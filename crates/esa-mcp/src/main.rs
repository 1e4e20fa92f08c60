#![forbid(unsafe_code)]

//! esa MCP Server
//!
//! Serves the esa.io post tools to an MCP client over stdio.

use anyhow::{Context, Result};
use clap::Parser;
use esa_client::{EsaClient, DEFAULT_BASE_URL};
use esa_core::{ConfigSource, EnvConfig};
use esa_mcp::{CompositeRegistry, EsaMcpServer, GuideTools, PostTools};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// esa.io tools over the Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the esa API
    #[arg(long, env = "ESA_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    api_base_url: String,

    /// Log filter directives, written to stderr
    #[arg(long, env = "ESA_MCP_LOG", default_value = "info")]
    log_filter: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_filter)?)
        .with_writer(std::io::stderr)
        .init();

    let config: Arc<dyn ConfigSource> = Arc::new(EnvConfig);
    let client = EsaClient::http(&args.api_base_url, Arc::clone(&config))
        .with_context(|| format!("invalid API base URL {}", args.api_base_url))?;
    let posts = PostTools::new(client, config.as_ref()).context("cannot register post tools")?;

    let registry = CompositeRegistry::new().add(posts).add(GuideTools::new());
    tracing::info!(api = %args.api_base_url, "starting esa MCP server");

    EsaMcpServer::new(registry).serve_stdio().await?;
    Ok(())
}
