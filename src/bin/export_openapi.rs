//! Export the OpenAPI document to stdout or a file
//!
//! Usage:
//!   cargo run --bin export_openapi > openapi.json
//!   cargo run --bin export_openapi -- --output docs/openapi.json

use anyhow::Context;
use clap::Parser;
use utoipa::OpenApi;
use wallet_engine::gateway::openapi::ApiDoc;

#[derive(Parser, Debug)]
struct Args {
    /// Write to this path instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI document")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("Failed to write {path}"))?;
            eprintln!("OpenAPI document exported to: {path}");
        }
        None => println!("{json}"),
    }
    Ok(())
}
