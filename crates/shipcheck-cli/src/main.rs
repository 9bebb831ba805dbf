use anyhow::{Context, Result};
use clap::Parser;

use shipcheck_core::report::{model::ToolInfo, render};

mod args;
mod logging;

fn main() -> Result<()> {
    let args = args::Args::parse();
    logging::init();

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: args.commit.clone(),
    };

    let report = shipcheck_core::verify(&args.to_config(), tool)?;

    let output = match args.format {
        args::OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        args::OutputFormat::Text => render::render_text(&report),
    };

    match &args.out {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => print!("{output}"),
    }

    std::process::exit(report.outcome.exit_code);
}
