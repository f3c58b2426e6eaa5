use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

mod analysis;
mod classify;
mod config;
mod error;
mod extraction;
mod metadata;
mod ollama;
mod output;
mod package;
mod pipeline;

use crate::error::{PipelineError, PipelineResult, format_error_chain};
use crate::ollama::OllamaClient;
use crate::package::ResultPackage;
use crate::pipeline::Pipeline;

/// Classify files, extract their metadata and content, and assemble an
/// analysis package
#[derive(Parser, Debug)]
#[command(name = "docvision", version, about, long_about = None)]
struct Cli {
    /// Files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output JSON file (default: output/analysis_results.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Additional configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {}", format_error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> PipelineResult<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let output_path = cli.output.unwrap_or_else(|| config.output.path.clone());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        files = cli.files.len(),
        model = %config.ollama.model,
        "Starting docvision"
    );

    let analyzer = OllamaClient::new(config.ollama.clone()).map_err(|e| PipelineError::Config {
        message: format_error_chain(&e),
    })?;

    let package = Pipeline::new(config, analyzer).run(&cli.files).await?;

    print_summary(&package);
    output::write_package(&package, &output_path)?;
    println!("\nResults saved to: {}", output_path.display());

    Ok(())
}

fn print_summary(package: &ResultPackage) {
    println!("\nProcessing complete");
    println!("  Files processed: {}", package.total_files);
    println!("  Agents used:     {}", package.agents_used.join(", "));
    println!("  Package ID:      {}", package.package_id);
    println!("  Status:          {}", package.status);
    println!("\nFile categories:");
    println!("  Images:    {}", package.category_counts.images);
    println!("  Documents: {}", package.category_counts.documents);
    println!("  Other:     {}", package.category_counts.other);

    let unreadable: Vec<_> = package
        .file_records
        .iter()
        .filter(|entry| entry.record().is_none())
        .map(|entry| entry.path().display().to_string())
        .collect();
    if !unreadable.is_empty() {
        println!("\nFiles with unreadable metadata:");
        for path in unreadable {
            println!("  {}", path);
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format().with_target(true).compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docvision=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["docvision"]).is_err());

        let cli = Cli::try_parse_from(["docvision", "a.pdf", "b.png", "-o", "out.json"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.png")]);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.config.is_none());
    }
}
