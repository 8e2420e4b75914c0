use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod report;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "finlens", version, about = "Financial statement metrics and spending analysis")]
struct Cli {
    /// Optional TOML file with category rules, metric aliases and column aliases
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Categorize a bank statement CSV and summarize spending
    Statement {
        /// Path to the statement (header row required)
        #[arg(long)]
        input: PathBuf,

        /// Directory for reports
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },

    /// Extract financial metrics from statement documents (.txt, or .pdf with the `pdf` feature)
    Metrics {
        /// Documents to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for reports
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Also print the extracted facts as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Statement { input, output_dir, delimiter } => {
            if !delimiter.is_ascii() {
                bail!("Delimiter must be a single ASCII character, got '{delimiter}'");
            }
            let run =
                commands::run_statement(&config, &input, &output_dir, delimiter as u8).await?;

            print!("{}", run.chart);
            println!("Analysis complete");
            println!("Transactions: {}", run.analysis.transactions.len());
            println!("Total spend:  {:.2}", run.analysis.total_spend());
            for path in &run.files.paths {
                tracing::info!("Wrote {}", path.display());
            }
        }

        Command::Metrics { inputs, output_dir, json } => {
            let run = commands::run_metrics(&config, &inputs, &output_dir).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&run.facts)?);
            } else {
                let mut metrics: Vec<_> = run.facts.iter().map(|f| f.metric).collect();
                metrics.sort();
                metrics.dedup();
                let mut years: Vec<_> = run.facts.iter().filter_map(|f| f.year).collect();
                years.sort();
                years.dedup();

                println!("Rows:      {}", run.facts.len());
                println!("Documents: {}", run.documents);
                println!("Metrics:   {}", metrics.len());
                println!("Years:     {}", years.len());
            }
            for path in &run.files.paths {
                tracing::info!("Wrote {}", path.display());
            }
            if !run.failed.is_empty() {
                bail!("{} document(s) could not be processed", run.failed.len());
            }
        }
    }

    Ok(())
}
