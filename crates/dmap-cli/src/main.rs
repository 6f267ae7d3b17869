use clap::{Parser, Subcommand};

mod clean;
mod ingest;
mod output;

#[derive(Debug, Parser)]
#[command(name = "dmap")]
#[command(about = "DumpsterMap provider data cleaning pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Clean, deduplicate, score, and validate raw provider batches.
    Clean {
        /// List the batches that would be processed and exit.
        #[arg(long)]
        dry_run: bool,

        /// Skip the website validation phase.
        #[arg(long)]
        skip_validation: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dmap_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Clean {
            dry_run,
            skip_validation,
        } => clean::run_clean(&config, dry_run, skip_validation).await,
    }
}
