//! rulemerge - merge remote proxy block lists into one rule file.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rulemerge::cli::{Cli, Commands};
use rulemerge::commands::merge::MergeOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Merge {
            output,
            dry_run,
            json,
        } => {
            let opts = MergeOptions {
                output,
                dry_run,
                json,
            };
            rulemerge::commands::merge::run(opts, &cli.config).await
        }
        Commands::Sources => rulemerge::commands::sources::run(&cli.config).await,
        Commands::Parse { file } => rulemerge::commands::parse::run(&file).await,
        Commands::Config => rulemerge::commands::config::run().await,
        Commands::Version => {
            println!("rulemerge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
