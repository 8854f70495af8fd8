//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rulemerge")]
#[command(author, version, about = "Merge remote proxy block lists into one rule file")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (built-in defaults are used when it does not exist)
    #[arg(short, long, default_value = "rulemerge.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/CI)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all sources, merge them and write the rule file
    Merge {
        /// Output file (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fetch and merge but do not write the output
        #[arg(long)]
        dry_run: bool,

        /// Print a JSON summary of the run
        #[arg(long)]
        json: bool,
    },

    /// List configured sources in priority order
    Sources,

    /// Normalize a local rule file ("-" for stdin) and print canonical rules
    Parse {
        /// File to read
        file: PathBuf,
    },

    /// Print the default configuration
    Config,

    /// Show version
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge_flags() {
        let cli = Cli::try_parse_from(["rulemerge", "-q", "merge", "--dry-run", "-o", "x.list"])
            .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Merge {
                output,
                dry_run,
                json,
            } => {
                assert_eq!(output, Some(PathBuf::from("x.list")));
                assert!(dry_run);
                assert!(!json);
            }
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["rulemerge", "sources"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("rulemerge.yaml"));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["rulemerge", "parse", "-", "--config", "c.yaml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("c.yaml"));
        assert!(matches!(cli.command, Commands::Parse { .. }));
    }
}
