//! CLI module for Jobly
//!
//! Provides command-line interface parsing for the jobly-server binary.

use clap::Parser;
use std::path::PathBuf;

/// Jobly - job-board backend server
#[derive(Parser, Debug)]
#[command(
    name = "jobly-server",
    version,
    about = "Jobly - companies, jobs and user accounts over HTTP",
    after_help = "EXAMPLES:\n    \
                  jobly-server                      # Start with ./jobly.toml\n    \
                  jobly-server --config prod.toml   # Use a custom config file\n    \
                  jobly-server --port 8080          # Override the configured port"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "jobly.toml", env = "JOBLY_CONFIG")]
    pub config: PathBuf,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the configured host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the configured port
    #[arg(short, long)]
    pub port: Option<u16>,
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
    fn test_defaults() {
        let cli = Cli::try_parse_from(["jobly-server"]).expect("should parse");
        assert!(!cli.verbose);
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "jobly-server",
            "--config",
            "other.toml",
            "--port",
            "8080",
            "-v",
        ])
        .expect("should parse");

        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(cli.port, Some(8080));
        assert!(cli.verbose);
    }
}
