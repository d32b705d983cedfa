use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gosweep")]
#[command(about = "Find and safely remove every Go toolchain on this machine", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Detect installations and walk through the guarded removal (default)
    Run {
        /// Start with dry-run disabled; it can still be toggled with `d`
        #[arg(long)]
        live: bool,
        /// Do not read backup archives back before deleting
        #[arg(long)]
        skip_verify: bool,
    },
    /// Only list detected installations
    Scan {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Probe the path layout of another platform (linux, macos, windows)
        #[arg(long)]
        os: Option<String>,
    },
    /// Print version information
    Version,
}

impl Cli {
    pub fn command_or_default(&self) -> Commands {
        match &self.command {
            Some(Commands::Run { live, skip_verify }) => Commands::Run {
                live: *live,
                skip_verify: *skip_verify,
            },
            Some(Commands::Scan { json, os }) => Commands::Scan {
                json: *json,
                os: os.clone(),
            },
            Some(Commands::Version) => Commands::Version,
            None => Commands::Run {
                live: false,
                skip_verify: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_dry_run() {
        let cli = Cli::try_parse_from(["gosweep"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Run {
                live: false,
                skip_verify: false
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gosweep", "scan", "--json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command_or_default(),
            Commands::Scan {
                json: true,
                os: None
            }
        );
    }

    #[test]
    fn test_live_flag() {
        let cli = Cli::try_parse_from(["gosweep", "run", "--live"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Run {
                live: true,
                skip_verify: false
            }
        );
    }
}
