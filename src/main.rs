mod cli;
mod commands;
mod error;
mod logging;
mod models;
mod services;
mod utils;
mod workflow;

use crate::cli::parser::{Cli, Commands};
use crate::logging::init::init_logging;
use crate::models::config::Config;
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.debug, cli.quiet);

    let command = cli.command_or_default();
    if command == Commands::Version {
        commands::version::run();
        return;
    }

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };
    log::debug!("state directory: {}", config.base_dir.display());

    let code = match command {
        Commands::Run { live, skip_verify } => commands::run::run(&config, live, skip_verify),
        Commands::Scan { json, os } => match commands::scan::run(&config, json, os.as_deref()) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                1
            }
        },
        Commands::Version => 0,
    };
    process::exit(code);
}
