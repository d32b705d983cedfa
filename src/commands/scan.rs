use crate::models::config::Config;
use crate::models::installation::DiscoveryResult;
use crate::models::types::OsFamily;
use crate::services::discovery::{discover, discover_with};
use crate::services::permissions::PermissionValidator;
use crate::services::prober::ProbeEnv;
use crate::utils::fs::format_size;
use crate::workflow::view::installation_table;
use anyhow::{Context, Result};

pub fn run(config: &Config, json: bool, os: Option<&str>) -> Result<i32> {
    let mut result = match os {
        Some(name) => {
            let os: OsFamily = name.parse()?;
            log::info!("listing candidates with the {} layout", os);
            let config = Config { os, ..config.clone() };
            // The active binary belongs to the host, so it is not consulted here.
            discover_with(
                ProbeEnv::from_config(&config),
                None,
                &PermissionValidator::detect(os),
            )
        }
        None => discover(config),
    };

    if let Some(error) = result.error.take() {
        eprintln!("Error: {}", error);
        if let Some(hint) = error.hint() {
            eprintln!("Hint: {}", hint);
        }
        return Ok(1);
    }

    if json {
        let out = serde_json::to_string_pretty(&result).context("Failed to serialize scan result")?;
        println!("{}", out);
    } else {
        print_summary(&result);
    }
    Ok(0)
}

fn print_summary(result: &DiscoveryResult) {
    if result.installations.is_empty() {
        println!("No Go installations found.");
        return;
    }

    println!("{}", installation_table(&result.installations));
    println!();
    println!("Total size: {}", format_size(result.total_size()));
    if let Some(primary) = &result.primary_path {
        println!("Primary installation: {}", primary.display());
    }
    if result.permissions_ok {
        println!("Permissions: ok");
    } else {
        println!("Permissions: insufficient, removal needs sudo/admin privileges");
    }
}
