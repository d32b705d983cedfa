use crate::models::config::Config;
use crate::workflow;

pub fn run(config: &Config, live: bool, skip_verify: bool) -> i32 {
    if live {
        log::info!("starting in live mode, files will be deleted once confirmed");
    }
    if skip_verify {
        log::info!("backup archives will not be read back before deletion");
    }
    workflow::run(config, !live, !skip_verify)
}
