use log::LevelFilter;

pub fn init_logging(verbose: bool, debug: bool, quiet: bool) {
    let log_level = if debug {
        LevelFilter::Trace
    } else if verbose {
        LevelFilter::Info
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new().filter_level(log_level).init();
}
