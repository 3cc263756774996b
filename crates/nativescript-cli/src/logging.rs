//! Log output for the `nsg` binary.

use log::LevelFilter;

/// Default level for a `-v` count and `-q` flag.
pub fn level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install `env_logger`. `RUST_LOG` overrides the flag-derived level.
pub fn init(verbose: u8, quiet: bool) {
    let default = level(verbose, quiet).to_string().to_lowercase();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
