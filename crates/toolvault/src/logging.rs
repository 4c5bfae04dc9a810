//! Logger setup for the binary. Libraries only use the `log` facade.

use log::LevelFilter;

/// Level from `-v` flags, falling back to the configured level
pub fn level_for(verbose: u8, configured: &str) -> LevelFilter {
    match verbose {
        0 => configured.parse().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize `env_logger` on stderr. `RUST_LOG` wins over `level`.
pub fn init(level: LevelFilter) {
    let result = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.as_str().to_lowercase()),
    )
    .format_timestamp_millis()
    .target(env_logger::Target::Stderr)
    .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
