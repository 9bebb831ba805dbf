//! Logger setup. Logs go to stderr so stdout carries only the report.

use log::LevelFilter;
use simple_logger::SimpleLogger;

pub const LOG_LEVEL_ENV_VAR: &str = "SHIPCHECK_LOG";

pub fn init() {
    let level = std::env::var(LOG_LEVEL_ENV_VAR)
        .map(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info);

    SimpleLogger::new()
        .with_level(level)
        .init()
        .unwrap_or_else(|_| eprintln!("Warning: Logger already initialized"));
}

fn parse_level(value: &str) -> LevelFilter {
    match value {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}
