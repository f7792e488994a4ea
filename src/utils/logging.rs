//! Logger setup and trace-scoped message context.

use super::config::TRACE_CONTEXT_WIDTH;
use env_logger::Env;
use log::LevelFilter;
use std::fmt;
use std::io::Write;

/// Location of the trace a log message is about
///
/// Passed explicitly to every call that reports a problem with a specific
/// trace, and rendered as a fixed-width prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    location: String,
}

impl TraceContext {
    pub fn new(file: &str, line: impl fmt::Display) -> Self {
        Self {
            location: format!("{} : {}", file, line),
        }
    }

    /// `<file> : <line>` without padding
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<width$} |", self.location, width = TRACE_CONTEXT_WIDTH)
    }
}

/// Map the `-v` count to a level filter
///
/// **Public** - used by main.rs and tests
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initialise the global logger. Call once, from main.
///
/// `RUST_LOG` still overrides the verbosity-derived default.
pub fn init_logger(verbose: u8) {
    let default_level = level_for_verbosity(verbose).to_string().to_lowercase();

    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "{:<10}| {}", record.level(), record.args()))
        .init();

    if verbose > 2 {
        log::warn!("Exceeded max verbosity, using -vv");
    }
}
