use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::LevelFilter,
    fmt::{self, MakeWriter, format::FmtSpan},
    prelude::*,
    registry::LookupSpan,
};

/// Maps `-q` and the `-v` count to a console level. Warnings are shown by default.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// The log file always records at least per-model debug events, whatever the
/// console shows. `-q` does not silence it.
pub fn file_level_filter(verbosity: u8) -> LevelFilter {
    level_filter(verbosity, false).max(LevelFilter::DEBUG)
}

/// Plain-text layer for `--log-file`. Records call sites and closes of the
/// instrumented parse and analysis spans, with their busy time.
fn file_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}

/// Installs the global subscriber. Stdout is left alone so JSON output can be piped.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(level_filter(verbosity, quiet));

    let file = match log_file {
        Some(path) => {
            Some(file_layer(File::create(path)?).with_filter(file_level_filter(verbosity)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}
