//! Process-wide logging bootstrap.
//!
//! Log lines go to stderr so they never mix with REPL output on stdout.
//! Events are written as `event=<name> module=<module> status=<status> ...`.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<(&'static str, LoggerHandle)> = OnceCell::new();

/// Initializes logging at `level`. Repeated calls with the same level are
/// no-ops; switching to a different level afterwards is rejected.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    if let Some((active, _)) = LOGGER.get() {
        if *active == level {
            return Ok(());
        }
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            active, level
        ));
    }

    LOGGER.get_or_try_init(|| -> Result<_, String> {
        let handle = Logger::try_with_str(level)
            .map_err(|e| format!("invalid log level `{}`: {}", level, e))?
            .log_to_stderr()
            .format(flexi_logger::detailed_format)
            .start()
            .map_err(|e| format!("failed to start logger: {}", e))?;

        info!(
            "event=app_start module=core status=ok version={} level={}",
            env!("CARGO_PKG_VERSION"),
            level
        );
        Ok((level, handle))
    })?;

    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{}`; expected trace|debug|info|warn|error|off",
            other
        )),
    }
}
