use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::config::LoggingConfig;

/// Default log file location: `<data dir>/farmdesk/farmdesk.log`
pub fn default_log_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("farmdesk").join("farmdesk.log"))
}

/// Where log lines are written when file logging is enabled.
pub fn log_file_path(config: &LoggingConfig) -> Option<PathBuf> {
    config.file.clone().or_else(default_log_file)
}

/// Build the dispatch for the given settings without installing it.
pub fn dispatch(config: &LoggingConfig) -> Result<fern::Dispatch> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.level_filter()?)
        .chain(std::io::stderr());

    if config.enabled {
        let path = log_file_path(config).context("Could not determine a log file location")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    Ok(dispatch)
}

/// Install the global logger. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    dispatch(config)?.apply().context("Logger already initialized")?;
    Ok(())
}
