use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Settings;

const LOG_FILE: &str = "reso.log";

/// File logging only: the terminal belongs to the UI. The returned guard
/// flushes the writer when dropped, so keep it alive for the whole run.
pub fn init(settings: &Settings) -> Result<Option<WorkerGuard>> {
    if !settings.log_file {
        return Ok(None);
    }
    let Some(dir) = settings.log_dir() else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("RESO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
        .try_init()
        .context("install tracing subscriber")?;
    tracing::info!(target: "tui", "logging to {}", dir.join(LOG_FILE).display());
    Ok(Some(guard))
}
