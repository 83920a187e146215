use anyhow::Context;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "cinder_core=info,cinder_data=info,cinder_cui=info";

pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("cinder.log")
}

/// Sends tracing output to `path`; the terminal itself belongs to the UI.
/// `RUST_LOG` overrides the default filter.
pub fn init(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))
        .context("install tracing subscriber")
}
