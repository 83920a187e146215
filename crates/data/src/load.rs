use anyhow::Context;
use cinder_core::ControllerConfig;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "cinder.json";

/// Reads `<dir>/cinder.json` when present, otherwise the defaults.
pub fn load_controller_config(dir: &Path) -> anyhow::Result<ControllerConfig> {
    let path = dir.join(CONFIG_FILE);
    let config: ControllerConfig = if path.exists() {
        load_json(&path)?
    } else {
        ControllerConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

pub fn normalize_locale(locale: Option<&str>) -> String {
    let raw = locale.unwrap_or("en_US").trim();
    if raw.is_empty() {
        return "en_US".to_string();
    }
    let lowered = raw.replace('-', "_").to_ascii_lowercase();
    match lowered.as_str() {
        "zh" | "zh_cn" | "zh_hans" | "zh_hans_cn" => "zh_CN".to_string(),
        "en" | "en_us" => "en_US".to_string(),
        _ => raw.replace('-', "_"),
    }
}

pub(crate) fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
