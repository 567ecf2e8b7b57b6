use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::ConnectOptions;
use serde::Deserialize;
use tracing::warn;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub balance_api_url: String,
    pub currency: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".into(),
            balance_api_url: "https://api.multiversx.com".into(),
            currency: client_core::DEFAULT_CURRENCY.into(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    balance_api_url: Option<String>,
    currency: Option<String>,
    request_timeout_seconds: Option<u64>,
}

/// Defaults, then `path` if it exists, then environment overrides.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Err(err) = apply_file(&mut settings, &raw) {
            warn!("config: ignoring {}: {err:#}", path.display());
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
    if let Some(v) = file_cfg.backend_url {
        settings.backend_url = v;
    }
    if let Some(v) = file_cfg.balance_api_url {
        settings.balance_api_url = v;
    }
    if let Some(v) = file_cfg.currency {
        settings.currency = v;
    }
    if let Some(v) = file_cfg.request_timeout_seconds {
        settings.request_timeout_seconds = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("STUDIO_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = var("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = var("STUDIO_BALANCE_API_URL") {
        settings.balance_api_url = v;
    }
    if let Some(v) = var("APP__BALANCE_API_URL") {
        settings.balance_api_url = v;
    }

    if let Some(v) = var("APP__CURRENCY") {
        settings.currency = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECONDS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_seconds = parsed,
            Err(_) => warn!("config: ignoring non-numeric APP__REQUEST_TIMEOUT_SECONDS={v}"),
        }
    }
}

impl Settings {
    pub fn connect_options(&self) -> anyhow::Result<ConnectOptions> {
        let backend_url = Url::parse(&self.backend_url)
            .with_context(|| format!("invalid backend url '{}'", self.backend_url))?;
        let balance_api_url = Url::parse(&self.balance_api_url)
            .with_context(|| format!("invalid balance api url '{}'", self.balance_api_url))?;

        let mut options = ConnectOptions::new(backend_url, balance_api_url);
        options.currency = self.currency.clone();
        options.request_timeout = Duration::from_secs(self.request_timeout_seconds);
        Ok(options)
    }
}
