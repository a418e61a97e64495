use std::fs;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub max_body_bytes: usize,
    /// Upper bound on stored contact submissions; unbounded when unset.
    pub max_submissions: Option<usize>,
    /// Serves the stored submissions over HTTP. Off unless configured.
    pub expose_submissions: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_submissions: None,
            expose_submissions: false,
            log_filter: "info,tower_http=debug".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bind_addr: Option<String>,
    max_body_bytes: Option<usize>,
    max_submissions: Option<usize>,
    expose_submissions: Option<bool>,
    log_filter: Option<String>,
}

/// Defaults, then `server.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    let file = match fs::read_to_string("server.toml") {
        Ok(raw) => Some(raw),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
        Err(error) => return Err(error).context("failed to read server.toml"),
    };
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid server.toml")?;
        if let Some(v) = file_cfg.bind_addr {
            settings.bind_addr = v;
        }
        if let Some(v) = file_cfg.max_body_bytes {
            settings.max_body_bytes = v;
        }
        if file_cfg.max_submissions.is_some() {
            settings.max_submissions = file_cfg.max_submissions;
        }
        if let Some(v) = file_cfg.expose_submissions {
            settings.expose_submissions = v;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = env("APP__MAX_BODY_BYTES") {
        settings.max_body_bytes = v
            .parse()
            .with_context(|| format!("APP__MAX_BODY_BYTES is not a byte count: {v:?}"))?;
    }
    if let Some(v) = env("APP__MAX_SUBMISSIONS") {
        settings.max_submissions = Some(
            v.parse()
                .with_context(|| format!("APP__MAX_SUBMISSIONS is not a count: {v:?}"))?,
        );
    }

    if let Some(v) = env("APP__EXPOSE_SUBMISSIONS") {
        settings.expose_submissions = v
            .parse()
            .with_context(|| format!("APP__EXPOSE_SUBMISSIONS is not true/false: {v:?}"))?;
    }

    if let Some(v) = env("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
