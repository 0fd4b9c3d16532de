//! Configuration for the routerwatch dashboard.
//!
//! TOML profiles merged with `ROUTERWATCH_`-prefixed environment variables,
//! and translation to `routerwatch_core::DashboardConfig`. The binary layers
//! its CLI flags on top of the result.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use routerwatch_api::{DEFAULT_PLACEHOLDER, TlsMode, TransportConfig, UrlTemplate};
use routerwatch_core::{DashboardConfig, RouterId};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Settings every profile inherits.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named endpoint profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_loading_indicator")]
    pub loading_indicator: String,

    /// Request timeout; absent means requests never time out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            initial_delay_ms: default_initial_delay_ms(),
            loading_indicator: default_loading_indicator(),
            timeout_secs: None,
            insecure: false,
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    60
}
fn default_initial_delay_ms() -> u64 {
    500
}
fn default_loading_indicator() -> String {
    routerwatch_core::config::DEFAULT_LOADING_INDICATOR.into()
}

/// A named graph endpoint profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Endpoint URL template, e.g. `"https://noc.example/graph/none"`.
    pub graph_url: String,

    /// Token in `graph_url` replaced by the router id (default `none`).
    pub placeholder: Option<String>,

    /// Routers listed in the dashboard.
    #[serde(default)]
    pub routers: Vec<String>,

    pub poll_interval_secs: Option<u64>,

    pub initial_delay_ms: Option<u64>,

    pub loading_indicator: Option<String>,

    pub timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "routerwatch", "routerwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("routerwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
///
/// A missing file yields the defaults; a malformed one is an error.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Environment keys nest on double underscores:
/// `ROUTERWATCH_DEFAULTS__POLL_INTERVAL_SECS=30`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROUTERWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Store `profile` under `name` in the canonical config file.
pub fn save_profile(name: &str, profile: Profile) -> Result<Config, ConfigError> {
    save_profile_to(name, profile, &config_path())
}

/// Store `profile` under `name` in the file at `path`, keeping the other
/// profiles. The first profile saved becomes the default.
pub fn save_profile_to(name: &str, profile: Profile, path: &Path) -> Result<Config, ConfigError> {
    let mut cfg = load_config_from(path)?;
    if cfg.profiles.is_empty() {
        cfg.default_profile = Some(name.into());
    }
    cfg.profiles.insert(name.into(), profile);
    save_config_to(&cfg, path)?;
    Ok(cfg)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DashboardConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let placeholder = profile
        .placeholder
        .clone()
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER.into());
    let graph_url = UrlTemplate::new(profile.graph_url.clone(), placeholder).map_err(|e| {
        ConfigError::Validation {
            field: "graph_url".into(),
            reason: e.to_string(),
        }
    })?;

    let poll_interval_secs = profile
        .poll_interval_secs
        .unwrap_or(defaults.poll_interval_secs);
    if poll_interval_secs == 0 {
        return Err(ConfigError::Validation {
            field: "poll_interval_secs".into(),
            reason: "must be at least 1".into(),
        });
    }

    let routers = profile
        .routers
        .iter()
        .map(|raw| {
            RouterId::new(raw).map_err(|e| ConfigError::Validation {
                field: "routers".into(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = profile
        .timeout_secs
        .or(defaults.timeout_secs)
        .map(Duration::from_secs);

    Ok(DashboardConfig {
        graph_url,
        routers,
        poll_interval: Duration::from_secs(poll_interval_secs),
        initial_fetch_delay: Duration::from_millis(
            profile.initial_delay_ms.unwrap_or(defaults.initial_delay_ms),
        ),
        loading_indicator: profile
            .loading_indicator
            .clone()
            .unwrap_or_else(|| defaults.loading_indicator.clone()),
        transport: TransportConfig { tls, timeout },
    })
}
