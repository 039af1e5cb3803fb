//! # Settings
//!
//! Two sources feed a generation run:
//!
//! - **Environment** ([`SwaggerEnv`]): where to fetch documents and how to log in.
//! - **Settings file** ([`GeneratorSettings`]): an optional `uiscaffold.toml`
//!   next to the project holding heuristic thresholds, the HTTP timeout and
//!   default materialization options.
//!
//! ## Environment Variables
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `SWAGGER_API_BASE_URL` | Base URL of the auth API (`/user/auth/login`, `/user/auth/refresh`) |
//! | `SWAGGER_USERNAME` | Login name |
//! | `SWAGGER_PASSWORD` | Login password |
//! | `SWAGGER_URL_<DOMAIN>` | Document URL for one domain, e.g. `SWAGGER_URL_SALES` |
//!
//! ## Settings File
//!
//! ```toml
//! [heuristics]
//! complex_field_count = 5
//! long_text_max_length = 200
//! search_field_cap = 3
//! textarea_max_length = 100
//! analyze_tab = false
//!
//! [http]
//! timeout_ms = 30000
//!
//! [output]
//! overwrite = true
//! backup = true
//! ```
//!
//! A missing file is not an error; every key has a default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Prefix of the per-domain document URL variables.
pub const DOMAIN_URL_PREFIX: &str = "SWAGGER_URL_";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("{var} is not an http(s) URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("no SWAGGER_URL_<DOMAIN> variable is set")]
    NoDomains,
    #[error("SWAGGER_URL_{0} is not set")]
    UnknownDomain(String),
    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Login credentials for the document server.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Document-server configuration read from the process environment.
#[derive(Debug, Clone)]
pub struct SwaggerEnv {
    /// Base URL of the auth endpoints, without a trailing slash
    pub base_url: String,
    /// `None` when either `SWAGGER_USERNAME` or `SWAGGER_PASSWORD` is unset;
    /// every fetch then fails authentication for its domain
    pub credentials: Option<Credentials>,
    /// Lowercased domain name to document URL
    pub domain_urls: BTreeMap<String, String>,
}

impl SwaggerEnv {
    /// Load from the real process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit variable list.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut base_url = None;
        let mut username = None;
        let mut password = None;
        let mut domain_urls = BTreeMap::new();

        for (key, value) in vars {
            let key = key.as_ref();
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }
            match key {
                "SWAGGER_API_BASE_URL" => base_url = Some(value.trim_end_matches('/').to_string()),
                "SWAGGER_USERNAME" => username = Some(value),
                "SWAGGER_PASSWORD" => password = Some(value),
                _ => {
                    if let Some(domain) = key.strip_prefix(DOMAIN_URL_PREFIX) {
                        if !domain.is_empty() {
                            domain_urls.insert(domain.to_lowercase(), value);
                        }
                    }
                }
            }
        }

        let base_url = base_url.ok_or(SettingsError::MissingEnv("SWAGGER_API_BASE_URL"))?;
        match url::Url::parse(&base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                return Err(SettingsError::InvalidUrl {
                    var: "SWAGGER_API_BASE_URL",
                    value: base_url,
                })
            }
        }
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Ok(SwaggerEnv {
            base_url,
            credentials,
            domain_urls,
        })
    }

    /// Domains to process: all configured ones, or just `only`.
    pub fn select_domains(&self, only: Option<&str>) -> Result<Vec<(String, String)>, SettingsError> {
        match only {
            Some(domain) => {
                let key = domain.to_lowercase();
                self.domain_urls
                    .get(&key)
                    .map(|url| vec![(key.clone(), url.clone())])
                    .ok_or_else(|| SettingsError::UnknownDomain(domain.to_uppercase()))
            }
            None if self.domain_urls.is_empty() => Err(SettingsError::NoDomains),
            None => Ok(self
                .domain_urls
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()),
        }
    }
}

/// Thresholds used by the pattern classifier and the config builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// A create schema with at least this many properties is "complex"
    pub complex_field_count: usize,
    /// A string property longer than this makes a create schema "complex"
    pub long_text_max_length: u64,
    /// Maximum number of generated list search fields
    pub search_field_cap: usize,
    /// String form fields longer than this render as a textarea
    pub textarea_max_length: u64,
    /// Emit the `analyze` tab for full master-detail modules
    pub analyze_tab: bool,
}

impl Default for Heuristics {
    fn default() -> Self {
        Heuristics {
            complex_field_count: 5,
            long_text_max_length: 200,
            search_field_cap: 3,
            textarea_max_length: 100,
            analyze_tab: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings { timeout_ms: 30_000 }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Defaults for solution-config materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub overwrite: bool,
    pub backup: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            overwrite: true,
            backup: true,
        }
    }
}

/// Contents of `uiscaffold.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub heuristics: Heuristics,
    pub http: HttpSettings,
    pub output: OutputSettings,
}

impl GeneratorSettings {
    /// Default settings file name looked up in the working directory.
    pub const FILE_NAME: &'static str = "uiscaffold.toml";

    /// Load settings from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(GeneratorSettings::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
