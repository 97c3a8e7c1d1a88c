use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_HELPDESK_CONFIG: &str = "HELPDESK_CONFIG";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Message(String),
}

impl ConfigError {
    fn configuration(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HelpdeskConfig {
    #[serde(default)]
    pub server: ServerConfigToml,
    #[serde(default)]
    pub zendesk: ZendeskConfigToml,
    #[serde(default)]
    pub pagination: PaginationConfigToml,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfigToml {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfigToml {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZendeskConfigToml {
    /// Overrides the `https://{subdomain}.zendesk.com/api/v2` root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ZendeskConfigToml {
    fn default() -> Self {
        Self {
            api_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationConfigToml {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PaginationConfigToml {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl HelpdeskConfig {
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.trim().parse().map_err(|err| {
            ConfigError::configuration(format!(
                "server.bind_address '{}' is not a valid socket address: {err}",
                self.server.bind_address
            ))
        })
    }

    pub fn api_url_override(&self) -> Option<&str> {
        self.zendesk
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;
        if self.pagination.page_size == 0 {
            return Err(ConfigError::configuration(
                "pagination.page_size must be greater than zero",
            ));
        }
        if self.zendesk.request_timeout_secs == 0 {
            return Err(ConfigError::configuration(
                "zendesk.request_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

pub fn load_from_env() -> Result<HelpdeskConfig, ConfigError> {
    let path = resolve_config_path(|name| std::env::var(name).ok())?;
    load_from_path(path)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<HelpdeskConfig, ConfigError> {
    let config = load_or_create_config(path.as_ref())?;
    config.validate()?;
    Ok(config)
}

/// `HELPDESK_CONFIG` when set and non-blank, otherwise the per-user default.
pub fn resolve_config_path<F>(lookup: F) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_HELPDESK_CONFIG) {
        if !raw.trim().is_empty() {
            return Ok(PathBuf::from(raw.trim()));
        }
    }

    let home = lookup("HOME")
        .or_else(|| lookup("USERPROFILE"))
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ConfigError::configuration("Unable to resolve home directory from HOME or USERPROFILE")
        })?;

    Ok(PathBuf::from(home)
        .join(".config")
        .join("helpdesk-proxy")
        .join("config.toml"))
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_owned()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn persist_config(path: &Path, config: &HelpdeskConfig) -> Result<(), ConfigError> {
    let rendered = toml::to_string_pretty(config).map_err(|err| {
        ConfigError::configuration(format!(
            "Failed to serialize HELPDESK_CONFIG for {}: {err}",
            path.display()
        ))
    })?;

    std::fs::write(path, rendered.as_bytes()).map_err(|err| {
        ConfigError::configuration(format!(
            "Failed to write HELPDESK_CONFIG to {}: {err}",
            path.display()
        ))
    })
}

fn load_or_create_config(path: &Path) -> Result<HelpdeskConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|err| {
                        ConfigError::configuration(format!(
                            "Failed to create parent directory {} for HELPDESK_CONFIG: {err}",
                            parent.display()
                        ))
                    })?;
                }
            }

            let default_config = HelpdeskConfig::default();
            persist_config(path, &default_config)?;
            return Ok(default_config);
        }
        Err(err) => {
            return Err(ConfigError::configuration(format!(
                "Failed to read HELPDESK_CONFIG from {}: {err}",
                path.display()
            )));
        }
    };

    toml::from_str(&raw).map_err(|err| {
        ConfigError::configuration(format!(
            "Failed to parse HELPDESK_CONFIG from {}: {err}",
            path.display()
        ))
    })
}
