use std::fmt;

use helpdesk_core::CoreError;

pub const DEFAULT_ZENDESK_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const ENV_ZENDESK_API_SUBDOMAIN: &str = "ZENDESK_API_SUBDOMAIN";
pub const ENV_ZENDESK_API_URL: &str = "ZENDESK_API_URL";
pub const ENV_ZENDESK_API_EMAIL: &str = "ZENDESK_API_EMAIL";
pub const ENV_ZENDESK_API_TOKEN: &str = "ZENDESK_API_TOKEN";
const ENV_ZENDESK_API_TOKEN_LEGACY: &str = "ZENDESK_API_TOEKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct ZendeskConfig {
    pub api_url: String,
    pub email: String,
    pub api_token: String,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for ZendeskConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ZendeskConfig")
            .field("api_url", &self.api_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ZendeskConfig {
    pub fn from_settings(
        api_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
        request_timeout_secs: u64,
    ) -> Result<Self, CoreError> {
        let api_url = api_url.into().trim().trim_end_matches('/').to_owned();
        if api_url.is_empty() {
            return Err(CoreError::Configuration(
                "Zendesk API URL is empty. Set ZENDESK_API_SUBDOMAIN or ZENDESK_API_URL."
                    .to_owned(),
            ));
        }

        let email = email.into().trim().to_owned();
        if email.is_empty() {
            return Err(CoreError::Configuration(
                "ZENDESK_API_EMAIL is empty. Provide the agent email used for API access."
                    .to_owned(),
            ));
        }

        let api_token = api_token.into().trim().to_owned();
        if api_token.is_empty() {
            return Err(CoreError::Configuration(
                "ZENDESK_API_TOKEN is empty. Provide a non-empty API token.".to_owned(),
            ));
        }

        if request_timeout_secs == 0 {
            return Err(CoreError::Configuration(
                "Zendesk request timeout must be greater than zero.".to_owned(),
            ));
        }

        Ok(Self {
            api_url,
            email,
            api_token,
            request_timeout_secs,
        })
    }

    /// Reads credentials from the environment. The API root comes from
    /// `ZENDESK_API_URL`, then `api_url_fallback`, then `ZENDESK_API_SUBDOMAIN`.
    pub fn from_env(
        api_url_fallback: Option<&str>,
        request_timeout_secs: u64,
    ) -> Result<Self, CoreError> {
        Self::from_lookup(
            |name| std::env::var(name).ok(),
            api_url_fallback,
            request_timeout_secs,
        )
    }

    pub fn from_lookup<F>(
        lookup: F,
        api_url_fallback: Option<&str>,
        request_timeout_secs: u64,
    ) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_url = non_empty(ENV_ZENDESK_API_URL)
            .or_else(|| {
                api_url_fallback
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_owned)
            })
            .or_else(|| non_empty(ENV_ZENDESK_API_SUBDOMAIN).map(|sub| api_url_for_subdomain(&sub)))
            .ok_or_else(|| {
                CoreError::Configuration(format!(
                    "{ENV_ZENDESK_API_SUBDOMAIN} is not set. \
                     Export the helpdesk subdomain or set {ENV_ZENDESK_API_URL}."
                ))
            })?;

        let email = non_empty(ENV_ZENDESK_API_EMAIL).ok_or_else(|| {
            CoreError::Configuration(format!(
                "{ENV_ZENDESK_API_EMAIL} is not set. Export the agent email before starting."
            ))
        })?;

        let api_token = non_empty(ENV_ZENDESK_API_TOKEN)
            .or_else(|| non_empty(ENV_ZENDESK_API_TOKEN_LEGACY))
            .ok_or_else(|| {
                CoreError::Configuration(format!(
                    "{ENV_ZENDESK_API_TOKEN} is not set. Export a valid API token before starting."
                ))
            })?;

        Self::from_settings(api_url, email, api_token, request_timeout_secs)
    }

    /// User name for token-based basic auth.
    pub fn basic_auth_user(&self) -> String {
        format!("{}/token", self.email)
    }
}

pub fn api_url_for_subdomain(subdomain: &str) -> String {
    format!("https://{}.zendesk.com/api/v2", subdomain.trim())
}
