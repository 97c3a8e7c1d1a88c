use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// A single failed remote read. Callers in this crate log it and collapse it
/// into an empty result; nothing past the navigator or enricher sees it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {locator} failed: {message}")]
    Transport { locator: String, message: String },
    #[error("request to {locator} failed with status {status}: {body}")]
    RemoteStatus {
        locator: String,
        status: u16,
        body: String,
    },
    #[error("response from {locator} was malformed: {message}")]
    Parse { locator: String, message: String },
}

impl FetchError {
    pub fn transport(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            locator: locator.into(),
            message: message.into(),
        }
    }

    pub fn remote_status(locator: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::RemoteStatus {
            locator: locator.into(),
            status,
            body: body.into(),
        }
    }

    pub fn parse(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            locator: locator.into(),
            message: message.into(),
        }
    }

    pub fn locator(&self) -> &str {
        match self {
            Self::Transport { locator, .. }
            | Self::RemoteStatus { locator, .. }
            | Self::Parse { locator, .. } => locator,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
