use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FetchError;
use crate::identifiers::{PageLocator, UserId};
use crate::model::{Ticket, TicketPage, User};

/// One authenticated GET against the remote helpdesk API.
#[async_trait]
pub trait HelpdeskTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Stateless typed reads over a [`HelpdeskTransport`].
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn HelpdeskTransport>,
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("PageFetcher").finish_non_exhaustive()
    }
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn HelpdeskTransport>) -> Self {
        Self { transport }
    }

    pub async fn fetch_page(&self, locator: &PageLocator) -> Result<TicketPage, FetchError> {
        let payload = self.transport.get_json(locator.as_str()).await?;
        decode(locator.as_str(), payload)
    }

    pub async fn fetch_ticket(&self, locator: &PageLocator) -> Result<Ticket, FetchError> {
        let payload = self.transport.get_json(locator.as_str()).await?;
        unwrap_envelope(locator.as_str(), payload, "ticket")
    }

    pub async fn fetch_user(&self, url: &str) -> Result<User, FetchError> {
        let payload = self.transport.get_json(url).await?;
        unwrap_envelope(url, payload, "user")
    }
}

pub fn first_page_locator(root: &str, page_size: u32) -> PageLocator {
    PageLocator::new(format!("{}?page[size]={page_size}", endpoint(root, "tickets")))
}

pub fn ticket_url(root: &str, ticket_id: &str) -> PageLocator {
    PageLocator::new(endpoint(root, &format!("tickets/{ticket_id}")))
}

pub fn user_url(root: &str, user_id: &UserId) -> String {
    endpoint(root, &format!("users/{}", user_id.as_str()))
}

fn endpoint(root: &str, path: &str) -> String {
    let base = root.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');
    format!("{base}/{suffix}")
}

fn decode<T: DeserializeOwned>(locator: &str, payload: Value) -> Result<T, FetchError> {
    serde_json::from_value(payload)
        .map_err(|error| FetchError::parse(locator, format!("payload decode failed: {error}")))
}

fn unwrap_envelope<T: DeserializeOwned>(
    locator: &str,
    mut payload: Value,
    key: &str,
) -> Result<T, FetchError> {
    match payload.get_mut(key).map(Value::take) {
        Some(inner) => decode(locator, inner),
        None => Err(FetchError::parse(
            locator,
            format!("response does not contain a '{key}' payload"),
        )),
    }
}
