use tracing::warn;

use crate::fetcher::{user_url, PageFetcher};
use crate::identifiers::{PageLocator, UserId};
use crate::model::{EnrichedTicket, User};

/// Joins one ticket with its requester and assignee. Nothing is cached; each
/// call costs one ticket read and two user reads.
#[derive(Debug, Clone)]
pub struct TicketEnricher {
    fetcher: PageFetcher,
    root: String,
}

impl TicketEnricher {
    pub fn new(fetcher: PageFetcher, root: impl Into<String>) -> Self {
        Self {
            fetcher,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// All-or-nothing: `None` unless the ticket and both users were fetched.
    pub async fn get_enriched_ticket(&self, locator: &PageLocator) -> Option<EnrichedTicket> {
        let ticket = match self.fetcher.fetch_ticket(locator).await {
            Ok(ticket) => ticket,
            Err(error) => {
                warn!(locator = locator.as_str(), error = %error, "failed to fetch ticket details");
                return None;
            }
        };

        let (Some(requester_id), Some(assignee_id)) = (ticket.requester_id(), ticket.assignee_id())
        else {
            warn!(
                locator = locator.as_str(),
                "ticket is missing a requester or assignee reference"
            );
            return None;
        };

        let (requester, assignee) =
            tokio::join!(self.fetch_user(&requester_id), self.fetch_user(&assignee_id));

        Some(EnrichedTicket {
            ticket,
            requester: requester?,
            assignee: assignee?,
        })
    }

    async fn fetch_user(&self, user_id: &UserId) -> Option<User> {
        let url = user_url(&self.root, user_id);
        match self.fetcher.fetch_user(&url).await {
            Ok(user) => Some(user),
            Err(error) => {
                warn!(
                    user_id = user_id.as_str(),
                    error = %error,
                    "failed to fetch user for ticket details"
                );
                None
            }
        }
    }
}
