//! Bidirectional cursor over the remote, lazily fetched ticket collection.
//!
//! The navigator keeps three locators for one browsing session. `curr` is the
//! page last materialized for the caller; `next` and `prev` are whatever that
//! page advertised (or, for the direction just travelled from, the navigator's
//! own previous `curr`). Pointers only move when a fetch lands on a non-empty
//! page, so failed or speculative moves never leave the cursor half-updated.
//!
//! The navigator holds no lock. Callers sharing one across tasks must
//! serialize `current_batch`/`advance` themselves (the registry hands it out
//! behind a `tokio::sync::Mutex`).

use tracing::{debug, warn};

use crate::fetcher::{first_page_locator, PageFetcher};
use crate::identifiers::PageLocator;
use crate::model::{Direction, Ticket, TicketPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorPointers {
    pub curr: PageLocator,
    pub next: Option<PageLocator>,
    pub prev: Option<PageLocator>,
}

#[derive(Debug, Clone)]
pub struct CursorNavigator {
    fetcher: PageFetcher,
    pointers: NavigatorPointers,
}

impl CursorNavigator {
    pub fn new(fetcher: PageFetcher, root: &str, page_size: u32) -> Self {
        Self {
            fetcher,
            pointers: NavigatorPointers {
                curr: first_page_locator(root, page_size.max(1)),
                next: None,
                prev: None,
            },
        }
    }

    pub fn current_locator(&self) -> &PageLocator {
        &self.pointers.curr
    }

    pub fn next_locator(&self) -> Option<&PageLocator> {
        self.pointers.next.as_ref()
    }

    pub fn previous_locator(&self) -> Option<&PageLocator> {
        self.pointers.prev.as_ref()
    }

    pub fn snapshot(&self) -> NavigatorPointers {
        self.pointers.clone()
    }

    pub fn can_advance(&self, direction: Direction) -> bool {
        self.target(direction).is_some()
    }

    /// Re-fetches `curr` and refreshes `next`/`prev` from it. On failure the
    /// pointers are left as they were and an empty batch is returned.
    pub async fn current_batch(&mut self) -> Vec<Ticket> {
        match self.fetcher.fetch_page(&self.pointers.curr).await {
            Ok(page) => {
                self.pointers.next = page.links.next;
                self.pointers.prev = page.links.prev;
                page.tickets
            }
            Err(error) => {
                warn!(
                    locator = self.pointers.curr.as_str(),
                    error = %error,
                    "failed to fetch current ticket batch"
                );
                Vec::new()
            }
        }
    }

    /// Moves one page in `direction`. Returns an empty batch and leaves every
    /// pointer untouched when there is no target, the fetch fails, or the
    /// target page has no tickets.
    pub async fn advance(&mut self, direction: Direction) -> Vec<Ticket> {
        let Some(target) = self.target(direction).cloned() else {
            debug!(direction = direction.as_key(), "no locator in requested direction");
            return Vec::new();
        };

        let page = match self.fetcher.fetch_page(&target).await {
            Ok(page) => page,
            Err(error) => {
                warn!(
                    direction = direction.as_key(),
                    locator = target.as_str(),
                    error = %error,
                    "failed to fetch adjacent ticket batch"
                );
                return Vec::new();
            }
        };

        if page.is_empty() {
            debug!(
                direction = direction.as_key(),
                locator = target.as_str(),
                "adjacent ticket batch is empty; cursor not moved"
            );
            return Vec::new();
        }

        self.commit(direction, target, page)
    }

    fn target(&self, direction: Direction) -> Option<&PageLocator> {
        match direction {
            Direction::Forward => self.pointers.next.as_ref(),
            Direction::Backward => self.pointers.prev.as_ref(),
        }
    }

    fn commit(
        &mut self,
        direction: Direction,
        target: PageLocator,
        page: TicketPage,
    ) -> Vec<Ticket> {
        let previous_curr = std::mem::replace(&mut self.pointers.curr, target);
        match direction {
            Direction::Forward => {
                self.pointers.prev = Some(previous_curr);
                self.pointers.next = page.links.next;
            }
            Direction::Backward => {
                self.pointers.next = Some(previous_curr);
                self.pointers.prev = page.links.prev;
            }
        }

        debug!(
            direction = direction.as_key(),
            curr = self.pointers.curr.as_str(),
            next = self.pointers.next.as_ref().map(PageLocator::as_str),
            prev = self.pointers.prev.as_ref().map(PageLocator::as_str),
            tickets = page.tickets.len(),
            "ticket cursor moved"
        );
        page.tickets
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::error::FetchError;
    use crate::fetcher::test_support::StubTransport;

    const ROOT: &str = "https://acme.zendesk.com/api/v2";
    const P1_INIT: &str = "https://acme.zendesk.com/api/v2/tickets?page[size]=25";
    const P1_LINKED: &str =
        "https://acme.zendesk.com/api/v2/tickets?page%5Bbefore%5D=cDI%3D&page%5Bsize%5D=25";
    const P0_BEFORE: &str =
        "https://acme.zendesk.com/api/v2/tickets?page%5Bbefore%5D=cDE%3D&page%5Bsize%5D=25";
    const P2: &str =
        "https://acme.zendesk.com/api/v2/tickets?page%5Bafter%5D=cDE%3D&page%5Bsize%5D=25";
    const P3: &str =
        "https://acme.zendesk.com/api/v2/tickets?page%5Bafter%5D=cDI%3D&page%5Bsize%5D=25";

    fn tickets(range: std::ops::RangeInclusive<u64>) -> Vec<Value> {
        range.map(|id| json!({ "id": id })).collect()
    }

    fn page(tickets: Vec<Value>, next: Option<&str>, prev: Option<&str>) -> Value {
        json!({
            "tickets": tickets,
            "meta": { "has_more": next.is_some() },
            "links": { "next": next, "prev": prev }
        })
    }

    fn ids(batch: &[Ticket]) -> Vec<u64> {
        batch
            .iter()
            .filter_map(|ticket| ticket.field("id").and_then(Value::as_u64))
            .collect()
    }

    fn navigator_with(stub: &Arc<StubTransport>) -> CursorNavigator {
        CursorNavigator::new(PageFetcher::new(stub.clone()), ROOT, 25)
    }

    /// P0 (empty) <- P1 <-> P2 <-> P3, as a cursor-paginated remote reports it.
    fn three_page_remote() -> Arc<StubTransport> {
        let stub = Arc::new(StubTransport::default());
        stub.respond(P1_INIT, page(tickets(1..=25), Some(P2), Some(P0_BEFORE)));
        stub.respond(P1_LINKED, page(tickets(1..=25), Some(P2), Some(P0_BEFORE)));
        stub.respond(P0_BEFORE, page(Vec::new(), None, None));
        stub.respond(P2, page(tickets(26..=50), Some(P3), Some(P1_LINKED)));
        stub.respond(P3, page(tickets(51..=60), None, Some(P2)));
        stub
    }

    #[test]
    fn new_navigator_points_at_first_page_only() {
        let stub = Arc::new(StubTransport::default());
        let navigator = navigator_with(&stub);

        assert_eq!(navigator.current_locator().as_str(), P1_INIT);
        assert_eq!(navigator.next_locator(), None);
        assert_eq!(navigator.previous_locator(), None);
        assert!(!navigator.can_advance(Direction::Forward));
        assert!(!navigator.can_advance(Direction::Backward));
        assert_eq!(stub.request_count(), 0);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let stub = Arc::new(StubTransport::default());
        let navigator = CursorNavigator::new(PageFetcher::new(stub), ROOT, 0);
        assert!(navigator.current_locator().as_str().ends_with("page[size]=1"));
    }

    #[tokio::test]
    async fn current_batch_refreshes_links_from_page() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);

        let batch = navigator.current_batch().await;
        assert_eq!(ids(&batch), (1..=25_u64).collect::<Vec<_>>());
        assert_eq!(
            navigator.snapshot(),
            NavigatorPointers {
                curr: PageLocator::new(P1_INIT),
                next: Some(PageLocator::new(P2)),
                prev: Some(PageLocator::new(P0_BEFORE)),
            }
        );
    }

    #[tokio::test]
    async fn current_batch_is_idempotent() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);

        let first = navigator.current_batch().await;
        let after_first = navigator.snapshot();
        let second = navigator.current_batch().await;

        assert_eq!(first, second);
        assert_eq!(after_first, navigator.snapshot());
        assert_eq!(stub.requests(), vec![P1_INIT.to_owned(), P1_INIT.to_owned()]);
    }

    #[tokio::test]
    async fn current_batch_failure_keeps_pointers() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);
        navigator.current_batch().await;
        let before = navigator.snapshot();

        stub.fail(P1_INIT, FetchError::transport(P1_INIT, "connection reset"));
        let batch = navigator.current_batch().await;

        assert!(batch.is_empty());
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn current_batch_of_empty_collection_is_not_a_failure() {
        let stub = Arc::new(StubTransport::default());
        stub.respond(P1_INIT, page(Vec::new(), None, None));
        let mut navigator = navigator_with(&stub);

        assert!(navigator.current_batch().await.is_empty());
        assert_eq!(navigator.current_locator().as_str(), P1_INIT);
        assert_eq!(navigator.next_locator(), None);
    }

    #[tokio::test]
    async fn advance_without_target_does_not_fetch_or_move() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);

        assert!(navigator.advance(Direction::Forward).await.is_empty());
        assert!(navigator.advance(Direction::Backward).await.is_empty());
        assert_eq!(navigator.current_locator().as_str(), P1_INIT);
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn advance_forward_re_anchors_pointers() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);
        navigator.current_batch().await;

        let batch = navigator.advance(Direction::Forward).await;

        assert_eq!(ids(&batch), (26..=50_u64).collect::<Vec<_>>());
        // prev is the navigator's own pre-move curr, not the page's reported prev.
        assert_eq!(
            navigator.snapshot(),
            NavigatorPointers {
                curr: PageLocator::new(P2),
                next: Some(PageLocator::new(P3)),
                prev: Some(PageLocator::new(P1_INIT)),
            }
        );
    }

    #[tokio::test]
    async fn advance_onto_empty_page_leaves_cursor_in_place() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);
        navigator.current_batch().await;
        let before = navigator.snapshot();

        let batch = navigator.advance(Direction::Backward).await;

        assert!(batch.is_empty());
        assert_eq!(navigator.snapshot(), before);
        assert_eq!(stub.requests().last().map(String::as_str), Some(P0_BEFORE));
    }

    #[tokio::test]
    async fn advance_failure_leaves_cursor_in_place() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);
        navigator.current_batch().await;
        let before = navigator.snapshot();

        stub.fail(P2, FetchError::remote_status(P2, 503, "maintenance"));
        let batch = navigator.advance(Direction::Forward).await;

        assert!(batch.is_empty());
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn backward_failure_leaves_cursor_in_place() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);
        navigator.current_batch().await;
        navigator.advance(Direction::Forward).await;
        let before = navigator.snapshot();
        assert_eq!(before.prev, Some(PageLocator::new(P1_INIT)));

        stub.fail(P1_INIT, FetchError::remote_status(P1_INIT, 503, "maintenance"));
        let batch = navigator.advance(Direction::Backward).await;

        assert!(batch.is_empty());
        assert_eq!(navigator.snapshot(), before);
        assert_eq!(stub.requests().last().map(String::as_str), Some(P1_INIT));
    }

    #[tokio::test]
    async fn forward_then_backward_returns_to_the_starting_page() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);
        let original = navigator.current_batch().await;

        navigator.advance(Direction::Forward).await;
        let back = navigator.advance(Direction::Backward).await;

        assert_eq!(back, original);
        assert_eq!(navigator.current_locator().as_str(), P1_INIT);
        assert_eq!(navigator.next_locator(), Some(&PageLocator::new(P2)));
        assert_eq!(navigator.previous_locator(), Some(&PageLocator::new(P0_BEFORE)));
    }

    #[tokio::test]
    async fn walking_to_the_last_page_stops_at_the_edge() {
        let stub = three_page_remote();
        let mut navigator = navigator_with(&stub);
        navigator.current_batch().await;

        assert_eq!(ids(&navigator.advance(Direction::Forward).await).len(), 25);
        assert_eq!(
            ids(&navigator.advance(Direction::Forward).await),
            (51..=60_u64).collect::<Vec<_>>()
        );
        assert_eq!(navigator.current_locator().as_str(), P3);
        assert_eq!(navigator.next_locator(), None);

        let requests_at_edge = stub.request_count();
        assert!(navigator.advance(Direction::Forward).await.is_empty());
        assert_eq!(stub.request_count(), requests_at_edge);
        assert_eq!(navigator.current_locator().as_str(), P3);

        let back = navigator.advance(Direction::Backward).await;
        assert_eq!(ids(&back), (26..=50_u64).collect::<Vec<_>>());
        assert_eq!(
            navigator.snapshot(),
            NavigatorPointers {
                curr: PageLocator::new(P2),
                next: Some(PageLocator::new(P3)),
                prev: Some(PageLocator::new(P1_LINKED)),
            }
        );
    }
}
