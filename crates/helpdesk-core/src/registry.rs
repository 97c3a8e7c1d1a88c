use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::enricher::TicketEnricher;
use crate::fetcher::PageFetcher;
use crate::identifiers::SessionId;
use crate::navigator::CursorNavigator;

pub type SharedNavigator = Arc<AsyncMutex<CursorNavigator>>;

/// Per-session navigators and enrichers, created on first use and kept for
/// the life of the process. There is no eviction.
#[derive(Debug)]
pub struct SessionRegistry {
    fetcher: PageFetcher,
    navigators: AsyncMutex<HashMap<SessionId, SharedNavigator>>,
    enrichers: AsyncMutex<HashMap<SessionId, Arc<TicketEnricher>>>,
}

impl SessionRegistry {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            navigators: AsyncMutex::new(HashMap::new()),
            enrichers: AsyncMutex::new(HashMap::new()),
        }
    }

    /// `root` and `page_size` only matter the first time a session is seen.
    pub async fn get_or_create_navigator(
        &self,
        session_id: &SessionId,
        root: &str,
        page_size: u32,
    ) -> SharedNavigator {
        let mut navigators = self.navigators.lock().await;
        match navigators.entry(session_id.clone()) {
            Entry::Occupied(slot) => Arc::clone(slot.get()),
            Entry::Vacant(slot) => {
                debug!(session_id = session_id.as_str(), page_size, "creating ticket navigator");
                let navigator = CursorNavigator::new(self.fetcher.clone(), root, page_size);
                Arc::clone(slot.insert(Arc::new(AsyncMutex::new(navigator))))
            }
        }
    }

    pub async fn navigator(&self, session_id: &SessionId) -> Option<SharedNavigator> {
        self.navigators.lock().await.get(session_id).cloned()
    }

    pub async fn get_or_create_enricher(
        &self,
        session_id: &SessionId,
        root: &str,
    ) -> Arc<TicketEnricher> {
        let mut enrichers = self.enrichers.lock().await;
        match enrichers.entry(session_id.clone()) {
            Entry::Occupied(slot) => Arc::clone(slot.get()),
            Entry::Vacant(slot) => {
                debug!(session_id = session_id.as_str(), "creating ticket enricher");
                let enricher = TicketEnricher::new(self.fetcher.clone(), root);
                Arc::clone(slot.insert(Arc::new(enricher)))
            }
        }
    }

    /// A session is known once it has a navigator.
    pub async fn has_session(&self, session_id: &SessionId) -> bool {
        self.navigators.lock().await.contains_key(session_id)
    }

    pub async fn session_count(&self) -> usize {
        self.navigators.lock().await.len()
    }
}
