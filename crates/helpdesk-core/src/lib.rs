//! Session-scoped paging over a remote helpdesk's cursor-paginated ticket
//! list, plus single-ticket detail enrichment.

pub mod enricher;
pub mod error;
pub mod fetcher;
pub mod identifiers;
pub mod model;
pub mod navigator;
pub mod registry;

pub use enricher::TicketEnricher;
pub use error::{CoreError, FetchError};
pub use fetcher::{first_page_locator, ticket_url, user_url, HelpdeskTransport, PageFetcher};
pub use identifiers::{PageLocator, SessionId, UserId};
pub use model::{Direction, EnrichedTicket, PageLinks, Ticket, TicketPage, User};
pub use navigator::{CursorNavigator, NavigatorPointers};
pub use registry::{SessionRegistry, SharedNavigator};
