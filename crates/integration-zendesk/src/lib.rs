pub mod config;
pub mod transport;

pub use config::ZendeskConfig;
pub use transport::ZendeskTransport;
