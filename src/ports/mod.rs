//! Port traits the domain talks to; adapters implement them.

pub mod config_port;
pub mod news_port;
pub mod quote_port;
pub mod rate_port;
