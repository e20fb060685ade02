//! Core domain types and logic.

pub mod sip;
pub mod currency;
pub mod quote;
pub mod news;
pub mod greeting;
pub mod config_validation;
pub mod error;
