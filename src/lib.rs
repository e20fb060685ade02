//! finsight: personal finance dashboard, SIP projection and currency conversion.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`dashboard`] drives background
//! refreshes of the market panels.

pub mod adapters;
pub mod cli;
pub mod dashboard;
pub mod domain;
pub mod ports;
