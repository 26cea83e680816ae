//! Shared utilities for the ballot client.

pub mod display;
pub mod logging;

pub use display::{format_votes, short_address};
pub use logging::{init_logging, LogFormat};
