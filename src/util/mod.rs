//! Utility functions.

pub mod env;
pub mod format;
pub mod time;

pub use format::{format_cost, format_cost_precise, format_rate, format_tokens};
pub use time::{DateRange, today_utc};
