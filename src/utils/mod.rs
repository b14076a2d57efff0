//! Utility modules shared by both services
//!
//! Contains small helpers used across the catalog, cart and review code:
//! - Parse: lenient integer parsing for ids and ratings coming from clients
//! - Coerce: truthiness, numeric value and message text of loose JSON fields
//! - Timestamps: ISO-8601 and epoch-millisecond clocks for persisted records

pub mod coerce;
pub mod parse;
pub mod timestamps;

// Re-export commonly used helpers
pub use coerce::{display_string, is_truthy, to_number};
pub use parse::{parse_int, parse_int_value, is_digit_segment};
pub use timestamps::{iso_now, epoch_millis};
