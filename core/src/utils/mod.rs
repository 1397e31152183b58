//! Shared utilities
//!
//! Small helper modules consumed by the property system and the built-in
//! prototypes: timestamp handling and URL validation.

pub mod time;
pub mod url;

pub use time::{format_timestamp, now_timestamp, parse_timestamp};
pub use url::{host_of, is_valid_url, normalize_url, parse_url};
