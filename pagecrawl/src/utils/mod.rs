//! Utility functions for identifiers, timestamps and input validation.

pub mod ids;
pub mod timestamps;
mod validation;

pub use ids::{generate_chunk_id, generate_request_id, url_hash};
pub use timestamps::{normalize_timestamp, now_utc, parse_timestamp, Timestamp, TimestampError};
pub use validation::{validate_chunk_size, validate_url};
