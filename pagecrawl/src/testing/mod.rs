//! Testing utilities for crawl pipelines.
//!
//! This module provides:
//! - A scripted [`StubFetcher`] and a virtual-clock [`RecordingSleeper`]
//! - HTML fixtures
//! - Assertions for outcomes and chunk invariants

mod assertions;
pub mod fixtures;
mod mocks;

pub use assertions::{assert_chunk_invariants, assert_outcome_failed, assert_outcome_succeeded};
pub use mocks::{RecordingSleeper, StubCall, StubEvent, StubFetcher};
