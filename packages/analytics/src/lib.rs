#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Behaviour incident analytics engine.
//!
//! Pure, synchronous computations over in-memory incident records: frequency
//! tables per dimension, volume trend classification, threshold-driven
//! insight synthesis, and the post-fall review annotation pass. Nothing here
//! performs I/O or holds long-lived state; callers supply a consistent
//! snapshot of records and get fresh result structures back.
//!
//! Dirty upstream data never raises — malformed fields degrade to sentinels
//! or are skipped per dimension. [`AnalyticsError`] is reserved for caller
//! bugs.

pub mod aggregate;
pub mod annotate;
pub mod insights;
pub mod noise;
pub mod report;
pub mod trend;

use carewatch_analytics_models::Dimension;
use thiserror::Error;

/// Errors that indicate a caller bug rather than dirty data.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A scalar-only dimension was requested as a frequency table.
    #[error("dimension '{dimension}' produces a scalar count, not a frequency table")]
    ScalarDimension {
        /// The offending dimension.
        dimension: Dimension,
    },
}
