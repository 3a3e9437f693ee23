//! Error types for building reveal sequences.

use thiserror::Error;

use crate::types::ContainerId;

/// Result type for reveal operations.
pub type Result<T> = std::result::Result<T, RevealError>;

/// Configuration errors caught when a sequence or host is constructed.
///
/// Nothing at runtime produces these: once a sequencer exists, a skipped or
/// truncated animation is a visual omission, not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealError {
    /// Counter target is negative, NaN or infinite.
    #[error("item {index} ({label}): counter target {value} must be finite and non-negative")]
    InvalidTarget {
        index: usize,
        label: String,
        value: f64,
    },

    /// Counter would run over zero milliseconds.
    #[error("item {index} ({label}): counter duration must be positive")]
    ZeroDuration { index: usize, label: String },

    /// Counter would advance in zero steps.
    #[error("item {index} ({label}): counter needs at least one step")]
    ZeroSteps { index: usize, label: String },

    /// More steps than the clock can resolve within the duration.
    #[error("item {index} ({label}): {steps} steps do not fit in {duration_ms}ms")]
    StepsExceedDuration {
        index: usize,
        label: String,
        steps: u32,
        duration_ms: u64,
    },

    /// Visibility threshold outside [0, 1].
    #[error("visibility threshold {0} must be within [0, 1]")]
    InvalidThreshold(f64),

    /// Host operation on a container that is not mounted.
    #[error("container {0} is not mounted")]
    UnknownContainer(ContainerId),
}
