use crate::types::Month;
use thiserror::Error;

/// Configuration rejected before any simulation runs.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scenario {label}: fdv must be > 0, got {value}")]
    NonPositiveFdv { label: String, value: f64 },
    #[error("scenario {label}: monthly revenue must be finite and >= 0, got {value}")]
    NonPositiveRevenue { label: String, value: f64 },
    #[error("category {category}: total tokens must be finite and >= 0, got {value}")]
    NegativeTotal { category: String, value: f64 },
    #[error("category {category}: release_months must be > 0")]
    ZeroReleaseMonths { category: String },
    #[error("category {category}: sigmoid steepness must be finite and > 0, got {value}")]
    InvalidSteepness { category: String, value: f64 },
    #[error("category {category}: segments {first:?} and {second:?} overlap")]
    OverlappingSegments {
        category: String,
        first: (Month, Month),
        second: (Month, Month),
    },
    #[error("category {category}: segment ({start}, {end}) is empty or starts before month 1")]
    EmptySegment {
        category: String,
        start: Month,
        end: Month,
    },
    #[error("category {category}: release window ends at month {end}, beyond horizon {horizon}")]
    WindowOutsideHorizon {
        category: String,
        end: Month,
        horizon: Month,
    },
    #[error("duplicate allocation category: {0}")]
    DuplicateCategory(String),
    #[error("duplicate scenario label: {0}")]
    DuplicateLabel(String),
    #[error("scenario grid {0} is empty")]
    EmptyGrid(&'static str),
    #[error("invalid parameter {param}: {reason}")]
    InvalidParameter { param: &'static str, reason: String },
}

/// Conservation check failures raised by [`crate::verify`].
#[derive(Debug, Error, PartialEq)]
pub enum VerifyError {
    #[error("category {category}: released {released}, expected {expected}")]
    CategoryMismatch {
        category: String,
        released: f64,
        expected: f64,
    },
    #[error("month {month}: total {total} differs from category sum {sum}")]
    TotalMismatch { month: Month, total: f64, sum: f64 },
}
