use thiserror::Error;

/// Rejected configuration. Raised only while building a grid, rule table or
/// session; every operation after construction is infallible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("grid of {width}x{height} cells is too large")]
    GridTooLarge { width: usize, height: usize },

    #[error("{case} rule must have exactly 9 entries, got {len}")]
    RuleLength { case: &'static str, len: usize },

    #[error("invalid rule {0:?}, expected B<digits>/S<digits>")]
    InvalidRule(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("fill density must be within [0, 1], got {0}")]
    InvalidDensity(f64),
}
