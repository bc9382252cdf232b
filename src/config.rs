use crate::error::ConfigError;
use crate::simulation::grid::check_dimensions;
use crate::simulation::RuleTable;

/// Default grid dimensions (50x50 = 2500 cells)
pub const GRID_WIDTH: usize = 50;
pub const GRID_HEIGHT: usize = 50;

/// Time between automatic steps while playing
pub const TICK_INTERVAL_MS: u64 = 100;

/// Queue-length samples kept for charting
pub const QUEUE_HISTORY_LEN: usize = 256;

/// Probability that a cell starts alive when seeding at random
pub const RANDOM_FILL_DENSITY: f64 = 0.25;

/// Initial window edge length in logical pixels
pub const WINDOW_SIZE: u32 = 800;

/// Environment overrides read by [`SimConfig::from_env`]
pub const ENV_WIDTH: &str = "RIPPLE_WIDTH";
pub const ENV_HEIGHT: &str = "RIPPLE_HEIGHT";
pub const ENV_RULE: &str = "RIPPLE_RULE";

/// Session configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub rules: RuleTable,
    pub history_len: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            rules: RuleTable::conway(),
            history_len: QUEUE_HISTORY_LEN,
        }
    }
}

impl SimConfig {
    pub fn new(width: usize, height: usize, rules: RuleTable) -> Result<Self, ConfigError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            rules,
            ..Self::default()
        })
    }

    /// Defaults, overridden by `RIPPLE_WIDTH`, `RIPPLE_HEIGHT` and `RIPPLE_RULE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SimConfig::from_env`], reading settings through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let width = parse_dimension(ENV_WIDTH, lookup(ENV_WIDTH))?.unwrap_or(defaults.width);
        let height = parse_dimension(ENV_HEIGHT, lookup(ENV_HEIGHT))?.unwrap_or(defaults.height);
        let rules = match lookup(ENV_RULE) {
            Some(rule) => rule.parse()?,
            None => defaults.rules,
        };
        Self::new(width, height, rules)
    }
}

fn parse_dimension(key: &'static str, value: Option<String>) -> Result<Option<usize>, ConfigError> {
    value
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidSetting { key, value })
        })
        .transpose()
}
