//! Game configuration shared by the core and the terminal host.

use std::time::Duration;
use thiserror::Error;

/// Default gravity interval.
pub const DEFAULT_TICK_MS: u64 = 1000;
/// Flat bonus per cleared row.
pub const DEFAULT_POINTS_PER_LINE: u32 = 100;
/// Lines per level.
pub const LINES_PER_LEVEL: u32 = 10;
/// Fastest gravity when `speed_up` is on.
const MIN_TICK_MS: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick interval must be at least 1 ms")]
    ZeroTick,
    #[error("points per line must be positive")]
    ZeroPoints,
}

/// Options that affect game behaviour (gravity, scoring, randomness).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub tick_interval: Duration,
    pub points_per_line: u32,
    /// Gravity speeds up with level instead of staying fixed.
    pub speed_up: bool,
    /// Bag seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            points_per_line: DEFAULT_POINTS_PER_LINE,
            speed_up: false,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        if self.points_per_line == 0 {
            return Err(ConfigError::ZeroPoints);
        }
        Ok(())
    }

    /// Gravity interval at `level` (1-based). Fixed unless `speed_up`, then 10% faster per level.
    pub fn tick_interval_for(&self, level: u32) -> Duration {
        if !self.speed_up {
            return self.tick_interval;
        }
        let rate = 1.0 + f64::from(level.saturating_sub(1)) * 0.1;
        let ms = (self.tick_interval.as_millis() as f64 / rate) as u64;
        Duration::from_millis(ms.max(MIN_TICK_MS.min(self.tick_interval.as_millis() as u64)))
    }
}

/// Level for a running total of cleared lines.
pub fn level_for_lines(lines: u32) -> u32 {
    1 + lines / LINES_PER_LEVEL
}
