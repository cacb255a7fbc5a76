//! Run parameters and their defaults.

use crate::bmp;
use crate::d2::Schedule;
use crate::error::ConfigError;
use crate::raster::NegativePolicy;

pub const DEFAULT_WIDTH: usize = 2048;
pub const DEFAULT_HEIGHT: usize = 1024;
pub const DEFAULT_ITERATIONS: u64 = 10000;
pub const DEFAULT_K: f64 = 0.1;

/// Number of random seeds when none are given.
pub const DEFAULT_SEEDS: usize = 10;
/// Minimum mean of a random seed color's channels, on the 0..=255 scale.
pub const DEFAULT_MIN_MEAN: f64 = 128.0;
/// Minimum standard deviation of a random seed color's channels, on the 0..=255 scale.
pub const DEFAULT_MIN_SD: f64 = 70.0;
pub const DEFAULT_OUTPUT: &str = "pretty.bmp";

/// Everything the engine and rasterizer need besides the seeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub iterations: u64,
    /// Diffusion coefficient, `0 <= k <= 1`.
    pub k: f64,
    pub schedule: Schedule,
    pub negative: NegativePolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            iterations: DEFAULT_ITERATIONS,
            k: DEFAULT_K,
            schedule: Schedule::default(),
            negative: NegativePolicy::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize {
                width: self.width,
                height: self.height,
            });
        }

        if bmp::checked_size(self.width, self.height).is_err() {
            return Err(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
            });
        }

        if !(0.0..=1.0).contains(&self.k) {
            return Err(ConfigError::CoefficientOutOfRange(self.k));
        }

        Ok(())
    }
}
