//! Lagged flux diffusion.
//!
//! Every cell remembers, per channel, the color difference to its left and
//! upper neighbor as it was last observed. A pass over a channel walks the
//! grid row by row; each cell hands fresh differences to its right and
//! lower neighbor and then moves its own color by
//!
//! ```text
//! k * (right - c) + k * (below - c) - k * flux_left - k * flux_up
//! ```
//!
//! with the terms for missing neighbors dropped on the last row and column.
//! Seeds are stamped back before every pass so they act as constant sources.

use ndarray::Array2;
use rayon::prelude::*;

use super::{Channel, ChannelPlane, PixelGrid, SeedSet};
use crate::error::ConfigError;

/// How the three channel passes of one iteration are scheduled.
///
/// Both produce bit-identical grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Blue, green, then red on the calling thread.
    #[default]
    Sequential,
    /// One rayon task per channel.
    ChannelParallel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxDiffusion {
    k: f64,
    schedule: Schedule,
}

impl FluxDiffusion {
    /// Create an engine with diffusion coefficient `k` in `[0, 1]`.
    pub fn new(k: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&k) {
            return Err(ConfigError::CoefficientOutOfRange(k));
        }

        Ok(Self {
            k,
            schedule: Schedule::default(),
        })
    }

    pub fn with_schedule(self, schedule: Schedule) -> Self {
        Self { schedule, ..self }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// One iteration: re-inject the seeds, then diffuse every channel once.
    pub fn step(&self, grid: &mut PixelGrid, seeds: &SeedSet) {
        grid.inject(seeds);

        let k = self.k;
        match self.schedule {
            Schedule::Sequential => {
                for channel in Channel::ALL {
                    diffuse_plane(grid.plane_mut(channel), k);
                }
            }
            Schedule::ChannelParallel => {
                grid.planes_mut()[..]
                    .par_iter_mut()
                    .for_each(|plane| diffuse_plane(plane, k));
            }
        }
    }

    /// Run `iterations` steps. Seeds are injected before the first step and
    /// once more after the last, so seed cells always end at their seed color.
    pub fn run(&self, grid: &mut PixelGrid, seeds: &SeedSet, iterations: u64) {
        self.run_with_progress(grid, seeds, iterations, |_, _| {});
    }

    /// Like [`run`](Self::run), calling `progress(done, iterations)` after
    /// each completed step.
    pub fn run_with_progress<F>(
        &self,
        grid: &mut PixelGrid,
        seeds: &SeedSet,
        iterations: u64,
        mut progress: F,
    ) where
        F: FnMut(u64, u64),
    {
        let (width, height) = grid.dim();
        tracing::info!(
            width,
            height,
            iterations,
            k = self.k,
            seeds = seeds.len(),
            schedule = ?self.schedule,
            "starting flux diffusion"
        );

        grid.inject(seeds);

        for done in 1..=iterations {
            self.step(grid, seeds);
            tracing::trace!(iteration = done, "diffusion step complete");
            progress(done, iterations);
        }

        grid.inject(seeds);

        tracing::info!(iterations, "flux diffusion finished");
    }
}

/// One row-major pass over a single channel.
///
/// A cell's `flux_left`/`flux_up` are written by its left/upper neighbor
/// earlier in the same pass, from that neighbor's pre-update color. Column 0
/// never receives `flux_left` and row 0 never receives `flux_up`.
fn diffuse_plane(plane: &mut ChannelPlane, k: f64) {
    let ChannelPlane {
        color,
        flux_left,
        flux_up,
    } = plane;
    let (w, h) = color.dim();

    for j in 0..h {
        for i in 0..w {
            let c = color[[i, j]];
            let right = outgoing(color, flux_left, c, i + 1, j, i + 1 < w);
            let below = outgoing(color, flux_up, c, i, j + 1, j + 1 < h);
            let fl = flux_left[[i, j]];
            let fu = flux_up[[i, j]];

            let drive = match (right, below) {
                (Some(r), Some(b)) => r + b - fl - fu,
                (Some(r), None) => r - fl - fu,
                (None, Some(b)) => b - fl - fu,
                (None, None) => -fl - fu,
            };

            color[[i, j]] = c + k * drive;
        }
    }
}

/// Difference from `c` to the neighbor at `(i, j)`, recorded in the
/// neighbor's flux memory. `None` when there is no such neighbor.
#[inline]
fn outgoing(
    color: &Array2<f64>,
    flux: &mut Array2<f64>,
    c: f64,
    i: usize,
    j: usize,
    exists: bool,
) -> Option<f64> {
    if !exists {
        return None;
    }

    let d = color[[i, j]] - c;
    flux[[i, j]] = d;
    Some(d)
}
