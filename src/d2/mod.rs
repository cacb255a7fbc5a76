use cgmath::{vec3, Vector3};
use ndarray::Array2;

use crate::error::AllocationError;

pub mod flux;
pub mod seed;

pub use flux::{FluxDiffusion, Schedule};
pub use seed::{Seed, SeedSet};

/// One of the three independent color channels, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Blue,
    Green,
    Red,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Blue, Channel::Green, Channel::Red];

    pub fn index(self) -> usize {
        match self {
            Channel::Blue => 0,
            Channel::Green => 1,
            Channel::Red => 2,
        }
    }

    /// Picks this channel's component out of a `(blue, green, red)` vector.
    pub fn of(self, v: Vector3<f64>) -> f64 {
        match self {
            Channel::Blue => v.x,
            Channel::Green => v.y,
            Channel::Red => v.z,
        }
    }
}

/// Color and flux memory of a single channel over the whole grid.
///
/// All three arrays have shape `(width, height)` and are indexed `[[x, y]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPlane {
    pub(crate) color: Array2<f64>,
    /// `color[[x, y]] - color[[x - 1, y]]` as last observed by the left neighbor.
    pub(crate) flux_left: Array2<f64>,
    /// `color[[x, y]] - color[[x, y - 1]]` as last observed by the upper neighbor.
    pub(crate) flux_up: Array2<f64>,
}

impl ChannelPlane {
    fn zeroed(width: usize, height: usize) -> Result<Self, AllocationError> {
        Ok(Self {
            color: zeroed_array(width, height)?,
            flux_left: zeroed_array(width, height)?,
            flux_up: zeroed_array(width, height)?,
        })
    }

    pub fn color(&self) -> &Array2<f64> {
        &self.color
    }

    pub fn flux_left(&self) -> &Array2<f64> {
        &self.flux_left
    }

    pub fn flux_up(&self) -> &Array2<f64> {
        &self.flux_up
    }
}

fn zeroed_array(width: usize, height: usize) -> Result<Array2<f64>, AllocationError> {
    let err = AllocationError { width, height };
    let len = width.checked_mul(height).ok_or_else(|| err.clone())?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| err.clone())?;
    buf.resize(len, 0.0);

    Array2::from_shape_vec((width, height), buf).map_err(|_| err)
}

/// Snapshot of one cell, channels packed as `(blue, green, red)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub color: Vector3<f64>,
    pub flux_left: Vector3<f64>,
    pub flux_up: Vector3<f64>,
}

/// Per-pixel simulation state for a `width x height` image.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    planes: [ChannelPlane; 3],
}

impl PixelGrid {
    /// Allocate a grid with every color and flux value set to zero.
    pub fn allocate(width: usize, height: usize) -> Result<Self, AllocationError> {
        if width == 0 || height == 0 {
            return Err(AllocationError { width, height });
        }

        let grid = Self {
            planes: [
                ChannelPlane::zeroed(width, height)?,
                ChannelPlane::zeroed(width, height)?,
                ChannelPlane::zeroed(width, height)?,
            ],
        };

        tracing::debug!(width, height, "allocated pixel grid");

        Ok(grid)
    }

    /// `(width, height)`
    pub fn dim(&self) -> (usize, usize) {
        self.planes[0].color.dim()
    }

    pub fn width(&self) -> usize {
        self.dim().0
    }

    pub fn height(&self) -> usize {
        self.dim().1
    }

    pub fn plane(&self, channel: Channel) -> &ChannelPlane {
        &self.planes[channel.index()]
    }

    pub(crate) fn plane_mut(&mut self, channel: Channel) -> &mut ChannelPlane {
        &mut self.planes[channel.index()]
    }

    pub(crate) fn planes_mut(&mut self) -> &mut [ChannelPlane; 3] {
        &mut self.planes
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        let [b, g, r] = &self.planes;
        let pick = |f: fn(&ChannelPlane) -> &Array2<f64>| {
            vec3(f(b)[[x, y]], f(g)[[x, y]], f(r)[[x, y]])
        };

        Pixel {
            color: pick(ChannelPlane::color),
            flux_left: pick(ChannelPlane::flux_left),
            flux_up: pick(ChannelPlane::flux_up),
        }
    }

    /// Overwrite the color of every seed cell with its seed color.
    ///
    /// Flux memory is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if a seed lies outside the grid. [`SeedSet`] validates its
    /// coordinates against the size it was built for.
    pub fn inject(&mut self, seeds: &SeedSet) {
        for seed in seeds.iter() {
            for channel in Channel::ALL {
                self.planes[channel.index()].color[[seed.x, seed.y]] = channel.of(seed.color);
            }
        }
    }

    /// Free the grid storage.
    pub fn release(self) {
        tracing::debug!(width = self.width(), height = self.height(), "released pixel grid");
    }
}
