//! Conversion of simulated colors to 8-bit output colors.

use ndarray::Array2;
use thiserror::Error;

use crate::d2::{Channel, PixelGrid};

/// An 8-bit output color, stored in bitmap channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bgr {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Bgr {
    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    fn set(&mut self, channel: Channel, value: u8) {
        match channel {
            Channel::Blue => self.b = value,
            Channel::Green => self.g = value,
            Channel::Red => self.r = value,
        }
    }
}

/// What to do with channel values below zero or not finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativePolicy {
    /// Map negatives and NaN to 0 and positive infinity to 255.
    #[default]
    Clamp,
    /// Fail with a [`RasterError`] on any value below zero, even one that
    /// would round to 0, and on infinities and NaN.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    #[error("negative {channel:?} value {value} at ({x},{y})")]
    Negative {
        x: usize,
        y: usize,
        channel: Channel,
        value: f64,
    },

    #[error("non-finite {channel:?} value {value} at ({x},{y})")]
    NotFinite {
        x: usize,
        y: usize,
        channel: Channel,
        value: f64,
    },
}

/// Why a single channel value could not be quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    Negative,
    NotFinite,
}

/// `floor(255 * value + 0.5)`, saturating at 255.
///
/// Under [`NegativePolicy::Reject`] any value below zero is an error, even one
/// that would round to 0, and so is any infinity or NaN.
pub fn quantize_channel(value: f64, policy: NegativePolicy) -> Result<u8, Rejected> {
    if policy == NegativePolicy::Reject {
        if !value.is_finite() {
            return Err(Rejected::NotFinite);
        }
        if value < 0.0 {
            return Err(Rejected::Negative);
        }
    }

    let scaled = (255.0 * value + 0.5).floor();
    if scaled.is_nan() {
        return Ok(0);
    }

    Ok(scaled.max(0.0).min(255.0) as u8)
}

/// Quantize every cell of `grid`. The grid itself is left untouched.
pub fn quantize(grid: &PixelGrid, policy: NegativePolicy) -> Result<Array2<Bgr>, RasterError> {
    let mut out = Array2::from_elem(grid.dim(), Bgr::default());

    for channel in Channel::ALL {
        let color = grid.plane(channel).color();

        for ((x, y), &value) in color.indexed_iter() {
            let q = quantize_channel(value, policy).map_err(|why| match why {
                Rejected::Negative => RasterError::Negative {
                    x,
                    y,
                    channel,
                    value,
                },
                Rejected::NotFinite => RasterError::NotFinite {
                    x,
                    y,
                    channel,
                    value,
                },
            })?;

            out[[x, y]].set(channel, q);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::d2::SeedSet;
    use cgmath::vec3;

    #[test]
    fn test_quantize_channel_rounds_half_up() {
        let clamp = NegativePolicy::Clamp;

        assert_eq!(quantize_channel(0.0, clamp), Ok(0));
        assert_eq!(quantize_channel(1.0, clamp), Ok(255));
        assert_eq!(quantize_channel(0.5, clamp), Ok(128)); // 127.5
        assert_eq!(quantize_channel(0.49 / 255.0, clamp), Ok(0));
        assert_eq!(quantize_channel(128.0 / 255.0, clamp), Ok(128));
    }

    #[test]
    fn test_quantize_channel_saturates() {
        let clamp = NegativePolicy::Clamp;

        assert_eq!(quantize_channel(1.7, clamp), Ok(255));
        assert_eq!(quantize_channel(f64::INFINITY, clamp), Ok(255));
        assert_eq!(quantize_channel(-0.3, clamp), Ok(0));
        assert_eq!(quantize_channel(f64::NEG_INFINITY, clamp), Ok(0));
        assert_eq!(quantize_channel(f64::NAN, clamp), Ok(0));
    }

    #[test]
    fn test_quantize_channel_reject() {
        let reject = NegativePolicy::Reject;

        assert_eq!(quantize_channel(0.25, reject), Ok(64));
        assert_eq!(quantize_channel(-0.001, reject), Err(Rejected::Negative));
        assert_eq!(quantize_channel(f64::NAN, reject), Err(Rejected::NotFinite));
        assert_eq!(quantize_channel(f64::INFINITY, reject), Err(Rejected::NotFinite));
        assert_eq!(quantize_channel(f64::NEG_INFINITY, reject), Err(Rejected::NotFinite));
        assert_eq!(quantize_channel(3.0, reject), Ok(255));
    }

    #[test]
    fn test_quantize_grid() {
        let mut grid = PixelGrid::allocate(3, 2).unwrap();
        let seeds = SeedSet::new(
            vec![(0, 0), (2, 1)],
            vec![vec3(1.0, 0.5, 0.0), vec3(0.2, 0.4, 0.6)],
            3,
            2,
        )
        .unwrap();
        grid.inject(&seeds);
        let before = grid.clone();

        let out = quantize(&grid, NegativePolicy::Clamp).unwrap();

        assert_eq!(out.dim(), (3, 2));
        assert_eq!(out[[0, 0]], Bgr::new(255, 128, 0));
        assert_eq!(out[[2, 1]], Bgr::new(51, 102, 153));
        assert_eq!(out[[1, 0]], Bgr::default());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_quantize_grid_reject_names_cell() {
        let mut grid = PixelGrid::allocate(2, 2).unwrap();
        let seeds = SeedSet::new(vec![(1, 0)], vec![vec3(0.0, 0.0, -0.5)], 2, 2).unwrap();
        grid.inject(&seeds);

        assert_eq!(
            quantize(&grid, NegativePolicy::Reject),
            Err(RasterError::Negative {
                x: 1,
                y: 0,
                channel: Channel::Red,
                value: -0.5
            })
        );
        assert_eq!(
            quantize(&grid, NegativePolicy::Clamp).unwrap()[[1, 0]],
            Bgr::default()
        );
    }
}
