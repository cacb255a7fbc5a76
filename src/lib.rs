//! Grows a bitmap image from colored seed points.
//!
//! Seeds are stamped onto a zeroed [`d2::PixelGrid`], spread by the lagged
//! flux rule in [`d2::flux`], quantized by [`raster`] and written out as a
//! 24-bit bitmap by [`bmp`].

pub mod bmp;
pub mod config;
pub mod d2;
pub mod error;
pub mod raster;
pub mod render;

pub use error::{Error, Result};
