//! Error types for fluxpaint.

use thiserror::Error;

use crate::bmp::BmpError;
use crate::raster::RasterError;

/// Invalid run configuration, detected before any allocation or I/O.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("image cannot have zero size ({width}x{height})")]
    ZeroSize {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The image would not fit the 32-bit bitmap header fields.
    #[error("{width}x{height} image is too large for a BMP file")]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A seed coordinate lies outside the grid.
    #[error("seed {index} at ({x},{y}) does not fall within image bounds {width}x{height}")]
    SeedOutOfBounds {
        /// Position of the seed in the seed list.
        index: usize,
        /// Seed column.
        x: usize,
        /// Seed row.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// Coordinate and color lists have different lengths.
    #[error("{coordinates} seed coordinates but {colors} seed colors")]
    SeedCountMismatch {
        /// Number of coordinates supplied.
        coordinates: usize,
        /// Number of colors supplied.
        colors: usize,
    },

    /// Diffusion coefficient outside `[0, 1]` (or NaN).
    #[error("k-coefficient must be between 0 and 1, got {0}")]
    CoefficientOutOfRange(f64),
}

/// Storage for the pixel grid could not be reserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("memory allocation error for {width}x{height} pixel grid")]
pub struct AllocationError {
    /// Requested width.
    pub width: usize,
    /// Requested height.
    pub height: usize,
}

/// Any error produced by the library.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Grid allocation failed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Rasterization rejected a channel value.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Bitmap encoding or I/O failed.
    #[error(transparent)]
    Bmp(#[from] BmpError),
}

/// Result type for fluxpaint operations.
pub type Result<T> = std::result::Result<T, Error>;
