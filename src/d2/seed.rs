use cgmath::Vector3;

use crate::error::ConfigError;

/// A fixed source cell whose color is re-asserted every iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub x: usize,
    pub y: usize,
    /// `(blue, green, red)`, nominally in `[0, 1]`.
    pub color: Vector3<f64>,
}

/// Seeds checked against the size of the grid they will be injected into.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeedSet {
    seeds: Vec<Seed>,
}

impl SeedSet {
    /// Pair `coords` with `colors` one to one.
    ///
    /// Fails if the lists differ in length or a coordinate falls outside
    /// `[0, width) x [0, height)`.
    pub fn new(
        coords: Vec<(usize, usize)>,
        colors: Vec<Vector3<f64>>,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        if coords.len() != colors.len() {
            return Err(ConfigError::SeedCountMismatch {
                coordinates: coords.len(),
                colors: colors.len(),
            });
        }

        let seeds = coords
            .into_iter()
            .zip(colors)
            .map(|((x, y), color)| Seed { x, y, color })
            .collect();

        Self::from_seeds(seeds, width, height)
    }

    pub fn from_seeds(seeds: Vec<Seed>, width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroSize { width, height });
        }

        if let Some((index, seed)) = seeds
            .iter()
            .enumerate()
            .find(|(_, s)| s.x >= width || s.y >= height)
        {
            return Err(ConfigError::SeedOutOfBounds {
                index,
                x: seed.x,
                y: seed.y,
                width,
                height,
            });
        }

        Ok(Self { seeds })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Seed> {
        self.seeds.iter()
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Same seeds with each color replaced by `f(color)`.
    pub fn map_colors(&self, f: impl Fn(Vector3<f64>) -> Vector3<f64>) -> Self {
        Self {
            seeds: self
                .seeds
                .iter()
                .map(|s| Seed {
                    color: f(s.color),
                    ..*s
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SeedSet {
    type Item = &'a Seed;
    type IntoIter = std::slice::Iter<'a, Seed>;

    fn into_iter(self) -> Self::IntoIter {
        self.seeds.iter()
    }
}
