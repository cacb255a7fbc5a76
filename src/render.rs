//! Seeds in, 8-bit image out.

use ndarray::Array2;

use crate::config::RenderConfig;
use crate::d2::{FluxDiffusion, PixelGrid, SeedSet};
use crate::error::{ConfigError, Result};
use crate::raster::{quantize, Bgr};

/// Validate `config`, grow the image from `seeds` and quantize it.
pub fn render(config: &RenderConfig, seeds: &SeedSet) -> Result<Array2<Bgr>> {
    render_with_progress(config, seeds, |_, _| {})
}

/// Like [`render`], calling `progress(done, total)` after every iteration.
pub fn render_with_progress<F>(
    config: &RenderConfig,
    seeds: &SeedSet,
    progress: F,
) -> Result<Array2<Bgr>>
where
    F: FnMut(u64, u64),
{
    config.validate()?;

    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, s)| s.x >= config.width || s.y >= config.height)
    {
        return Err(ConfigError::SeedOutOfBounds {
            index,
            x: seed.x,
            y: seed.y,
            width: config.width,
            height: config.height,
        }
        .into());
    }

    let engine = FluxDiffusion::new(config.k)?.with_schedule(config.schedule);
    let mut grid = PixelGrid::allocate(config.width, config.height)?;

    engine.run_with_progress(&mut grid, seeds, config.iterations, progress);

    let out = quantize(&grid, config.negative)?;
    grid.release();

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use cgmath::vec3;

    fn small() -> RenderConfig {
        RenderConfig {
            width: 6,
            height: 4,
            iterations: 20,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_render_keeps_seed_colors() {
        let seeds = SeedSet::new(vec![(2, 1)], vec![vec3(1.0, 0.0, 0.5)], 6, 4).unwrap();
        let out = render(&small(), &seeds).unwrap();

        assert_eq!(out.dim(), (6, 4));
        assert_eq!(out[[2, 1]], Bgr::new(255, 0, 128));
    }

    #[test]
    fn test_render_zero_iterations() {
        let seeds = SeedSet::new(vec![(0, 3)], vec![vec3(0.2, 0.4, 0.6)], 6, 4).unwrap();
        let config = RenderConfig {
            iterations: 0,
            ..small()
        };
        let out = render(&config, &seeds).unwrap();

        for ((x, y), &px) in out.indexed_iter() {
            if (x, y) == (0, 3) {
                assert_eq!(px, Bgr::new(51, 102, 153));
            } else {
                assert_eq!(px, Bgr::default());
            }
        }
    }

    #[test]
    fn test_render_rejects_seeds_for_larger_grid() {
        let seeds = SeedSet::new(vec![(7, 0)], vec![vec3(1.0, 1.0, 1.0)], 8, 8).unwrap();

        assert!(matches!(
            render(&small(), &seeds),
            Err(Error::Config(ConfigError::SeedOutOfBounds { index: 0, .. }))
        ));
    }

    #[test]
    fn test_render_rejects_bad_k() {
        let config = RenderConfig {
            k: -1.0,
            ..small()
        };

        assert!(matches!(
            render(&config, &SeedSet::default()),
            Err(Error::Config(ConfigError::CoefficientOutOfRange(_)))
        ));
    }

    #[test]
    fn test_render_progress() {
        let mut last = None;
        render_with_progress(&small(), &SeedSet::default(), |done, total| {
            last = Some((done, total))
        })
        .unwrap();

        assert_eq!(last, Some((20, 20)));
    }
}
