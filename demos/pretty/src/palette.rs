//! Seed placement and seed colors.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use cgmath::{vec3, Vector3};
use rand::Rng;

/// Give up on a color constraint after this many draws.
const MAX_ATTEMPTS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanSd {
    pub mean: f64,
    /// Population standard deviation.
    pub sd: f64,
}

pub fn mean_sd(values: &[f64]) -> Option<MeanSd> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sq = values.iter().map(|v| v * v).sum::<f64>() / n;

    Some(MeanSd {
        mean,
        sd: (sq - mean * mean).max(0.0).sqrt(),
    })
}

/// `n` coordinates uniform over a `width x height` grid.
pub fn random_coords<R: Rng>(
    rng: &mut R,
    n: usize,
    width: usize,
    height: usize,
) -> Vec<(usize, usize)> {
    (0..n)
        .map(|_| (rng.gen_range(0..width), rng.gen_range(0..height)))
        .collect()
}

/// `n` colors whose channels have mean at least `min_mean` and standard
/// deviation at least `min_sd`, both given on the 0..=255 scale.
pub fn random_colors<R: Rng>(
    rng: &mut R,
    n: usize,
    min_mean: f64,
    min_sd: f64,
) -> anyhow::Result<Vec<Vector3<f64>>> {
    let (min_mean, min_sd) = (min_mean / 255.0, min_sd / 255.0);

    (0..n)
        .map(|_| {
            for _ in 0..MAX_ATTEMPTS {
                let c = [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()];
                if matches!(mean_sd(&c), Some(s) if s.mean >= min_mean && s.sd >= min_sd) {
                    return Ok(vec3(c[0], c[1], c[2]));
                }
            }

            bail!(
                "no colour with mean >= {} and standard deviation >= {} found after {} attempts",
                min_mean * 255.0,
                min_sd * 255.0,
                MAX_ATTEMPTS
            )
        })
        .collect()
}

const CHANNELS: [&str; 3] = ["blue", "green", "red"];

/// Read `n` colors written as `b g r` triples in `[0, 1]`, separated by
/// whitespace or commas.
pub fn parse_colours(text: &str, n: usize) -> anyhow::Result<Vec<Vector3<f64>>> {
    let mut values = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());

    let mut colours = Vec::with_capacity(n);
    for line in 1..=n {
        let mut c = [0.0; 3];
        for (slot, name) in c.iter_mut().zip(CHANNELS) {
            let raw = match values.next() {
                Some(raw) => raw,
                None => bail!("colour file ends before the {} channel of colour {}", name, line),
            };
            *slot = raw.parse().with_context(|| {
                format!("error converting {} channel \"{}\" of colour {}", name, raw, line)
            })?;
        }
        colours.push(vec3(c[0], c[1], c[2]));
    }

    Ok(colours)
}

pub fn load_colours<P: AsRef<Path>>(path: P, n: usize) -> anyhow::Result<Vec<Vector3<f64>>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("error opening colour file \"{}\"", path.display()))?;

    parse_colours(&text, n).with_context(|| format!("in colour file \"{}\"", path.display()))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_mean_sd() {
        let stats = mean_sd(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();

        assert_abs_diff_eq!(stats.mean, 5.0);
        assert_abs_diff_eq!(stats.sd, 2.0, epsilon = 1e-12);
        assert_eq!(mean_sd(&[]), None);
    }

    #[test]
    fn test_random_coords_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let coords = random_coords(&mut rng, 200, 7, 3);

        assert_eq!(coords.len(), 200);
        assert!(coords.iter().all(|&(x, y)| x < 7 && y < 3));
    }

    #[test]
    fn test_random_colors_meet_constraints() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let colors = random_colors(&mut rng, 25, 128.0, 70.0).unwrap();

        assert_eq!(colors.len(), 25);
        for c in colors {
            let stats = mean_sd(&[c.x, c.y, c.z]).unwrap();
            assert!(stats.mean >= 128.0 / 255.0);
            assert!(stats.sd >= 70.0 / 255.0);
        }
    }

    #[test]
    fn test_random_colors_reproducible() {
        let a = random_colors(&mut ChaCha8Rng::seed_from_u64(5), 4, 100.0, 40.0).unwrap();
        let b = random_colors(&mut ChaCha8Rng::seed_from_u64(5), 4, 100.0, 40.0).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_random_colors_impossible() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(random_colors(&mut rng, 1, 300.0, 0.0).is_err());
    }

    #[test]
    fn test_parse_colours() {
        let colours = parse_colours("0.1 0.2 0.3\n1,0,0.5\n0.9 0.8 0.7\n", 2).unwrap();

        assert_eq!(colours, vec![vec3(0.1, 0.2, 0.3), vec3(1.0, 0.0, 0.5)]);
    }

    #[test]
    fn test_parse_colours_errors() {
        assert!(parse_colours("0.1 0.2", 1).is_err());
        assert!(parse_colours("0.1 x 0.3", 1).is_err());
    }
}
