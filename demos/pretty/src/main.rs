use std::io::{self, Write};
use std::time::Instant;

use anyhow::Context;
use fluxpaint::bmp::{self, save_bmp};
use fluxpaint::config::{RenderConfig, DEFAULT_MIN_MEAN, DEFAULT_MIN_SD};
use fluxpaint::d2::{FluxDiffusion, PixelGrid, SeedSet};
use fluxpaint::raster::{quantize, quantize_channel, Bgr, NegativePolicy};
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

mod args;
mod elapsed;
mod palette;

use args::Args;
use elapsed::Elapsed;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report<W: Write>(out: &mut W, args: &Args, seeds: &SeedSet) -> io::Result<()> {
    writeln!(out, "BMP width: {} pixels", args.width)?;
    writeln!(out, "BMP height: {} pixels", args.height)?;
    writeln!(out, "Number of iterations: {}", args.iterations)?;
    writeln!(out, "Number of seeds: {}", seeds.len())?;
    writeln!(out, "k-value: {:.6}", args.k)?;
    writeln!(out, "Output path: {}", args.output.display())?;
    writeln!(
        out,
        "Output file size: {} bytes",
        bmp::file_size(args.width, args.height)
    )?;
    writeln!(out, "\nCoordinates and colours of seeds:")?;

    let byte = |v: f64| quantize_channel(v, NegativePolicy::Clamp).unwrap_or(0);
    for (i, seed) in seeds.iter().enumerate() {
        writeln!(
            out,
            "{}. ({},{}), {{b:{},g:{},r:{}}}",
            i + 1,
            seed.x,
            seed.y,
            byte(seed.color.x),
            byte(seed.color.y),
            byte(seed.color.z)
        )?;
    }

    Ok(())
}

/// Grow and quantize the image, narrating each stage to `log` when verbose.
/// `config` must already be validated.
fn paint<W: Write>(
    config: &RenderConfig,
    seeds: &SeedSet,
    verbose: bool,
    log: &mut W,
) -> anyhow::Result<Array2<Bgr>> {
    let engine = FluxDiffusion::new(config.k)?.with_schedule(config.schedule);

    if verbose {
        writeln!(log, "\nAllocating floating point pixel array...")?;
    }
    let mut grid = PixelGrid::allocate(config.width, config.height)?;

    if verbose {
        writeln!(log, "Starting main colour-spreading loop...")?;
    }
    engine.run_with_progress(&mut grid, seeds, config.iterations, |done, total| {
        if verbose {
            let _ = write!(log, "Completed: {}/{} iterations\r", done, total);
            let _ = log.flush();
        }
    });

    if verbose {
        writeln!(
            log,
            "\nCopying floating point colours array to final BGR .bmp array..."
        )?;
    }
    let out = quantize(&grid, config.negative)?;
    grid.release();

    Ok(out)
}

fn run() -> anyhow::Result<()> {
    let start = Instant::now();
    let args = Args::parse(std::env::args().skip(1))?;
    init_tracing(args.verbose);

    let config = args.render_config();
    config.validate()?;

    let mut rng = match args.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let coords = match &args.coords {
        Some(coords) => coords.clone(),
        None => palette::random_coords(&mut rng, args.seeds, args.width, args.height),
    };
    let colours = match &args.colour_file {
        Some(path) => palette::load_colours(path, args.seeds)?,
        None => palette::random_colors(
            &mut rng,
            args.seeds,
            args.min_mean.unwrap_or(DEFAULT_MIN_MEAN),
            args.min_sd.unwrap_or(DEFAULT_MIN_SD),
        )?,
    };
    let seeds = SeedSet::new(coords, colours, args.width, args.height)?;
    tracing::debug!(seeds = seeds.len(), rng_seed = ?args.rng_seed, "seeds ready");

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    if args.verbose {
        report(&mut stdout, &args, &seeds)?;
    }

    let out = paint(&config, &seeds, args.verbose, &mut stdout)?;

    if args.verbose {
        writeln!(stdout, "Writing BMP...")?;
    }
    save_bmp(&out, &args.output)
        .with_context(|| format!("file \"{}\" could not be written", args.output.display()))?;

    if let Some(preview) = &args.preview {
        image_util::save_png(preview, &out)
            .with_context(|| format!("preview \"{}\" could not be written", preview.display()))?;
    }

    if args.verbose {
        writeln!(stdout, "Done!")?;
        writeln!(
            stdout,
            "--------------------\nTime elapsed:\n{}",
            Elapsed::from(start.elapsed())
        )?;
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cgmath::vec3;

    fn small() -> (Args, SeedSet) {
        let args = Args {
            width: 4,
            height: 3,
            iterations: 2,
            seeds: 1,
            ..Args::default()
        };
        let seeds = SeedSet::new(vec![(1, 2)], vec![vec3(1.0, 0.5, 0.0)], 4, 3).unwrap();
        (args, seeds)
    }

    #[test]
    fn test_report() {
        let (args, seeds) = small();
        let mut out = Vec::new();
        report(&mut out, &args, &seeds).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("k-value: 0.100000\n"));
        assert!(text.contains("Output file size: 90 bytes\n"));
        assert!(text.ends_with("1. (1,2), {b:255,g:128,r:0}\n"));
    }

    #[test]
    fn test_paint_narrates_stages_in_order() {
        let (args, seeds) = small();
        let config = args.render_config();
        let mut log = Vec::new();
        let out = paint(&config, &seeds, true, &mut log).unwrap();
        let text = String::from_utf8(log).unwrap();

        let stages = [
            "Allocating floating point pixel array...",
            "Starting main colour-spreading loop...",
            "Completed: 2/2 iterations\r",
            "Copying floating point colours array to final BGR .bmp array...",
        ];
        let positions: Vec<usize> = stages.iter().map(|s| text.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(out, fluxpaint::render::render(&config, &seeds).unwrap());
    }

    #[test]
    fn test_paint_quiet() {
        let (args, seeds) = small();
        let mut log = Vec::new();
        paint(&args.render_config(), &seeds, false, &mut log).unwrap();

        assert!(log.is_empty());
    }
}
