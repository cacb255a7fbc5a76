use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use fluxpaint::config::{
    RenderConfig, DEFAULT_HEIGHT, DEFAULT_ITERATIONS, DEFAULT_K, DEFAULT_OUTPUT, DEFAULT_SEEDS,
    DEFAULT_WIDTH,
};
use fluxpaint::d2::Schedule;

pub const USAGE: &str = "\
usage: pretty [-w width] [-h height] [-r iterations] [-n seeds] [-x x1 y1 ... xn yn]
              [-k coefficient] [-m min-mean | -c colour-file] [-s min-sd]
              [-o output.bmp] [-p preview.png] [-j] [--seed n] [-v]";

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub width: usize,
    pub height: usize,
    pub iterations: u64,
    pub seeds: usize,
    pub coords: Option<Vec<(usize, usize)>>,
    pub k: f64,
    pub min_mean: Option<f64>,
    pub min_sd: Option<f64>,
    pub colour_file: Option<PathBuf>,
    pub output: PathBuf,
    pub preview: Option<PathBuf>,
    pub parallel: bool,
    pub rng_seed: Option<u64>,
    pub verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            iterations: DEFAULT_ITERATIONS,
            seeds: DEFAULT_SEEDS,
            coords: None,
            k: DEFAULT_K,
            min_mean: None,
            min_sd: None,
            colour_file: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            preview: None,
            parallel: false,
            rng_seed: None,
            verbose: false,
        }
    }
}

fn value<I>(args: &mut I, flag: &str, what: &str) -> anyhow::Result<String>
where
    I: Iterator<Item = String>,
{
    match args.next() {
        Some(v) => Ok(v),
        None => bail!("{} flag \"{}\" provided without subsequent argument", what, flag),
    }
}

fn number<T, I>(args: &mut I, flag: &str, what: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    I: Iterator<Item = String>,
{
    let raw = value(args, flag, what)?;
    raw.parse()
        .with_context(|| format!("could not convert {} \"{}\" to a number", what, raw))
}

impl Args {
    /// Parse flags in order; `-x` consumes as many pairs as the seed count
    /// set so far.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut out = Args::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "-w" => out.width = number(&mut args, "-w", "width")?,
                "-h" => out.height = number(&mut args, "-h", "height")?,
                "-r" => out.iterations = number(&mut args, "-r", "iterations")?,
                "-n" => {
                    out.seeds = number(&mut args, "-n", "number of seeds")?;
                    if out.seeds == 0 {
                        bail!("the number of seeds cannot be zero");
                    }
                }
                "-x" => {
                    let mut coords = Vec::with_capacity(out.seeds);
                    for _ in 0..out.seeds {
                        let (x, y) = match (args.next(), args.next()) {
                            (Some(x), Some(y)) => (x, y),
                            _ => bail!(
                                "coordinates flag \"-x\" provided without sufficient subsequent \
                                 arguments ({} pairs of coordinates expected)",
                                out.seeds
                            ),
                        };
                        let x: usize = x
                            .parse()
                            .with_context(|| format!("bad x coordinate \"{}\"", x))?;
                        let y: usize = y
                            .parse()
                            .with_context(|| format!("bad y coordinate \"{}\"", y))?;
                        coords.push((x, y));
                    }
                    out.coords = Some(coords);
                }
                "-k" => out.k = number(&mut args, "-k", "k-coefficient")?,
                "-m" => out.min_mean = Some(number(&mut args, "-m", "minimum mean colour")?),
                "-s" => {
                    out.min_sd = Some(number(&mut args, "-s", "minimum colour standard deviation")?)
                }
                "-c" => out.colour_file = Some(value(&mut args, "-c", "colour file")?.into()),
                "-o" => out.output = value(&mut args, "-o", "BMP path")?.into(),
                "-p" => out.preview = Some(value(&mut args, "-p", "preview path")?.into()),
                "-j" => out.parallel = true,
                "--seed" => out.rng_seed = Some(number(&mut args, "--seed", "random seed")?),
                "-v" => out.verbose = true,
                other => bail!("unrecognised command-line argument: \"{}\"\n{}", other, USAGE),
            }
        }

        if out.colour_file.is_some() && (out.min_mean.is_some() || out.min_sd.is_some()) {
            bail!(
                "minimum mean colour and/or standard deviation flags cannot be set if a path \
                 for colours is also given"
            );
        }

        Ok(out)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            iterations: self.iterations,
            k: self.k,
            schedule: if self.parallel {
                Schedule::ChannelParallel
            } else {
                Schedule::Sequential
            },
            ..RenderConfig::default()
        }
    }
}
