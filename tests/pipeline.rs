use std::path::PathBuf;

use cgmath::vec3;
use fluxpaint::bmp::{self, Bitmap};
use fluxpaint::config::RenderConfig;
use fluxpaint::d2::{Channel, FluxDiffusion, PixelGrid, Schedule, SeedSet};
use fluxpaint::raster::{quantize, NegativePolicy};
use fluxpaint::render::render;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fluxpaint-{}-{}.bmp", name, std::process::id()))
}

fn seeds(width: usize, height: usize) -> SeedSet {
    SeedSet::new(
        vec![(1, 1), (width - 2, height - 1), (width / 2, 0)],
        vec![
            vec3(0.9, 0.2, 0.4),
            vec3(0.1, 0.8, 0.7),
            vec3(0.5, 0.5, 1.0),
        ],
        width,
        height,
    )
    .unwrap()
}

#[test]
fn rendered_image_survives_bitmap_roundtrip() {
    let config = RenderConfig {
        width: 13,
        height: 7,
        iterations: 200,
        k: 0.15,
        ..RenderConfig::default()
    };
    let out = render(&config, &seeds(13, 7)).unwrap();

    let path = temp_path("roundtrip");
    bmp::save_bmp(&out, &path).unwrap();

    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(len as usize, bmp::file_size(13, 7));

    let loaded = Bitmap::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.pixels, out);
}

#[test]
fn render_matches_manual_pipeline() {
    let config = RenderConfig {
        width: 9,
        height: 5,
        iterations: 50,
        k: 0.2,
        schedule: Schedule::ChannelParallel,
        negative: NegativePolicy::Clamp,
    };
    let seeds = seeds(9, 5);

    let mut grid = PixelGrid::allocate(9, 5).unwrap();
    FluxDiffusion::new(0.2).unwrap().run(&mut grid, &seeds, 50);
    let manual = quantize(&grid, NegativePolicy::Clamp).unwrap();

    assert_eq!(render(&config, &seeds).unwrap(), manual);
}

#[test]
fn seed_cells_hold_their_color_after_long_runs() {
    let seeds = seeds(8, 8);
    let mut grid = PixelGrid::allocate(8, 8).unwrap();
    FluxDiffusion::new(0.25).unwrap().run(&mut grid, &seeds, 500);

    for seed in &seeds {
        assert_eq!(grid.pixel(seed.x, seed.y).color, seed.color);
    }

    // Color has spread away from the seeds.
    assert_ne!(grid.plane(Channel::Blue).color()[[4, 4]], 0.0);
}
