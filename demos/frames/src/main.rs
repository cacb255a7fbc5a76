use cgmath::vec3;
use fluxpaint::d2::{FluxDiffusion, PixelGrid, SeedSet};
use fluxpaint::raster::{quantize, NegativePolicy};

fn main() {
    const N: usize = 400;
    const N_FRAME: usize = 64;
    const STEPS_PER_FRAME: u64 = 50;

    let seeds = SeedSet::new(
        vec![(N / 4, N / 4), (3 * N / 4, N / 2), (N / 2, 3 * N / 4)],
        vec![
            vec3(1.0, 0.6, 0.1),
            vec3(0.2, 1.0, 0.7),
            vec3(0.9, 0.1, 1.0),
        ],
        N,
        N,
    )
    .unwrap();

    let engine = FluxDiffusion::new(0.1).unwrap();
    let mut grid = PixelGrid::allocate(N, N).unwrap();
    grid.inject(&seeds);

    for f in 1..=N_FRAME {
        let frame = quantize(&grid, NegativePolicy::Clamp).unwrap();
        image_util::save_frame("frames", f, &frame).unwrap();

        engine.run(&mut grid, &seeds, STEPS_PER_FRAME);

        eprint!("\r {} / {}", f, N_FRAME);
    }
}
