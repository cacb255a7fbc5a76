use std::path::Path;

use fluxpaint::raster::Bgr;
use image::{Rgb, RgbImage};
use ndarray::Array2;

/// Convert an output grid to an image laid out as the bitmap shows it, `y = 0` at the bottom.
pub fn to_image(x: &Array2<Bgr>) -> RgbImage {
    let shape = x.dim();

    let mut img = RgbImage::new(shape.0 as u32, shape.1 as u32);

    for i in 0..shape.0 {
        for j in 0..shape.1 {
            let Bgr { b, g, r } = x[[i, j]];
            img.put_pixel(i as u32, (shape.1 - 1 - j) as u32, Rgb([r, g, b]));
        }
    }

    img
}

pub fn save_png<P: AsRef<Path>>(path: P, x: &Array2<Bgr>) -> anyhow::Result<()> {
    to_image(x).save(path)?;

    Ok(())
}

pub fn save_frame(prefix: &str, index: usize, x: &Array2<Bgr>) -> anyhow::Result<()> {
    save_png(format!("out/{}_{:06}.png", prefix, index), x)
}
