//! Uncompressed 24-bit bitmap export and import.
//!
//! Grid row `y = 0` is stored as the first scanline of the pixel data, which
//! bitmap viewers show at the bottom of the image.
//!
//! # Example
//!
//! ```no_run
//! use fluxpaint::bmp::{save_bmp, Bitmap};
//! use fluxpaint::raster::Bgr;
//! use ndarray::Array2;
//!
//! let pixels = Array2::from_elem((4, 2), Bgr::new(255, 0, 0));
//! save_bmp(&pixels, "blue.bmp").unwrap();
//!
//! let bitmap = Bitmap::load("blue.bmp").unwrap();
//! assert_eq!(bitmap.pixels, pixels);
//! ```

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use ndarray::Array2;

use crate::raster::Bgr;

/// Bytes before the pixel data: 14 byte file header + 40 byte info header.
pub const PIXEL_OFFSET: u32 = 54;

const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 24;

/// Error type for bitmap operations.
#[derive(Debug, thiserror::Error)]
pub enum BmpError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Not a bitmap, or a truncated one.
    #[error("Invalid BMP format: {0}")]
    InvalidFormat(String),
    /// A valid bitmap this module does not decode.
    #[error("Unsupported BMP: {0}")]
    Unsupported(String),
    /// Dimensions do not fit the 32-bit header fields.
    #[error("{width}x{height} image is too large for a BMP file")]
    TooLarge { width: usize, height: usize },
}

/// Result type for bitmap operations.
pub type BmpResult<T> = Result<T, BmpError>;

/// Bytes per scanline, including zero padding to a multiple of 4.
pub fn row_stride(width: usize) -> usize {
    (width * 3 + 3) & !3
}

/// Total size in bytes of the file written for a `width x height` image.
pub fn file_size(width: usize, height: usize) -> usize {
    PIXEL_OFFSET as usize + height * row_stride(width)
}

pub(crate) fn checked_size(width: usize, height: usize) -> BmpResult<(u32, u32, u32)> {
    let too_large = || BmpError::TooLarge { width, height };

    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;
    let size = width
        .checked_mul(3)
        .and_then(|n| n.checked_add(3))
        .map(|n| n & !3)
        .and_then(|stride| stride.checked_mul(height))
        .and_then(|n| n.checked_add(PIXEL_OFFSET as usize))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(too_large)?;

    Ok((w, h, size))
}

/// Writes `pixels` (shape `(width, height)`) as a bitmap.
pub fn write_bmp<W: Write>(pixels: &Array2<Bgr>, writer: &mut W) -> BmpResult<()> {
    let (width, height) = pixels.dim();
    let (w, h, size) = checked_size(width, height)?;

    // File header
    writer.write_all(b"BM")?;
    writer.write_all(&size.to_le_bytes())?;
    writer.write_all(&[0; 4])?;
    writer.write_all(&PIXEL_OFFSET.to_le_bytes())?;

    // Info header; image size and resolution are left at zero.
    writer.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&w.to_le_bytes())?;
    writer.write_all(&h.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?;
    writer.write_all(&BITS_PER_PIXEL.to_le_bytes())?;
    writer.write_all(&[0; 24])?;

    let stride = row_stride(width);
    let mut row = vec![0u8; stride];
    for y in 0..height {
        for x in 0..width {
            let Bgr { b, g, r } = pixels[[x, y]];
            row[x * 3..x * 3 + 3].copy_from_slice(&[b, g, r]);
        }
        writer.write_all(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the bitmap to a byte vector.
pub fn to_bytes(pixels: &Array2<Bgr>) -> BmpResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(file_size(pixels.dim().0, pixels.dim().1));
    write_bmp(pixels, &mut buffer)?;
    Ok(buffer)
}

/// Saves the bitmap to `path`.
///
/// If writing fails after the file was created, the partial file is removed.
pub fn save_bmp<P: AsRef<Path>>(pixels: &Array2<Bgr>, path: P) -> BmpResult<()> {
    let path = path.as_ref();
    let bytes = to_bytes(pixels)?;

    if let Err(e) = fs::write(path, &bytes) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote bitmap");

    Ok(())
}

/// A decoded 24-bit bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Shape `(width, height)`, indexed `[[x, y]]` with `y = 0` the first scanline.
    pub pixels: Array2<Bgr>,
}

impl Bitmap {
    pub fn width(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().1
    }

    /// Loads a bitmap from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> BmpResult<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }

    /// Reads an uncompressed bottom-up 24-bit bitmap.
    pub fn read<R: Read>(reader: &mut R) -> BmpResult<Self> {
        let mut header = [0u8; PIXEL_OFFSET as usize];
        reader
            .read_exact(&mut header)
            .map_err(|_| BmpError::InvalidFormat("truncated header".to_string()))?;

        if &header[0..2] != b"BM" {
            return Err(BmpError::InvalidFormat("not a BMP file".to_string()));
        }

        let u32_at = |i: usize| {
            u32::from_le_bytes([header[i], header[i + 1], header[i + 2], header[i + 3]])
        };
        let u16_at = |i: usize| u16::from_le_bytes([header[i], header[i + 1]]);

        let offset = u32_at(10);
        let info_size = u32_at(14);
        // Negative height would mean top-down rows.
        let width = u32_at(18) as i32;
        let height = u32_at(22) as i32;
        let bpp = u16_at(28);
        let compression = u32_at(30);

        if info_size < INFO_HEADER_SIZE {
            return Err(BmpError::Unsupported(format!(
                "info header of {} bytes",
                info_size
            )));
        }
        if bpp != BITS_PER_PIXEL || compression != 0 {
            return Err(BmpError::Unsupported(format!(
                "bits per pixel {}, compression {}",
                bpp, compression
            )));
        }
        if width <= 0 || height <= 0 {
            return Err(BmpError::Unsupported(format!(
                "dimensions {}x{}",
                width, height
            )));
        }
        if offset < PIXEL_OFFSET {
            return Err(BmpError::InvalidFormat(format!("pixel offset {}", offset)));
        }

        // Skip anything between the headers and the pixel data.
        io::copy(
            &mut reader.by_ref().take((offset - PIXEL_OFFSET) as u64),
            &mut io::sink(),
        )?;

        let (width, height) = (width as usize, height as usize);
        checked_size(width, height)?;
        let stride = row_stride(width);

        // Storage grows with the data actually read, not with the header's claims.
        let mut colors = Vec::new();
        let mut row = Vec::new();
        for y in 0..height {
            row.clear();
            reader.by_ref().take(stride as u64).read_to_end(&mut row)?;
            if row.len() < stride {
                return Err(BmpError::InvalidFormat(format!(
                    "truncated pixel data at row {}",
                    y
                )));
            }

            colors.extend(
                row.chunks_exact(3)
                    .take(width)
                    .map(|px| Bgr::new(px[0], px[1], px[2])),
            );
        }

        let pixels = Array2::from_shape_fn((width, height), |(x, y)| colors[y * width + x]);

        Ok(Self { pixels })
    }
}

/// Parses a bitmap from raw bytes.
pub fn from_bytes(data: &[u8]) -> BmpResult<Bitmap> {
    let mut cursor = io::Cursor::new(data);
    Bitmap::read(&mut cursor)
}
