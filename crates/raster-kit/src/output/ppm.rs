//! Binary PPM (`P6`) writer.
//!
//! The header carries width, height and a fixed maxval of 255, followed by
//! packed 8-bit RGB triples. Alpha is dropped; JPEG has no alpha channel.

use std::io::{self, Write};

use crate::raster::{Raster, CHANNELS};

/// Largest sample value; every channel is one byte.
pub const PPM_MAXVAL: u16 = 255;

/// Header for a `width` x `height` binary PPM.
pub fn ppm_header(width: u32, height: u32) -> String {
    format!("P6\n{} {}\n{}\n", width, height, PPM_MAXVAL)
}

/// Write `raster` as a binary PPM, one row at a time.
///
/// Returns the number of bytes written.
///
/// # Example
///
/// ```
/// use raster_kit::{write_ppm, Raster};
///
/// let raster = Raster::filled(2, 1, [1, 2, 3, 4]).unwrap();
/// let mut buf = Vec::new();
/// write_ppm(&raster, &mut buf).unwrap();
/// assert_eq!(buf, b"P6\n2 1\n255\n\x01\x02\x03\x01\x02\x03");
/// ```
pub fn write_ppm<W: Write>(raster: &Raster, mut out: W) -> io::Result<u64> {
    let header = ppm_header(raster.width(), raster.height());
    out.write_all(header.as_bytes())?;

    let mut rgb = Vec::with_capacity(raster.width() as usize * 3);
    for y in 0..raster.height() {
        rgb.clear();
        for px in raster.row(y).chunks_exact(CHANNELS) {
            rgb.extend_from_slice(&px[..3]);
        }
        out.write_all(&rgb)?;
    }
    out.flush()?;

    Ok(header.len() as u64 + raster.width() as u64 * raster.height() as u64 * 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_format() {
        assert_eq!(ppm_header(640, 480), "P6\n640 480\n255\n");
    }

    #[test]
    fn test_payload_drops_alpha() {
        let mut raster = Raster::new(2, 2).unwrap();
        raster.set_pixel(0, 0, [10, 11, 12, 0]);
        raster.set_pixel(1, 0, [20, 21, 22, 50]);
        raster.set_pixel(0, 1, [30, 31, 32, 100]);
        raster.set_pixel(1, 1, [40, 41, 42, 255]);

        let mut buf = Vec::new();
        let written = write_ppm(&raster, &mut buf).unwrap();

        let header_len = "P6\n2 2\n255\n".len();
        assert_eq!(written as usize, buf.len());
        assert_eq!(buf.len(), header_len + 12);
        assert_eq!(
            &buf[header_len..],
            &[10, 11, 12, 20, 21, 22, 30, 31, 32, 40, 41, 42]
        );
    }
}
