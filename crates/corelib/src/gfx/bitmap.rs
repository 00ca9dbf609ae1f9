use crate::gfx::Color;
use crate::math::{UVec2, uvec2};
use std::path::Path;

const CHANNELS: usize = 4;

/// Owned RGBA8 pixel buffer (non premultiplied alpha, row-major, top-left origin)
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Creates a fully transparent bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        uvec2(self.width, self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    /// Returns the RGBA bytes at the given pixel, `None` if it's out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let px = &self.pixels[idx..idx + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrites the pixel, out of bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + CHANNELS].copy_from_slice(&rgba);
        }
    }

    /// Source-over blending of `rgba` on top of the current pixel
    pub fn blend_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let Some(idx) = self.index(x, y) else {
            return;
        };

        let src_a = rgba[3] as u32;
        match src_a {
            0 => {}
            255 => self.pixels[idx..idx + CHANNELS].copy_from_slice(&rgba),
            _ => {
                let dst = &mut self.pixels[idx..idx + CHANNELS];
                let dst_a = dst[3] as u32;
                let inv_a = 255 - src_a;
                let out_a = src_a + dst_a * inv_a / 255;
                if out_a == 0 {
                    dst.copy_from_slice(&[0, 0, 0, 0]);
                    return;
                }

                for c in 0..3 {
                    let src_c = rgba[c] as u32 * src_a;
                    let dst_c = dst[c] as u32 * dst_a * inv_a / 255;
                    dst[c] = ((src_c + dst_c) / out_a).min(255) as u8;
                }
                dst[3] = out_a.min(255) as u8;
            }
        }
    }

    /// Sets every pixel to the same color
    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba_u8();
        self.pixels
            .chunks_exact_mut(CHANNELS)
            .for_each(|px| px.copy_from_slice(&rgba));
    }

    /// Encodes the bitmap as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| "Bitmap data doesn't match its size".to_string())?;
        img.save(path)
            .map_err(|e| format!("Cannot write png '{}': {e}", path.display()))?;

        log::debug!("Bitmap {}x{} saved to '{}'", self.width, self.height, path.display());
        Ok(())
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
