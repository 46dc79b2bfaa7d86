use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::error::TrailError;
use crate::geometry::PixelRect;

// ── PixelBuffer ─────────────────────────────────────────────────────────────

/// Owned RGBA grid, row-major, `x + y * width`.
///
/// Row 0 is the **bottom** of the image, so "up" means increasing `y`.
/// PNG import/export flips rows to and from the top-down file layout.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::CLEAR)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap an existing pixel vector. Fails when its length is not
    /// `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, TrailError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(TrailError::BufferSize { width, height, expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
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
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.contains(x, y).then(|| self.pixels[self.index(x as u32, y as u32)])
    }

    /// Write a pixel. Out-of-range coordinates are ignored; returns whether
    /// the write landed.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx] = color;
        true
    }

    /// Number of pixels with any opacity at all.
    pub fn count_visible(&self) -> usize {
        self.pixels.iter().filter(|c| c.alpha() > 0.0).count()
    }

    /// Copy `src_rect` of `src` into `self` with its bottom-left corner at
    /// `(dst_x, dst_y)`.
    ///
    /// Both rectangles must fit; violations are reported rather than clipped.
    pub fn blit(
        &mut self,
        src: &PixelBuffer,
        src_rect: PixelRect,
        dst_x: u32,
        dst_y: u32,
    ) -> Result<(), TrailError> {
        if !src_rect.fits_within(src.width, src.height) {
            return Err(TrailError::RectOutOfBounds {
                rect: src_rect,
                bounds_w: src.width,
                bounds_h: src.height,
            });
        }
        let dst_rect = PixelRect::new(dst_x, dst_y, src_rect.width, src_rect.height);
        if !dst_rect.fits_within(self.width, self.height) {
            return Err(TrailError::RectOutOfBounds {
                rect: dst_rect,
                bounds_w: self.width,
                bounds_h: self.height,
            });
        }

        let row_len = src_rect.width as usize;
        for dy in 0..src_rect.height {
            let s = src.index(src_rect.x, src_rect.y + dy);
            let d = self.index(dst_x, dst_y + dy);
            self.pixels[d..d + row_len].copy_from_slice(&src.pixels[s..s + row_len]);
        }
        Ok(())
    }

    // ── image interop ───────────────────────────────────────────────────────

    /// Convert from a top-down `RgbaImage`.
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut buf = Self::new(width, height);
        for (x, y, px) in img.enumerate_pixels() {
            let idx = buf.index(x, height - 1 - y);
            buf.pixels[idx] = Color::from_rgba8(px.0);
        }
        buf
    }

    /// Convert to a top-down `RgbaImage`, quantising to 8 bits.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(self.pixels[self.index(x, self.height - 1 - y)].to_rgba8())
        })
    }

    pub fn load_png(path: impl AsRef<Path>) -> Result<Self, TrailError> {
        let img = image::open(path.as_ref())?.to_rgba8();
        Ok(Self::from_rgba_image(&img))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), TrailError> {
        self.to_rgba_image().save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
