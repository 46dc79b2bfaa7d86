// ── Sprite sources ─────────────────────────────────────────────────────────
//
// A sprite is a window into a shared texture. Packers usually trim the fully
// transparent margin away, so the pixels actually stored in the texture
// (`texture_rect`) can be smaller than the sprite's logical size (`rect`);
// `texture_rect_offset` says where the trimmed block sits inside it.

use std::path::Path;
use std::sync::Arc;

use glam::{UVec2, Vec2};

use crate::buffer::PixelBuffer;
use crate::error::TrailError;
use crate::geometry::PixelRect;

// ── Texture ─────────────────────────────────────────────────────────────────

/// Pixel storage shared by any number of sprites.
#[derive(Clone, Debug)]
pub struct Texture {
    pub name: String,
    pub pixels: PixelBuffer,
    /// Whether the pixels may be read on the CPU. GPU-only textures must be
    /// read back by the caller before a trail can be built from them.
    pub readable: bool,
}

impl Texture {
    pub fn new(name: impl Into<String>, pixels: PixelBuffer) -> Self {
        Self { name: name.into(), pixels, readable: true }
    }

    pub fn load_png(path: impl AsRef<Path>) -> Result<Self, TrailError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(name, PixelBuffer::load_png(path)?))
    }
}

// ── Sprite ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Sprite {
    pub texture: Arc<Texture>,
    /// Logical rectangle inside the texture.
    pub rect: PixelRect,
    /// Trimmed rectangle inside the texture that actually holds pixels.
    pub texture_rect: PixelRect,
    /// Bottom-left of `texture_rect` relative to the logical rectangle.
    pub texture_rect_offset: UVec2,
    /// Pivot in pixels, relative to the logical rectangle's bottom-left.
    pub pivot: Vec2,
}

impl Sprite {
    /// Untrimmed sprite covering the whole texture, pivot at its centre.
    pub fn from_texture(texture: Arc<Texture>) -> Self {
        let (w, h) = (texture.pixels.width(), texture.pixels.height());
        let rect = PixelRect::new(0, 0, w, h);
        Self {
            texture,
            rect,
            texture_rect: rect,
            texture_rect_offset: UVec2::ZERO,
            pivot: Vec2::new(w as f32 / 2.0, h as f32 / 2.0),
        }
    }

    /// Pivot as a fraction of the logical size. Zero-sized axes map to 0.
    pub fn normalized_pivot(&self) -> Vec2 {
        let frac = |p: f32, len: u32| if len == 0 { 0.0 } else { p / len as f32 };
        Vec2::new(frac(self.pivot.x, self.rect.width), frac(self.pivot.y, self.rect.height))
    }
}

// ── normalize ───────────────────────────────────────────────────────────────

/// Copy `sprite` out of its texture into a standalone buffer of the sprite's
/// logical size.
///
/// The trimmed pixels land at `texture_rect_offset`; everything around them is
/// transparent.
///
/// # Errors
/// - [`TrailError::Unreadable`] when the texture is not CPU-readable.
/// - [`TrailError::RectOutOfBounds`] when the trimmed rectangle does not fit
///   in the texture, or does not fit in the logical rectangle at its offset.
pub fn normalize(sprite: &Sprite) -> Result<PixelBuffer, TrailError> {
    let texture = &sprite.texture;
    if !texture.readable {
        return Err(TrailError::Unreadable(texture.name.clone()));
    }

    let mut out = PixelBuffer::new(sprite.rect.width, sprite.rect.height);
    out.blit(
        &texture.pixels,
        sprite.texture_rect,
        sprite.texture_rect_offset.x,
        sprite.texture_rect_offset.y,
    )?;

    log::debug!(
        "normalize: '{}' {}x{} (tight {}x{} at +{},+{})",
        texture.name,
        sprite.rect.width,
        sprite.rect.height,
        sprite.texture_rect.width,
        sprite.texture_rect.height,
        sprite.texture_rect_offset.x,
        sprite.texture_rect_offset.y,
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn from_texture_covers_everything() {
        let tex = Arc::new(Texture::new("blade", PixelBuffer::new(8, 4)));
        let sprite = Sprite::from_texture(tex);
        assert_eq!(sprite.rect, PixelRect::new(0, 0, 8, 4));
        assert_eq!(sprite.normalized_pivot(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn normalize_untrimmed_is_a_copy() {
        let mut px = PixelBuffer::new(3, 2);
        px.set(2, 1, Color::BLUE);
        let sprite = Sprite::from_texture(Arc::new(Texture::new("t", px.clone())));
        assert_eq!(normalize(&sprite).unwrap(), px);
    }
}
