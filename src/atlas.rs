use std::collections::HashMap;
use std::sync::Arc;

use glam::{UVec2, Vec2};
use serde::Deserialize;

use crate::error::TrailError;
use crate::geometry::PixelRect;
use crate::source::{Sprite, Texture};

// ── FrameEntry (JSON) ────────────────────────────────────────────────────────

/// One named frame in a sprite-sheet description.
///
/// `x`, `y`, `w`, `h` locate the stored (possibly trimmed) pixels in the
/// texture, bottom-left origin. The optional fields describe the untrimmed
/// sprite around them.
#[derive(Clone, Debug, Deserialize)]
struct FrameEntry {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    #[serde(default)]
    offset_x: u32,
    #[serde(default)]
    offset_y: u32,
    rect_w: Option<u32>,
    rect_h: Option<u32>,
    pivot_x: Option<f32>,
    pivot_y: Option<f32>,
}

// ── SpriteFrame ──────────────────────────────────────────────────────────────

/// Resolved frame metadata, ready to be turned into a [`Sprite`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteFrame {
    pub texture_rect: PixelRect,
    pub offset: UVec2,
    /// Logical (untrimmed) size.
    pub size: UVec2,
    /// Pivot in pixels relative to the logical rectangle.
    pub pivot: Vec2,
}

impl From<FrameEntry> for SpriteFrame {
    fn from(e: FrameEntry) -> Self {
        // Missing logical size: the frame was never trimmed.
        let size = UVec2::new(e.rect_w.unwrap_or(e.w), e.rect_h.unwrap_or(e.h));
        let pivot = Vec2::new(
            e.pivot_x.unwrap_or(size.x as f32 / 2.0),
            e.pivot_y.unwrap_or(size.y as f32 / 2.0),
        );
        Self {
            texture_rect: PixelRect::new(e.x, e.y, e.w, e.h),
            offset: UVec2::new(e.offset_x, e.offset_y),
            size,
            pivot,
        }
    }
}

// ── SpriteSheet ──────────────────────────────────────────────────────────────

/// A texture plus the named frames cut from it.
pub struct SpriteSheet {
    pub texture: Arc<Texture>,
    pub frames: HashMap<String, SpriteFrame>,
}

impl SpriteSheet {
    /// Parse frame descriptions of the form
    ///
    /// ```json
    /// { "sword": { "x": 0, "y": 0, "w": 12, "h": 30,
    ///              "offset_x": 2, "offset_y": 1, "rect_w": 16, "rect_h": 32 } }
    /// ```
    ///
    /// Frames are not checked against the texture here; a frame that does
    /// not fit fails when a trail is built from it.
    pub fn from_json(json: &str, texture: Texture) -> Result<Self, TrailError> {
        let raw: HashMap<String, FrameEntry> = serde_json::from_str(json)?;
        let frames = raw.into_iter().map(|(name, e)| (name, SpriteFrame::from(e))).collect();
        Ok(Self { texture: Arc::new(texture), frames })
    }

    /// Frame names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.frames.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn sprite(&self, name: &str) -> Result<Sprite, TrailError> {
        let frame = self
            .frames
            .get(name)
            .ok_or_else(|| TrailError::UnknownFrame(name.to_string()))?;

        // The logical rect's texture position is the tight rect moved back by
        // its offset; saturate so malformed offsets surface later as a
        // bounds error rather than an underflow.
        let rect = PixelRect::new(
            frame.texture_rect.x.saturating_sub(frame.offset.x),
            frame.texture_rect.y.saturating_sub(frame.offset.y),
            frame.size.x,
            frame.size.y,
        );

        Ok(Sprite {
            texture: Arc::clone(&self.texture),
            rect,
            texture_rect: frame.texture_rect,
            texture_rect_offset: frame.offset,
            pivot: frame.pivot,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;

    fn sheet(json: &str) -> SpriteSheet {
        SpriteSheet::from_json(json, Texture::new("sheet", PixelBuffer::new(64, 64))).unwrap()
    }

    #[test]
    fn untrimmed_frame_defaults() {
        let s = sheet(r#"{ "axe": { "x": 4, "y": 8, "w": 10, "h": 20 } }"#);
        let f = &s.frames["axe"];
        assert_eq!(f.size, UVec2::new(10, 20));
        assert_eq!(f.offset, UVec2::ZERO);
        assert_eq!(f.pivot, Vec2::new(5.0, 10.0));
    }

    #[test]
    fn trimmed_frame_rect_is_moved_back_by_offset() {
        let s = sheet(
            r#"{ "sword": { "x": 10, "y": 10, "w": 4, "h": 6,
                            "offset_x": 2, "offset_y": 1, "rect_w": 8, "rect_h": 8,
                            "pivot_x": 0.0, "pivot_y": 4.0 } }"#,
        );
        let sprite = s.sprite("sword").unwrap();
        assert_eq!(sprite.rect, PixelRect::new(8, 9, 8, 8));
        assert_eq!(sprite.texture_rect, PixelRect::new(10, 10, 4, 6));
        assert_eq!(sprite.texture_rect_offset, UVec2::new(2, 1));
        assert_eq!(sprite.normalized_pivot(), Vec2::new(0.0, 0.5));
    }

    #[test]
    fn unknown_frame_is_an_error() {
        let s = sheet("{}");
        assert!(matches!(s.sprite("mace"), Err(TrailError::UnknownFrame(n)) if n == "mace"));
    }

    #[test]
    fn names_are_sorted() {
        let s = sheet(
            r#"{ "b": { "x": 0, "y": 0, "w": 1, "h": 1 },
                 "a": { "x": 0, "y": 0, "w": 1, "h": 1 } }"#,
        );
        assert_eq!(s.names(), vec!["a", "b"]);
    }
}
