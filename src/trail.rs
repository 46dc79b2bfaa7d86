use std::path::Path;
use std::sync::Arc;

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::curve::ResponseCurve;
use crate::error::TrailError;
use crate::extrude::extrude;
use crate::fill::fill_gaps;
use crate::geometry::{Direction, PixelRect};
use crate::source::{Sprite, Texture, normalize};
use crate::trace::trace_edge;

/// Upper bound for [`TrailConfig::length`].
pub const MAX_TRAIL_LENGTH: f32 = 1000.0;

/// Pixels per world unit of generated trail sprites.
pub const DEFAULT_PIXELS_PER_UNIT: f32 = 100.0;

// ── TrailConfig ───────────────────────────────────────────────────────────────

/// Trail parameters. Every field has a default, so a JSON file only needs
/// the values it changes:
///
/// ```json
/// { "direction": "up", "length": 40, "bend": 0.5, "remove_gaps": true }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub direction: Direction,
    /// Maximum streak length in pixels, `0..=1000`.
    pub length: f32,
    /// Degrees of cosine warp per extrusion step, `0..=1`.
    pub bend: f32,
    /// Length multiplier along the traced edge.
    pub curve: ResponseCurve,
    /// Patch one-pixel holes after extrusion. Only applies when `bend > 0`.
    pub remove_gaps: bool,
    /// Turns [`MeleeWeaponTrail::build`] into a no-op.
    pub disabled: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            length: 100.0,
            bend: 0.25,
            curve: ResponseCurve::default(),
            remove_gaps: false,
            disabled: false,
        }
    }
}

impl TrailConfig {
    pub fn from_json(json: &str) -> Result<Self, TrailError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrailError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Pull `length` and `bend` into their supported ranges. NaN becomes 0.
    pub fn clamped(mut self) -> Self {
        let clamp = |v: f32, max: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        self.length = clamp(self.length, MAX_TRAIL_LENGTH);
        self.bend = clamp(self.bend, 1.0);
        self
    }
}

// ── TrailSprite ───────────────────────────────────────────────────────────────

/// A finished trail: pixels plus what the renderer needs to place them.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailSprite {
    pub pixels: PixelBuffer,
    /// Pivot as a fraction of the trail size, carried over from the weapon.
    pub pivot: Vec2,
    pub pixels_per_unit: f32,
}

/// Sidecar description of a [`TrailSprite`], written next to exported PNGs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrailMeta {
    pub width: u32,
    pub height: u32,
    pub pivot: Vec2,
    pub pixels_per_unit: f32,
}

impl TrailSprite {
    pub fn meta(&self) -> TrailMeta {
        TrailMeta {
            width: self.pixels.width(),
            height: self.pixels.height(),
            pivot: self.pivot,
            pixels_per_unit: self.pixels_per_unit,
        }
    }

    /// Wrap the trail as an untrimmed sprite so it can feed another build.
    pub fn into_sprite(self, name: impl Into<String>) -> Sprite {
        let (w, h) = (self.pixels.width(), self.pixels.height());
        let rect = PixelRect::new(0, 0, w, h);
        Sprite {
            texture: Arc::new(Texture::new(name, self.pixels)),
            rect,
            texture_rect: rect,
            texture_rect_offset: UVec2::ZERO,
            pivot: self.pivot * Vec2::new(w as f32, h as f32),
        }
    }
}

// ── MeleeWeaponTrail ──────────────────────────────────────────────────────────

/// Builds trail sprites from weapon sprites.
#[derive(Clone, Debug, Default)]
pub struct MeleeWeaponTrail {
    config: TrailConfig,
}

impl MeleeWeaponTrail {
    /// The config is clamped on the way in.
    pub fn new(config: TrailConfig) -> Self {
        Self { config: config.clamped() }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    /// Build a trail for `weapon`.
    ///
    /// Returns `Ok(None)` when the trail is disabled or there is no weapon
    /// sprite. Fails before any processing if the weapon's texture cannot be
    /// read or its rectangles are inconsistent.
    pub fn build(&self, weapon: Option<&Sprite>) -> Result<Option<TrailSprite>, TrailError> {
        let Some(weapon) = weapon.filter(|_| !self.config.disabled) else {
            log::debug!("trail build skipped (disabled or no sprite)");
            return Ok(None);
        };

        let source = normalize(weapon)?;
        let pixels = self.build_buffer(&source);

        Ok(Some(TrailSprite {
            pixels,
            pivot: weapon.normalized_pivot(),
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        }))
    }

    /// Run trace, extrude and gap fill on an already-normalized buffer.
    pub fn build_buffer(&self, source: &PixelBuffer) -> PixelBuffer {
        let cfg = &self.config;
        let mut trace = trace_edge(source, cfg.direction);

        if trace.is_empty() {
            log::warn!(
                "no silhouette found scanning {} in {}x{} sprite; trail is empty",
                cfg.direction,
                source.width(),
                source.height()
            );
            return trace.marked;
        }

        let written = extrude(&mut trace, cfg.length, cfg.bend, &cfg.curve);
        let filled = if cfg.bend > 0.0 && cfg.remove_gaps { fill_gaps(&mut trace.marked) } else { 0 };

        log::debug!(
            "trail {}: {} edge points, {written} streak pixels, {filled} gaps filled",
            cfg.direction,
            trace.points.len()
        );
        trace.marked
    }
}
