// =============================================================================
// GEOMETRY.RS — Axes, directions and rectangles for trail synthesis
//
// Every pipeline stage talks about two axes:
// - the DEPTH axis, along which the tracer scans and the extruder steps
// - the CROSS axis, perpendicular to it, one scan line per cross index
//
// `Direction` owns the mapping between those axes and buffer x/y so the
// stages themselves never branch on direction more than once.
// =============================================================================

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A traced silhouette pixel, in buffer coordinates (y = 0 is the bottom row).
pub type EdgePoint = IVec2;

// =============================================================================
// DIRECTION
// =============================================================================

/// Side of the sprite the trail streams away from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Left/Right scan rows; Up/Down scan columns.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Number of scan lines for a `width × height` buffer.
    #[inline]
    pub fn cross_len(self, width: u32, height: u32) -> u32 {
        if self.is_horizontal() { height } else { width }
    }

    /// Number of pixels on each scan line.
    #[inline]
    pub fn depth_len(self, width: u32, height: u32) -> u32 {
        if self.is_horizontal() { width } else { height }
    }

    #[inline]
    pub fn cross(self, p: EdgePoint) -> i32 {
        if self.is_horizontal() { p.y } else { p.x }
    }

    #[inline]
    pub fn depth(self, p: EdgePoint) -> i32 {
        if self.is_horizontal() { p.x } else { p.y }
    }

    /// Build a buffer coordinate from a (cross, depth) pair.
    #[inline]
    pub fn point(self, cross: i32, depth: i32) -> EdgePoint {
        if self.is_horizontal() {
            IVec2::new(depth, cross)
        } else {
            IVec2::new(cross, depth)
        }
    }

    /// Whether a scan line is walked from depth 0 upward.
    ///
    /// Left scans increasing x, Down increasing y; Right and Up walk back
    /// from the far end so their traces mirror Left and Down.
    #[inline]
    pub fn scans_forward(self) -> bool {
        matches!(self, Self::Left | Self::Down)
    }

    /// The `k`-th depth index visited on a scan line of length `len`.
    #[inline]
    pub fn scan_depth(self, k: u32, len: u32) -> u32 {
        if self.scans_forward() { k } else { len - 1 - k }
    }

    /// Sign of the extrusion step along the depth axis. Always points back
    /// toward the side the scan started from, away from the silhouette.
    #[inline]
    pub fn step_sign(self) -> i32 {
        match self {
            Self::Left | Self::Down => -1,
            Self::Right | Self::Up => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown direction '{s}' (expected left, right, up or down)"))
    }
}

// =============================================================================
// RECTANGLES
// =============================================================================

/// Integer rectangle in pixel space. `(x, y)` is the bottom-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// True when the whole rectangle lies inside `[0, width) × [0, height)`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|t| t <= height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_for_horizontal_directions() {
        let p = IVec2::new(3, 7);
        assert_eq!(Direction::Left.cross(p), 7);
        assert_eq!(Direction::Right.depth(p), 3);
        assert_eq!(Direction::Right.point(7, 3), p);
    }

    #[test]
    fn test_axes_for_vertical_directions() {
        let p = IVec2::new(3, 7);
        assert_eq!(Direction::Up.cross(p), 3);
        assert_eq!(Direction::Down.depth(p), 7);
        assert_eq!(Direction::Down.point(3, 7), p);
    }

    #[test]
    fn test_scan_depth_mirrors() {
        assert_eq!(Direction::Left.scan_depth(0, 10), 0);
        assert_eq!(Direction::Right.scan_depth(0, 10), 9);
        assert_eq!(Direction::Down.scan_depth(2, 10), 2);
        assert_eq!(Direction::Up.scan_depth(2, 10), 7);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Up".parse::<Direction>(), Ok(Direction::Up));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(PixelRect::new(2, 2, 8, 8).fits_within(10, 10));
        assert!(!PixelRect::new(3, 2, 8, 8).fits_within(10, 10));
        assert!(!PixelRect::new(u32::MAX, 0, 2, 1).fits_within(10, 10));
    }
}
