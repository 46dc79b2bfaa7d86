// =============================================================================
// TRACE.RS — Silhouette edge tracing
//
// One scan line per cross index, walked from the side named by the
// direction. The first pixel that is more than half opaque is the edge.
// =============================================================================

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::geometry::{Direction, EdgePoint};

/// Alpha a pixel must exceed to count as part of the silhouette.
pub const EDGE_ALPHA_THRESHOLD: f32 = 0.5;

/// Colour written for every traced pixel.
pub const EDGE_COLOR: Color = Color::WHITE;

/// Result of tracing one buffer.
#[derive(Clone, Debug)]
pub struct EdgeTrace {
    pub direction: Direction,
    /// Edge pixels in increasing cross order, at most one per scan line.
    pub points: Vec<EdgePoint>,
    /// Same size as the source. Traced pixels are [`EDGE_COLOR`], the rest clear.
    pub marked: PixelBuffer,
}

impl EdgeTrace {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trace the silhouette of `source` as seen from `direction`.
///
/// A fully transparent source yields an empty trace and an all-clear
/// marked buffer.
pub fn trace_edge(source: &PixelBuffer, direction: Direction) -> EdgeTrace {
    let (w, h) = (source.width(), source.height());
    let cross_len = direction.cross_len(w, h);
    let depth_len = direction.depth_len(w, h);

    let mut marked = PixelBuffer::new(w, h);
    let mut points = Vec::new();

    for cross in 0..cross_len as i32 {
        let hit = (0..depth_len)
            .map(|k| direction.point(cross, direction.scan_depth(k, depth_len) as i32))
            .find(|p| {
                source
                    .get(p.x, p.y)
                    .is_some_and(|c| c.alpha() > EDGE_ALPHA_THRESHOLD)
            });

        if let Some(p) = hit {
            marked.set(p.x, p.y, EDGE_COLOR);
            points.push(p);
        }
    }

    log::trace!("trace_edge: {direction} found {} of {cross_len} scan lines", points.len());

    EdgeTrace { direction, points, marked }
}
