// =============================================================================
// EXTRUDE.RS — Fading streaks from the traced edge
//
// Each edge point grows a streak along the depth axis. Its length comes from
// the response curve evaluated at the point's position along the edge; its
// opacity falls off linearly; the bend multiplies the cross coordinate by a
// cosine that drifts with every step.
// =============================================================================

use std::f32::consts::PI;

use crate::curve::ResponseCurve;
use crate::trace::{EDGE_COLOR, EdgeTrace};

/// Cosine warp applied to the cross coordinate at extrusion step `i`.
///
/// `bend` is in degrees per step; `bend = 0` gives exactly 1 for every step.
#[inline]
pub fn bend_factor(step: u32, bend: f32) -> f32 {
    (step as f32 * bend * (PI / 180.0)).cos()
}

/// Position of an edge point along the traced span, in `[0, 1]`.
///
/// A zero span (single point, or all points on one line) maps to 0.
#[inline]
pub fn span_position(delta: i32, span: i32) -> f32 {
    if span == 0 { 0.0 } else { delta as f32 / span as f32 }
}

/// Grow a streak from every point of `trace` into `trace.marked`.
///
/// Targets that fall outside the buffer on either axis are dropped, never
/// clamped. The depth coordinate only moves one way, so a streak stops at
/// the first step past the buffer edge however long the curve asks it to
/// be. Returns the number of pixels written.
pub fn extrude(trace: &mut EdgeTrace, length: f32, bend: f32, curve: &ResponseCurve) -> usize {
    let (Some(&first), Some(&last)) = (trace.points.first(), trace.points.last()) else {
        return 0;
    };

    let dir = trace.direction;
    let span = dir.cross(last) - dir.cross(first);
    let sign = dir.step_sign();
    let buffer = &mut trace.marked;
    let depth_len = dir.depth_len(buffer.width(), buffer.height()) as i64;
    let mut written = 0;

    for &p in &trace.points {
        let cross = dir.cross(p);
        let depth = dir.depth(p);
        let iterations = length * curve.evaluate(span_position(cross - dir.cross(first), span));
        let color = buffer.get(p.x, p.y).unwrap_or(EDGE_COLOR);

        let mut i = 1u32;
        while (i as f32) < iterations {
            let stepped = depth as i64 + sign as i64 * i as i64;
            if !(0..depth_len).contains(&stepped) {
                break;
            }

            let alpha = 1.0 - i as f32 / iterations;
            let warped = (cross as f32 * bend_factor(i, bend)).round() as i32;
            let target = dir.point(warped, stepped as i32);

            if buffer.set(target.x, target.y, color.with_alpha(alpha)) {
                written += 1;
            }
            i += 1;
        }
    }

    log::trace!(
        "extrude: {} points, span {span}, {written} pixels written",
        trace.points.len()
    );
    written
}
