use serde::{Deserialize, Serialize};

// ── Keyframe ─────────────────────────────────────────────────────────────────

/// One control point of a [`ResponseCurve`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key from the left.
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key to the right.
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self { time, value, in_tangent, out_tangent }
    }

    /// Key with flat tangents.
    pub const fn flat(time: f32, value: f32) -> Self {
        Self::new(time, value, 0.0, 0.0)
    }
}

// ── ResponseCurve ────────────────────────────────────────────────────────────

/// Piecewise cubic Hermite curve mapping a normalized edge position to a
/// trail-length multiplier.
///
/// Serialises as a plain list of keyframes. Keys are kept sorted by time.
/// Outside the first/last key the curve holds the end value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct ResponseCurve {
    keys: Vec<Keyframe>,
}

impl ResponseCurve {
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.retain(|k| k.time.is_finite());
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Same value everywhere.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::flat(0.0, value), Keyframe::flat(1.0, value)])
    }

    /// Straight line from `start` at 0 to `end` at 1.
    pub fn linear(start: f32, end: f32) -> Self {
        let slope = end - start;
        Self::new(vec![
            Keyframe::new(0.0, start, slope, slope),
            Keyframe::new(1.0, end, slope, slope),
        ])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Evaluate at `t`. An empty curve is 0 everywhere.
    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; t > first.time guarantees idx >= 1.
        let idx = self.keys.partition_point(|k| k.time <= t);
        let k0 = &self.keys[idx - 1];
        let k1 = &self.keys[idx];
        hermite(k0, k1, t)
    }
}

impl Default for ResponseCurve {
    /// Ease from (0, 0) to (1, 1) with unit tangents on the inner side.
    fn default() -> Self {
        Self::new(vec![Keyframe::new(0.0, 0.0, 0.0, 1.0), Keyframe::new(1.0, 1.0, 1.0, 0.0)])
    }
}

impl From<Vec<Keyframe>> for ResponseCurve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<ResponseCurve> for Vec<Keyframe> {
    fn from(curve: ResponseCurve) -> Self {
        curve.keys
    }
}

/// Cubic Hermite segment between two keys. Infinite tangents make the
/// segment a step that holds `k0`'s value.
fn hermite(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
    let dt = k1.time - k0.time;
    if dt <= 0.0 {
        return k1.value;
    }
    let (m0, m1) = (k0.out_tangent, k1.in_tangent);
    if !m0.is_finite() || !m1.is_finite() {
        return k0.value;
    }

    let s = (t - k0.time) / dt;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * k0.value + h10 * dt * m0 + h01 * k1.value + h11 * dt * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_is_identity_on_unit_interval() {
        let curve = ResponseCurve::default();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((curve.evaluate(t) - t).abs() < 1e-5, "t={t} got {}", curve.evaluate(t));
        }
    }

    #[test]
    fn keys_are_sorted_on_construction() {
        let curve = ResponseCurve::new(vec![Keyframe::flat(1.0, 2.0), Keyframe::flat(0.0, 1.0)]);
        assert_eq!(curve.keys()[0].time, 0.0);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert_eq!(curve.evaluate(1.0), 2.0);
    }

    #[test]
    fn infinite_tangent_holds_left_value() {
        let curve = ResponseCurve::new(vec![
            Keyframe::new(0.0, 0.25, 0.0, f32::INFINITY),
            Keyframe::flat(1.0, 1.0),
        ]);
        assert_eq!(curve.evaluate(0.5), 0.25);
    }
}
