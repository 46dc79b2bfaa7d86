// ── Color ──────────────────────────────────────────────────────────────────

/// Linear RGBA colour, every channel in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Self = Self([0.0, 1.0, 0.0, 1.0]);
    pub const BLUE: Self = Self([0.0, 0.0, 1.0, 1.0]);
    pub const CLEAR: Self = Self([0.0, 0.0, 0.0, 0.0]);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub fn alpha(self) -> f32 {
        self.0[3]
    }

    /// Same colour with the alpha channel replaced.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    /// Component-wise mean of two colours, alpha included.
    pub fn average(self, other: Self) -> Self {
        let [r0, g0, b0, a0] = self.0;
        let [r1, g1, b1, a1] = other.0;
        Self([
            (r0 + r1) / 2.0,
            (g0 + g1) / 2.0,
            (b0 + b1) / 2.0,
            (a0 + a1) / 2.0,
        ])
    }

    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self(px.map(|c| c as f32 / 255.0))
    }

    /// Quantise to 8 bits per channel, rounding to nearest.
    pub fn to_rgba8(self) -> [u8; 4] {
        self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}
