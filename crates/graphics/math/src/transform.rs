use crate::Vec2D;

/// A 2x3 affine transformation matrix
///
/// ```text
/// | a b e |
/// | c d f |
/// ```
///
/// A point `(x, y)` is mapped to `(a*x + b*y + e, c*x + d*y + f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        a: 1.,
        b: 0.,
        c: 0.,
        d: 1.,
        e: 0.,
        f: 0.,
    };

    #[inline]
    #[must_use]
    pub const fn scale(x: f32, y: f32) -> Self {
        Self {
            a: x,
            d: y,
            ..Self::IDENTITY
        }
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, point: Vec2D) -> Vec2D {
        Vec2D {
            x: self.a * point.x + self.b * point.y + self.e,
            y: self.c * point.x + self.d * point.y + self.f,
        }
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
