use super::Vec2D;

use std::ops;

/// An axis-aligned rectangle, described by its smallest and largest corner
///
/// The rectangle makes no assumption about the direction of the y axis,
/// so it can describe bounding boxes in both y-up and y-down coordinate systems.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle<T = f32> {
    min: Vec2D<T>,
    max: Vec2D<T>,
}

impl<T> Rectangle<T> {
    pub const fn from_corners(min: Vec2D<T>, max: Vec2D<T>) -> Self {
        Self { min, max }
    }
}

impl<T> Rectangle<T>
where
    T: Copy,
{
    pub const fn min(&self) -> Vec2D<T> {
        self.min
    }

    pub const fn max(&self) -> Vec2D<T> {
        self.max
    }
}

impl<T> Rectangle<T>
where
    T: ops::Sub<Output = T> + Copy,
{
    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }
}

impl<T> Rectangle<T>
where
    T: PartialOrd + Copy,
{
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec2D<T>) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }

    #[inline]
    pub fn grow_to_contain(&mut self, other: Self) {
        self.grow_to_contain_point(other.min);
        self.grow_to_contain_point(other.max);
    }

    pub fn grow_to_contain_point(&mut self, point: Vec2D<T>) {
        // Like Ord::min/Ord::max except they only require T to implement
        // PartialOrd, not Ord
        if point.x < self.min.x {
            self.min.x = point.x;
        }
        if point.y < self.min.y {
            self.min.y = point.y;
        }
        if self.max.x < point.x {
            self.max.x = point.x;
        }
        if self.max.y < point.y {
            self.max.y = point.y;
        }
    }
}
