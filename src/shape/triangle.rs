//! Definition of the triangle shape.

use crate::math::{Point, Real, UnitVector, Vector};
use crate::utils;
use na::Unit;

/// A triangle shape.
///
/// The vertex order defines the orientation: the normal is `(b - a) × (c - a)`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point<Real>,
    /// The triangle second point.
    pub b: Point<Real>,
    /// The triangle third point.
    pub c: Point<Real>,
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// The three vertices of this triangle, in order.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 3] {
        [self.a, self.b, self.c]
    }

    /// A vector normal of this triangle, with a norm equal to twice its area.
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        ab.cross(&ac)
    }

    /// The normal of this triangle, or `None` if it is degenerate.
    #[inline]
    pub fn normal(&self) -> Option<UnitVector<Real>> {
        Unit::try_new(self.scaled_normal(), crate::math::DEFAULT_EPSILON)
    }

    /// The area of this triangle.
    #[inline]
    pub fn area(&self) -> Real {
        self.scaled_normal().norm() * 0.5
    }

    /// The geometric center of this triangle.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        utils::center(&[self.a, self.b, self.c])
    }

    /// Reverses the orientation of this triangle.
    #[inline]
    pub fn reverse(&mut self) {
        core::mem::swap(&mut self.b, &mut self.c);
    }

    /// Returns a copy of this triangle oriented so that its normal points along `dir`.
    ///
    /// Degenerate triangles are returned unchanged.
    #[inline]
    pub fn oriented_along(mut self, dir: &Vector<Real>) -> Triangle {
        if self.scaled_normal().dot(dir) < 0.0 {
            self.reverse();
        }
        self
    }
}
