//! Planes in Hessian-normal form.

use crate::math::{Angles, Point, Real, UnitVector, Vector};
use crate::utils;

/// A plane in Hessian-normal form.
///
/// A point `x` lies on the plane iff `normal · x + offset = 0`. The closed half-space
/// `{x : normal · x + offset <= 0}` is said to be *below* the plane; this is the side
/// holding the reconstructed material.
#[derive(PartialEq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Plane {
    /// The unit normal of the plane, pointing out of the below half-space.
    pub normal: UnitVector<Real>,
    /// The signed offset of the plane.
    pub offset: Real,
}

impl Plane {
    /// Builds a plane from its unit normal and signed offset.
    #[inline]
    pub fn new(normal: UnitVector<Real>, offset: Real) -> Plane {
        Plane { normal, offset }
    }

    /// Builds the plane with the given normal passing through `point`.
    #[inline]
    pub fn from_point_and_normal(point: &Point<Real>, normal: UnitVector<Real>) -> Plane {
        Plane::new(normal, -normal.dot(&point.coords))
    }

    /// Builds a plane whose normal is given by the spherical angles `(theta, phi)`.
    #[inline]
    pub fn from_angles(angles: &Angles, offset: Real) -> Plane {
        let normal = utils::spherical_to_cartesian(angles.x, angles.y);
        Plane::new(UnitVector::new_unchecked(normal), offset)
    }

    /// The spherical angles `(theta, phi)` of this plane's normal.
    #[inline]
    pub fn angles(&self) -> Angles {
        let (theta, phi) = utils::cartesian_to_spherical(&self.normal);
        Angles::new(theta, phi)
    }

    /// The level of this plane along its normal, i.e., `-offset`.
    ///
    /// The plane is the set of points `x` with `normal · x = level`.
    #[inline]
    pub fn level(&self) -> Real {
        -self.offset
    }

    /// The signed distance `normal · pt + offset` from `pt` to this plane.
    #[inline]
    pub fn signed_distance(&self, pt: &Point<Real>) -> Real {
        self.normal.dot(&pt.coords) + self.offset
    }

    /// The integer side of `pt` wrt. this plane, with points on the plane counted as `+1`.
    #[inline]
    pub fn side(&self, pt: &Point<Real>) -> i32 {
        int_sign(self.signed_distance(pt))
    }

    /// Orthogonally projects `pt` on this plane.
    #[inline]
    pub fn project_point(&self, pt: &Point<Real>) -> Point<Real> {
        pt - *self.normal * self.signed_distance(pt)
    }

    /// Two unit vectors spanning this plane, forming a right-handed frame with the normal.
    pub fn tangent_basis(&self) -> [Vector<Real>; 2] {
        let n = self.normal.into_inner();
        // Pick the axis least aligned with the normal to avoid cancellation.
        let axis = n.iamin();
        let t1 = n.cross(&Vector::ith(axis, 1.0)).normalize();
        let t2 = n.cross(&t1);
        [t1, t2]
    }
}

/// The sign of `s`, with the convention `int_sign(0.0) == 1`.
#[inline]
pub fn int_sign(s: Real) -> i32 {
    if s >= 0.0 {
        1
    } else {
        -1
    }
}
