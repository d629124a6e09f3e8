//! Clipping of shapes by a plane.

use crate::shape::{Tetrahedron, Triangle};
use arrayvec::ArrayVec;

mod split_tetrahedron;

/// The part of a tetrahedron lying below a plane, and its section by that plane.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TetrahedronClip {
    /// The tetrahedra covering the part below the plane.
    pub below: ArrayVec<Tetrahedron, 3>,
    /// The triangles covering the section of the tetrahedron by the plane.
    pub section: ArrayVec<Triangle, 2>,
}
