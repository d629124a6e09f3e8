/*!
mof3d
========

**mof3d** is a Moment-of-Fluid interface reconstruction library written with
the rust programming language.

Given, for each cell of a polyhedral mesh, the volume fraction and the centroid
of one material, it finds the planar cut of the cell that reproduces the volume
exactly while matching the centroid as closely as possible.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)] // Maybe revisit this one later.
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![deny(unused_qualifications)]

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod mass_properties;
pub mod mesh;
pub mod query;
pub mod reconstruction;
pub mod shape;
pub mod transformation;
pub mod utils;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use na::{Matrix2, Vector2};

    /// The scalar type used throughout this crate.
    pub type Real = f64;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use na::Point3 as Point;

    /// The vector type.
    pub use na::Vector3 as Vector;

    /// The unit vector type.
    pub use na::UnitVector3 as UnitVector;

    /// The matrix type.
    pub use na::Matrix3 as Matrix;

    /// The pair of spherical angles `(theta, phi)` parametrizing a unit normal.
    pub type Angles = Vector2<Real>;
}
