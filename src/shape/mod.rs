//! Shapes supported by the reconstruction engine.

pub use self::plane::{int_sign, Plane};
pub use self::tetrahedron::Tetrahedron;
pub use self::triangle::Triangle;

mod plane;
mod tetrahedron;
mod triangle;
