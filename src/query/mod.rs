//! Geometric queries against planes.

pub use self::split::TetrahedronClip;

pub mod split;
