//! Volume and center of mass of tetrahedral decompositions.

pub use self::mass_properties_tetrahedra::tetrahedra_signed_volume_and_center;

mod mass_properties_tetrahedra;
