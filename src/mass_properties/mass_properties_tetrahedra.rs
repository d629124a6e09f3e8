use crate::math::{Point, Real};
use crate::shape::Tetrahedron;
use num::Zero;

/// Computes the total signed volume and the volume-weighted center of a set of tetrahedra.
///
/// The sum is accumulated in the order of `tets`, so the result is deterministic for a given
/// decomposition. If the magnitude of the total volume is below `threshold`, the volume is
/// reported as zero and no center is returned.
pub fn tetrahedra_signed_volume_and_center(
    tets: &[Tetrahedron],
    threshold: Real,
) -> (Real, Option<Point<Real>>) {
    let mut volume = Real::zero();
    let mut weighted = Point::origin();

    for tet in tets {
        let vol = tet.signed_volume();
        weighted += tet.center().coords * vol;
        volume += vol;
    }

    if volume.abs() < threshold || volume.is_zero() {
        (0.0, None)
    } else {
        (volume, Some(weighted / volume))
    }
}
