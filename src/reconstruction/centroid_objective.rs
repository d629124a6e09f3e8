use super::{MomentOfFluid, ReconstructionFlags};
use crate::math::{Angles, Point, Real};
use crate::mesh::CellMesh;
use crate::utils::{self, DifferentiableFunction};
use na::{Unit, Vector2};

/// The squared, non-dimensional distance between the centroid of the material cut by a plane
/// and a reference centroid, as a function of the spherical angles of the plane normal.
///
/// Each evaluation moves the plane along its normal until it cuts the prescribed volume
/// fraction of the current cell. The gradient is estimated by central differences.
pub(crate) struct CentroidObjective<'e, 'a, M: ?Sized> {
    engine: &'e mut MomentOfFluid<'a, M>,
    fraction: Real,
    ref_center: Point<Real>,
    step: Real,
}

impl<'e, 'a, M: CellMesh + ?Sized> CentroidObjective<'e, 'a, M> {
    pub fn new(
        engine: &'e mut MomentOfFluid<'a, M>,
        fraction: Real,
        ref_center: Point<Real>,
    ) -> Self {
        CentroidObjective {
            engine,
            fraction,
            ref_center,
            step: Real::EPSILON.sqrt() * core::f64::consts::PI,
        }
    }

    fn value(&mut self, angles: &Angles) -> Real {
        let normal = Unit::new_normalize(utils::spherical_to_cartesian(angles.x, angles.y));
        let matched = self.engine.match_fraction_decomposed(
            self.fraction,
            &normal,
            ReconstructionFlags::empty(),
        );
        // A negligible volume has no centroid: fall back to the cell centroid.
        let center = matched.center.unwrap_or_else(|| self.engine.cell_center());

        ((center - self.ref_center) / self.engine.length_scale()).norm_squared()
    }
}

impl<M: CellMesh + ?Sized> DifferentiableFunction for CentroidObjective<'_, '_, M> {
    fn eval(&mut self, x: &Vector2<Real>) -> (Real, Vector2<Real>) {
        let value = self.value(x);
        let mut gradient = Vector2::zeros();

        for i in 0..2 {
            let mut forward = *x;
            let mut backward = *x;
            forward[i] += self.step;
            backward[i] -= self.step;
            gradient[i] = (self.value(&forward) - self.value(&backward)) / (2.0 * self.step);
        }

        (value, gradient)
    }
}
