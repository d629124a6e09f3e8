//! Interface reconstruction on every cell of a mesh.

use super::moment_of_fluid::checked_fraction;
use super::{CentroidMatch, MofError, MomentOfFluid, ReconstructionFlags};
use crate::math::{Point, Real, UnitVector, Vector};
use crate::mesh::CellMesh;
use crate::shape::Triangle;
use crate::transformation::vtk;
use na::Unit;
use std::io::{self, Write};
use std::path::Path;

#[cfg(feature = "parallel")]
use super::MofParameters;

/// The interface reconstructed in a single cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellInterface {
    /// The cell.
    pub cell: usize,
    /// The volume fraction of the material in the cell.
    pub fraction: Real,
    /// The normal the centroid optimization started from.
    pub seed_normal: UnitVector<Real>,
    /// The optimized plane and its properties.
    pub result: CentroidMatch,
}

/// The interface reconstructed on a whole mesh.
#[derive(Debug, Default)]
pub struct InterfaceReconstruction {
    /// The reconstructed cells, in increasing cell order.
    ///
    /// Cells entirely filled or entirely empty have no interface and are not listed.
    pub cells: Vec<CellInterface>,
    /// The cells where the reconstruction failed, with the reason of the failure.
    pub failures: Vec<(usize, MofError)>,
    /// The cells whose volume fraction lay outside of `[0, 1]`.
    ///
    /// Their fraction is clamped, which leaves them entirely filled or entirely empty.
    pub clamped_cells: Vec<usize>,
    /// The triangulated interface of every reconstructed cell, if it was collected.
    pub surface: Vec<Triangle>,
}

impl InterfaceReconstruction {
    /// Writes the collected interface in the legacy VTK format.
    pub fn write_surface<W: Write>(&self, out: &mut W, title: &str) -> io::Result<()> {
        vtk::write_vtk_triangles(out, title, &self.surface)
    }

    /// Writes the collected interface to a legacy VTK file.
    pub fn write_surface_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        vtk::write_vtk_triangles_to_file(path, "Moment-of-Fluid interface", &self.surface)
    }

    fn record(&mut self, cell: usize, outcome: CellOutcome) {
        match outcome {
            Ok((interface, surface)) => {
                self.cells.push(interface);
                self.surface.extend(surface);
            }
            Err(err) => {
                log::warn!("cell {}: interface reconstruction failed: {}", cell, err);
                self.failures.push((cell, err));
            }
        }
    }
}

type CellOutcome = Result<(CellInterface, Vec<Triangle>), MofError>;

impl<M: CellMesh + ?Sized> MomentOfFluid<'_, M> {
    /// Reconstructs the interface in every cell of the mesh.
    ///
    /// `fractions` and `ref_centers` hold the volume fraction and the centroid of the material
    /// in each cell. Cells with a fraction within the volume tolerance of 0 or 1 are skipped.
    /// The optimization in each cell starts from the normal opposed to the gradient of the
    /// volume fraction field.
    ///
    /// A failure in one cell does not stop the reconstruction: it is recorded in
    /// [`InterfaceReconstruction::failures`]. Fractions outside of `[0, 1]` are clamped with a
    /// warning and listed in [`InterfaceReconstruction::clamped_cells`].
    pub fn construct_interface(
        &mut self,
        fractions: &[Real],
        ref_centers: &[Point<Real>],
    ) -> Result<InterfaceReconstruction, MofError> {
        let mesh = self.mesh();
        check_inputs(mesh, fractions, ref_centers)?;

        let (cells, clamped_cells) = interfacial_cells(fractions, self.parameters().volume_epsilon);
        let mut result = InterfaceReconstruction {
            clamped_cells,
            ..InterfaceReconstruction::default()
        };

        for cell in cells {
            let gradient = fraction_gradient(mesh, fractions, cell);
            let outcome = reconstruct_cell(
                self,
                cell,
                fractions[cell],
                &ref_centers[cell],
                &gradient,
            );
            result.record(cell, outcome);
        }

        log::debug!(
            "reconstructed the interface in {} cells, {} failures",
            result.cells.len(),
            result.failures.len()
        );

        Ok(result)
    }
}

/// Reconstructs the interface in every cell of `mesh`, in parallel.
///
/// Each worker thread has its own [`MomentOfFluid`] engine. The result is the same as the one
/// of [`MomentOfFluid::construct_interface`].
#[cfg(feature = "parallel")]
pub fn par_construct_interface<M: CellMesh + Sync + ?Sized>(
    mesh: &M,
    params: &MofParameters,
    fractions: &[Real],
    ref_centers: &[Point<Real>],
) -> Result<InterfaceReconstruction, MofError> {
    use rayon::prelude::*;

    check_inputs(mesh, fractions, ref_centers)?;

    let (cells, clamped_cells) = interfacial_cells(fractions, params.volume_epsilon);
    let outcomes: Vec<_> = cells
        .par_iter()
        .map_init(
            || MomentOfFluid::with_parameters(mesh, *params),
            |engine, &cell| {
                let gradient = fraction_gradient(mesh, fractions, cell);
                reconstruct_cell(engine, cell, fractions[cell], &ref_centers[cell], &gradient)
            },
        )
        .collect();

    let mut result = InterfaceReconstruction {
        clamped_cells,
        ..InterfaceReconstruction::default()
    };

    for (cell, outcome) in cells.into_iter().zip(outcomes) {
        result.record(cell, outcome);
    }

    Ok(result)
}

/// The gradient of the cell-wise constant field `fractions` at the centroid of `cell`.
///
/// Computed with the Gauss theorem: the face values are the mean of the two adjacent cells, or
/// the cell value on boundary faces.
pub fn fraction_gradient<M: CellMesh + ?Sized>(
    mesh: &M,
    fractions: &[Real],
    cell: usize,
) -> Vector<Real> {
    let value = fractions[cell];
    let mut gradient = Vector::zeros();

    for &face in mesh.cell_faces(cell) {
        let (sign, other) = match mesh.face_orientation(face, cell) {
            Some(true) => (1.0, mesh.face_neighbour(face)),
            Some(false) => (-1.0, Some(mesh.face_owner(face))),
            None => continue,
        };
        let face_value = match other.and_then(|other| fractions.get(other)) {
            Some(other) => 0.5 * (value + other),
            None => value,
        };

        gradient += mesh.face_area_vector(face) * (sign * face_value);
    }

    let volume = mesh.cell_volume(cell);

    if volume > 0.0 {
        gradient / volume
    } else {
        Vector::zeros()
    }
}

/// The normal the centroid optimization starts from.
///
/// This is the direction opposed to `gradient` or, if it vanishes, the direction from
/// `ref_center` to `cell_center`. Falls back to `+x` if both vanish.
pub fn seed_normal(
    gradient: &Vector<Real>,
    ref_center: &Point<Real>,
    cell_center: &Point<Real>,
    min_norm: Real,
) -> UnitVector<Real> {
    let direction = |v: Vector<Real>| {
        if v.iter().all(|x| x.is_finite()) {
            Unit::try_new(v, min_norm)
        } else {
            None
        }
    };

    direction(-gradient)
        .or_else(|| direction(cell_center - ref_center))
        .unwrap_or_else(Vector::x_axis)
}

fn check_inputs<M: CellMesh + ?Sized>(
    mesh: &M,
    fractions: &[Real],
    ref_centers: &[Point<Real>],
) -> Result<(), MofError> {
    let expected = mesh.num_cells();

    for found in [fractions.len(), ref_centers.len()] {
        if found != expected {
            return Err(MofError::InputLength { expected, found });
        }
    }

    Ok(())
}

// Returns the cells to reconstruct, and the cells with a clamped fraction.
// NaN fractions are kept so that their reconstruction reports the error.
fn interfacial_cells(fractions: &[Real], tolerance: Real) -> (Vec<usize>, Vec<usize>) {
    let mut cells = Vec::new();
    let mut clamped = Vec::new();

    for (cell, &fraction) in fractions.iter().enumerate() {
        match checked_fraction(cell, fraction) {
            Err(_) => cells.push(cell),
            Ok((_, flags)) if flags.contains(ReconstructionFlags::FRACTION_CLAMPED) => {
                clamped.push(cell)
            }
            Ok((f, _)) if f > tolerance && f < 1.0 - tolerance => cells.push(cell),
            Ok(_) => {}
        }
    }

    (cells, clamped)
}

fn reconstruct_cell<M: CellMesh + ?Sized>(
    engine: &mut MomentOfFluid<'_, M>,
    cell: usize,
    fraction: Real,
    ref_center: &Point<Real>,
    gradient: &Vector<Real>,
) -> CellOutcome {
    let mesh = engine.mesh();
    let min_norm = engine.parameters().geom_epsilon * mesh.cell_volume(cell).abs().cbrt();
    let seed = seed_normal(gradient, ref_center, &mesh.cell_center(cell), min_norm);
    let result = engine.optimize_centroid(cell, fraction, ref_center, &seed)?;
    let surface = if engine.parameters().collect_surface {
        engine.surface().to_vec()
    } else {
        Vec::new()
    };

    Ok((
        CellInterface {
            cell,
            fraction,
            seed_normal: seed,
            result,
        },
        surface,
    ))
}
