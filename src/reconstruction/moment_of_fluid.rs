use super::centroid_objective::CentroidObjective;
use super::offset_solver::{breakpoint_levels, LevelSolver};
use super::{MofError, MofParameters, ReconstructionFlags};
use crate::mass_properties::tetrahedra_signed_volume_and_center;
use crate::math::{Angles, Point, Real, UnitVector};
use crate::mesh::CellMesh;
use crate::shape::{Plane, Tetrahedron, Triangle};
use crate::transformation::{decompose_cell, vtk};
use crate::utils::{self, BfgsTermination};
use na::Unit;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The plane matching a volume fraction for a prescribed normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractionMatch {
    /// The cutting plane. The material lies below it.
    pub plane: Plane,
    /// The centroid of the part of the cell below the plane, if that part is not empty.
    pub center: Option<Point<Real>>,
    /// The volume of the part of the cell below the plane.
    pub volume: Real,
    /// The range `[d_min, d_max]` of plane offsets cutting the cell along this normal.
    pub span: [Real; 2],
    /// The volumes below the planes bounding the polynomial piece containing the solution.
    pub bracket_volumes: [Real; 2],
    /// Non-fatal conditions met while matching the fraction.
    pub flags: ReconstructionFlags,
}

impl FractionMatch {
    /// The width `d_max - d_min` of the range of offsets cutting the cell.
    pub fn span_width(&self) -> Real {
        self.span[1] - self.span[0]
    }
}

/// The plane matching a volume fraction with a centroid as close as possible to a reference.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CentroidMatch {
    /// The optimized cutting plane. The material lies below it.
    pub plane: Plane,
    /// The centroid of the part of the cell below the plane, if that part is not empty.
    pub center: Option<Point<Real>>,
    /// The volume of the part of the cell below the plane.
    pub volume: Real,
    /// The distance between `center` and the reference centroid, zero if `center` is `None`.
    pub distance: Real,
    /// Number of objective evaluations performed by the optimizer.
    pub evaluations: usize,
    /// Why the optimizer stopped, or `None` if the fraction is too close to 0 or 1 to optimize.
    pub termination: Option<BfgsTermination>,
    /// Non-fatal conditions met during the reconstruction.
    pub flags: ReconstructionFlags,
}

/// Moment-of-Fluid interface reconstruction on the cells of a mesh.
///
/// The engine keeps the tetrahedral decomposition of the last cell it worked on, as well as the
/// tetrahedra and the triangulated interface resulting from the last evaluated plane. It is
/// meant to be used by a single thread: reconstructing cells in parallel requires one engine per
/// worker.
pub struct MomentOfFluid<'a, M: ?Sized> {
    mesh: &'a M,
    params: MofParameters,
    cell: Option<usize>,
    custom_apex: bool,
    tet_decomp: Vec<Tetrahedron>,
    all_tets: Vec<Tetrahedron>,
    all_tris: Vec<Triangle>,
    cell_volume: Real,
    cell_center: Point<Real>,
    length_scale: Real,
}

impl<'a, M: CellMesh + ?Sized> MomentOfFluid<'a, M> {
    /// Creates an engine working on `mesh` with the default parameters.
    pub fn new(mesh: &'a M) -> Self {
        Self::with_parameters(mesh, MofParameters::default())
    }

    /// Creates an engine working on `mesh`.
    pub fn with_parameters(mesh: &'a M, params: MofParameters) -> Self {
        MomentOfFluid {
            mesh,
            params,
            cell: None,
            custom_apex: false,
            tet_decomp: Vec::new(),
            all_tets: Vec::new(),
            all_tris: Vec::new(),
            cell_volume: 0.0,
            cell_center: Point::origin(),
            length_scale: 0.0,
        }
    }

    /// The mesh this engine works on.
    pub fn mesh(&self) -> &'a M {
        self.mesh
    }

    /// The reconstruction parameters.
    pub fn parameters(&self) -> &MofParameters {
        &self.params
    }

    /// The cell currently decomposed, if any.
    pub fn current_cell(&self) -> Option<usize> {
        self.cell
    }

    /// The volume of the current cell, from its tetrahedral decomposition.
    pub fn cell_volume(&self) -> Real {
        self.cell_volume
    }

    /// The centroid of the current cell, from its tetrahedral decomposition.
    pub fn cell_center(&self) -> Point<Real> {
        self.cell_center
    }

    /// The characteristic length `V_cell^(1/3)` of the current cell.
    pub fn length_scale(&self) -> Real {
        self.length_scale
    }

    /// The tetrahedral decomposition of the current cell.
    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tet_decomp
    }

    /// The tetrahedra below the last evaluated plane.
    pub fn clipped_tetrahedra(&self) -> &[Tetrahedron] {
        &self.all_tets
    }

    /// The triangulated section of the current cell by the last evaluated plane.
    pub fn surface(&self) -> &[Triangle] {
        &self.all_tris
    }

    /// Decomposes `cell` into tetrahedra around its centroid.
    ///
    /// Nothing is done if `cell` is already the current cell, decomposed around its centroid.
    pub fn decompose_cell(&mut self, cell: usize) -> Result<(), MofError> {
        if self.cell == Some(cell) && !self.custom_apex {
            return Ok(());
        }

        self.decompose(cell, None)
    }

    /// Decomposes `cell` into tetrahedra around `apex` instead of the cell centroid.
    ///
    /// The cell must be star-shaped wrt. `apex` for the clipped volumes to be exact. The
    /// decomposition is kept by the subsequent queries on the same cell.
    pub fn decompose_cell_about(&mut self, cell: usize, apex: Point<Real>) -> Result<(), MofError> {
        self.decompose(cell, Some(apex))
    }

    // Keeps the current decomposition of `cell`, whatever its apex.
    fn ensure_decomposed(&mut self, cell: usize) -> Result<(), MofError> {
        if self.cell == Some(cell) {
            Ok(())
        } else {
            self.decompose(cell, None)
        }
    }

    fn decompose(&mut self, cell: usize, apex: Option<Point<Real>>) -> Result<(), MofError> {
        let num_cells = self.mesh.num_cells();

        if cell >= num_cells {
            return Err(MofError::CellOutOfBounds { cell, num_cells });
        }

        self.cell = None;
        self.tet_decomp.clear();
        self.all_tets.clear();
        self.all_tris.clear();

        decompose_cell(self.mesh, cell, apex, &mut self.tet_decomp)?;
        let (volume, center) = tetrahedra_signed_volume_and_center(&self.tet_decomp, 0.0);

        match center {
            Some(center) if volume > 0.0 && volume.is_finite() => {
                self.cell = Some(cell);
                self.custom_apex = apex.is_some();
                self.cell_volume = volume;
                self.cell_center = center;
                self.length_scale = volume.cbrt();
                Ok(())
            }
            _ => Err(MofError::DegenerateCell { cell, volume }),
        }
    }

    /// Clips the current cell by `plane`.
    ///
    /// Returns the volume below the plane and its centroid, which is `None` if that volume is
    /// negligible. The clipped tetrahedra and the section triangles are kept until the next
    /// evaluation.
    pub fn evaluate(&mut self, plane: &Plane) -> (Real, Option<Point<Real>>) {
        self.all_tets.clear();
        self.all_tris.clear();

        let epsilon = self.params.geom_epsilon * self.length_scale;

        for tet in &self.tet_decomp {
            let clip = tet.clip_below(plane, epsilon);
            self.all_tets.extend(clip.below);
            self.all_tris.extend(clip.section);
        }

        tetrahedra_signed_volume_and_center(&self.all_tets, self.volume_threshold())
    }

    /// Finds the plane with the given normal cutting `fraction` of the volume of `cell`.
    ///
    /// Fractions outside of `[0, 1]` are clamped. A fraction of 0 (resp. 1) gives a plane just
    /// outside of the cell, with the whole cell above (resp. below) it.
    pub fn match_fraction(
        &mut self,
        cell: usize,
        fraction: Real,
        normal: &UnitVector<Real>,
    ) -> Result<FractionMatch, MofError> {
        self.ensure_decomposed(cell)?;
        let (fraction, flags) = checked_fraction(cell, fraction)?;
        Ok(self.match_fraction_decomposed(fraction, normal, flags))
    }

    pub(crate) fn match_fraction_decomposed(
        &mut self,
        fraction: Real,
        normal: &UnitVector<Real>,
        mut flags: ReconstructionFlags,
    ) -> FractionMatch {
        let epsilon = self.params.geom_epsilon * self.length_scale;
        let levels = breakpoint_levels(&self.tet_decomp, normal, epsilon);
        let solver = LevelSolver {
            epsilon,
            volume_tolerance: self.params.volume_epsilon * self.cell_volume,
            max_iterations: self.params.max_offset_iterations,
        };

        let mut last_level = None;
        let solution = solver.solve(&levels, fraction, self.cell_volume, |level| {
            last_level = Some(level);
            self.evaluate(&Plane::new(*normal, -level)).0
        });

        let plane = Plane::new(*normal, -solution.level);
        let (volume, center) = if last_level == Some(solution.level) {
            tetrahedra_signed_volume_and_center(&self.all_tets, self.volume_threshold())
        } else {
            self.evaluate(&plane)
        };

        if !solution.converged {
            log::debug!(
                "cell {:?}: volume fraction {} matched up to {}",
                self.cell,
                fraction,
                (volume - fraction * self.cell_volume).abs() / self.cell_volume
            );
            flags |= ReconstructionFlags::OFFSET_INEXACT;
        }

        let span = match (levels.first(), levels.last()) {
            (Some(lowest), Some(highest)) => [-highest, -lowest],
            _ => [0.0; 2],
        };

        FractionMatch {
            plane,
            center,
            volume,
            span,
            bracket_volumes: solution.bracket_volumes,
            flags,
        }
    }

    /// Finds the plane cutting `fraction` of the volume of `cell` whose below part has its
    /// centroid closest to `ref_center`.
    ///
    /// The optimization over the normal direction starts from `normal`. Fractions within the
    /// volume tolerance of 0 or 1 are matched with `normal` without optimization.
    pub fn optimize_centroid(
        &mut self,
        cell: usize,
        fraction: Real,
        ref_center: &Point<Real>,
        normal: &UnitVector<Real>,
    ) -> Result<CentroidMatch, MofError> {
        self.ensure_decomposed(cell)?;
        let (fraction, mut flags) = checked_fraction(cell, fraction)?;
        let tolerance = self.params.volume_epsilon;

        let mut evaluations = 0;
        let mut termination = None;
        let mut normal = *normal;

        if fraction > tolerance && fraction < 1.0 - tolerance {
            let (theta, phi) = utils::cartesian_to_spherical(&normal);
            let params = self.params.bfgs();
            let mut objective = CentroidObjective::new(self, fraction, *ref_center);
            let result = utils::bfgs_minimize(&mut objective, Angles::new(theta, phi), &params);

            evaluations = result.evaluations;
            termination = Some(result.termination);
            normal = Unit::new_normalize(utils::spherical_to_cartesian(result.x.x, result.x.y));

            if !result.converged() {
                log::debug!(
                    "cell {}: centroid optimization stopped with {:?} after {} evaluations",
                    cell,
                    result.termination,
                    result.evaluations
                );
                flags |= ReconstructionFlags::OPTIMIZE_INEXACT;
            }
        }

        let matched = self.match_fraction_decomposed(fraction, &normal, flags);
        let distance = matched
            .center
            .map(|center| na::distance(&center, ref_center))
            .unwrap_or(0.0);

        Ok(CentroidMatch {
            plane: matched.plane,
            center: matched.center,
            volume: matched.volume,
            distance,
            evaluations,
            termination,
            flags: matched.flags,
        })
    }

    /// Writes the section of the current cell by the last evaluated plane in the legacy VTK
    /// format.
    pub fn output_surface<W: Write>(&self, out: &mut W, title: &str) -> Result<(), MofError> {
        vtk::write_vtk_triangles(out, title, &self.all_tris)?;
        Ok(())
    }

    /// Writes the section of the current cell by the last evaluated plane to a legacy VTK file.
    pub fn output_surface_to_file(&self, path: impl AsRef<Path>) -> Result<(), MofError> {
        vtk::write_vtk_triangles_to_file(path, "Moment-of-Fluid interface", &self.all_tris)?;
        Ok(())
    }

    /// Writes a square patch of the plane through `center` with the given normal in the legacy
    /// VTK format.
    ///
    /// The patch is centered on `center` and its edges are twice the characteristic length of
    /// `cell`.
    pub fn output_plane<W: Write>(
        &self,
        out: &mut W,
        center: &Point<Real>,
        normal: &UnitVector<Real>,
        cell: usize,
    ) -> Result<(), MofError> {
        let quad = self.plane_patch(center, normal, cell)?;
        vtk::write_vtk_polygon(out, &format!("Plane of cell {}", cell), &quad)?;
        Ok(())
    }

    /// Writes a square patch of a plane to a legacy VTK file, see [`Self::output_plane`].
    pub fn output_plane_to_file(
        &self,
        path: impl AsRef<Path>,
        center: &Point<Real>,
        normal: &UnitVector<Real>,
        cell: usize,
    ) -> Result<(), MofError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.output_plane(&mut out, center, normal, cell)?;
        out.flush()?;
        Ok(())
    }

    fn plane_patch(
        &self,
        center: &Point<Real>,
        normal: &UnitVector<Real>,
        cell: usize,
    ) -> Result<[Point<Real>; 4], MofError> {
        let num_cells = self.mesh.num_cells();

        if cell >= num_cells {
            return Err(MofError::CellOutOfBounds { cell, num_cells });
        }

        let half = self.mesh.cell_volume(cell).abs().cbrt();
        let [t1, t2] = Plane::from_point_and_normal(center, *normal).tangent_basis();
        let (t1, t2) = (t1 * half, t2 * half);

        Ok([
            center - t1 - t2,
            center + t1 - t2,
            center + t1 + t2,
            center - t1 + t2,
        ])
    }

    fn volume_threshold(&self) -> Real {
        self.params.volume_epsilon * self.cell_volume
    }
}

/// Clamps `fraction` to `[0, 1]`, flagging out-of-range values.
pub(crate) fn checked_fraction(
    cell: usize,
    fraction: Real,
) -> Result<(Real, ReconstructionFlags), MofError> {
    if fraction.is_nan() {
        return Err(MofError::InvalidFraction { cell, fraction });
    }

    if (0.0..=1.0).contains(&fraction) {
        Ok((fraction, ReconstructionFlags::empty()))
    } else {
        log::warn!(
            "cell {}: volume fraction {} clamped to [0, 1]",
            cell,
            fraction
        );
        Ok((
            fraction.clamp(0.0, 1.0),
            ReconstructionFlags::FRACTION_CLAMPED,
        ))
    }
}
