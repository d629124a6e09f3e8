//! Read-only access to polyhedral meshes.

pub use self::mesh_error::MeshError;
pub use self::poly_mesh::PolyMesh;

use crate::math::{Point, Real, Vector};

mod mesh_error;
mod poly_mesh;
mod poly_mesh_builders;

/// Read access to the cells, faces and points of a polyhedral mesh.
///
/// Faces are stored once and shared by their owner and (for internal faces) neighbour cell.
/// The vertex loop of a face is ordered so that its right-hand normal points out of the owner
/// cell, into the neighbour.
pub trait CellMesh {
    /// The number of cells.
    fn num_cells(&self) -> usize;

    /// The point coordinates referenced by the face vertex loops.
    fn points(&self) -> &[Point<Real>];

    /// The faces bounding the given cell.
    fn cell_faces(&self, cell: usize) -> &[usize];

    /// The centroid of the given cell.
    fn cell_center(&self, cell: usize) -> Point<Real>;

    /// The volume of the given cell.
    fn cell_volume(&self, cell: usize) -> Real;

    /// The vertex loop of the given face, oriented outward wrt. its owner.
    fn face_vertices(&self, face: usize) -> &[usize];

    /// The centroid of the given face.
    fn face_center(&self, face: usize) -> Point<Real>;

    /// The cell owning the given face.
    fn face_owner(&self, face: usize) -> usize;

    /// The cell on the other side of the given face, or `None` for a boundary face.
    fn face_neighbour(&self, face: usize) -> Option<usize>;

    /// Whether the vertex loop of `face` is outward (`true`) or inward (`false`) for `cell`.
    ///
    /// Returns `None` if `face` does not bound `cell`.
    fn face_orientation(&self, face: usize, cell: usize) -> Option<bool> {
        if self.face_owner(face) == cell {
            Some(true)
        } else if self.face_neighbour(face) == Some(cell) {
            Some(false)
        } else {
            None
        }
    }

    /// The area-weighted normal of the given face, oriented outward wrt. its owner.
    ///
    /// Computed from the triangle fan around the face centroid, so non-planar faces are
    /// supported. Missing vertices are ignored.
    fn face_area_vector(&self, face: usize) -> Vector<Real> {
        let points = self.points();
        let center = self.face_center(face);
        let loop_ = self.face_vertices(face);
        let mut area = Vector::zeros();

        for (i, &vid) in loop_.iter().enumerate() {
            let next = loop_[(i + 1) % loop_.len()];

            if let (Some(a), Some(b)) = (points.get(vid), points.get(next)) {
                area += (a - center).cross(&(b - center)) * 0.5;
            }
        }

        area
    }
}
