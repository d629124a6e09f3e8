use crate::math::{Point, Real};
use crate::mesh::{CellMesh, MeshError};
use crate::shape::Tetrahedron;

/// Decomposes a cell of `mesh` into tetrahedra around `apex` (the cell centroid by default).
///
/// Each face is fanned around its centroid and every edge of the fan forms the tetrahedron
/// `(apex, face_center, edge_start, edge_end)`, with the face loop oriented outward for `cell`.
/// Those tetrahedra all have a non-negative signed volume when the cell is star-shaped wrt.
/// `apex` and its faces are star-shaped wrt. their centroids. Their signed volumes always sum
/// to the cell volume.
///
/// The tetrahedra are appended to `out` in face order, then edge order.
pub fn decompose_cell<M: CellMesh + ?Sized>(
    mesh: &M,
    cell: usize,
    apex: Option<Point<Real>>,
    out: &mut Vec<Tetrahedron>,
) -> Result<(), MeshError> {
    let faces = mesh.cell_faces(cell);

    if faces.is_empty() {
        return Err(MeshError::EmptyCell(cell));
    }

    let apex = apex.unwrap_or_else(|| mesh.cell_center(cell));
    let points = mesh.points();

    for &face in faces {
        let outward = mesh
            .face_orientation(face, cell)
            .ok_or(MeshError::FaceNotAdjacent { face, cell })?;
        let vertices = mesh.face_vertices(face);

        if vertices.len() < 3 {
            return Err(MeshError::DegenerateFace {
                face,
                num_vertices: vertices.len(),
            });
        }

        let center = mesh.face_center(face);
        let vertex = |vid: usize| {
            points
                .get(vid)
                .copied()
                .ok_or(MeshError::MissingVertex { face, vertex: vid })
        };

        for i in 0..vertices.len() {
            let a = vertex(vertices[i])?;
            let b = vertex(vertices[(i + 1) % vertices.len()])?;

            if outward {
                out.push(Tetrahedron::new(apex, center, a, b));
            } else {
                out.push(Tetrahedron::new(apex, center, b, a));
            }
        }
    }

    Ok(())
}
