use super::{MeshError, PolyMesh};
use crate::math::{Point, Real, Vector};
use crate::shape::Tetrahedron;

impl PolyMesh {
    /// Builds a single-cell mesh from a closed polyhedron.
    ///
    /// The face loops must be oriented so that their right-hand normals point outward.
    pub fn from_polyhedron(
        points: Vec<Point<Real>>,
        faces: Vec<Vec<usize>>,
    ) -> Result<PolyMesh, MeshError> {
        let owner = vec![0; faces.len()];
        let neighbour = vec![None; faces.len()];
        PolyMesh::new(points, faces, owner, neighbour)
    }

    /// Builds a single-cell mesh of the axis-aligned box with corners `mins` and `maxs`.
    pub fn hexahedron(mins: Point<Real>, maxs: Point<Real>) -> PolyMesh {
        PolyMesh::cartesian_block(mins, maxs - mins, [1, 1, 1])
    }

    /// Builds a single-cell mesh of the tetrahedron `(a, b, c, d)`, in any orientation.
    pub fn tetrahedron(a: Point<Real>, b: Point<Real>, c: Point<Real>, d: Point<Real>) -> PolyMesh {
        let mut faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 3, 2]];

        if Tetrahedron::new(a, b, c, d).signed_volume() < 0.0 {
            faces.iter_mut().for_each(|face| face.reverse());
        }

        PolyMesh::assemble(vec![a, b, c, d], faces, vec![0; 4], vec![None; 4], 1)
    }

    /// Builds a structured block of `counts[0] × counts[1] × counts[2]` hexahedral cells of size
    /// `cell_size`, starting at `origin`.
    ///
    /// Cell `(i, j, k)` has index `i + nx * (j + ny * k)`. Internal faces are owned by the cell
    /// with the lowest index.
    ///
    /// # Panics
    ///
    /// Panics if one of the counts is zero.
    pub fn cartesian_block(
        origin: Point<Real>,
        cell_size: Vector<Real>,
        counts: [usize; 3],
    ) -> PolyMesh {
        assert!(
            counts.iter().all(|n| *n > 0),
            "A cartesian block needs at least one cell along each axis."
        );

        let [nx, ny, nz] = counts;
        let point_id = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);
        let cell_id = |i: usize, j: usize, k: usize| i + nx * (j + ny * k);

        let mut points = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));

        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    let ijk = Vector::new(i as Real, j as Real, k as Real);
                    points.push(origin + ijk.component_mul(&cell_size));
                }
            }
        }

        let mut faces = Vec::new();
        let mut owner = Vec::new();
        let mut neighbour = Vec::new();

        // Adds the face whose loop has its normal along the increasing axis, separating the
        // cells `low` (before the face) and `high` (after it).
        let mut push_face = |face: Vec<usize>, low: Option<usize>, high: Option<usize>| {
            match (low, high) {
                (Some(low), high) => {
                    faces.push(face);
                    owner.push(low);
                    neighbour.push(high);
                }
                (None, Some(high)) => {
                    let mut face = face;
                    face.reverse();
                    faces.push(face);
                    owner.push(high);
                    neighbour.push(None);
                }
                (None, None) => {}
            }
        };

        // Faces normal to x.
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..=nx {
                    let face = vec![
                        point_id(i, j, k),
                        point_id(i, j + 1, k),
                        point_id(i, j + 1, k + 1),
                        point_id(i, j, k + 1),
                    ];
                    let low = (i > 0).then(|| cell_id(i - 1, j, k));
                    let high = (i < nx).then(|| cell_id(i, j, k));
                    push_face(face, low, high);
                }
            }
        }

        // Faces normal to y.
        for k in 0..nz {
            for j in 0..=ny {
                for i in 0..nx {
                    let face = vec![
                        point_id(i, j, k),
                        point_id(i, j, k + 1),
                        point_id(i + 1, j, k + 1),
                        point_id(i + 1, j, k),
                    ];
                    let low = (j > 0).then(|| cell_id(i, j - 1, k));
                    let high = (j < ny).then(|| cell_id(i, j, k));
                    push_face(face, low, high);
                }
            }
        }

        // Faces normal to z.
        for k in 0..=nz {
            for j in 0..ny {
                for i in 0..nx {
                    let face = vec![
                        point_id(i, j, k),
                        point_id(i + 1, j, k),
                        point_id(i + 1, j + 1, k),
                        point_id(i, j + 1, k),
                    ];
                    let low = (k > 0).then(|| cell_id(i, j, k - 1));
                    let high = (k < nz).then(|| cell_id(i, j, k));
                    push_face(face, low, high);
                }
            }
        }

        PolyMesh::assemble(points, faces, owner, neighbour, nx * ny * nz)
    }
}
