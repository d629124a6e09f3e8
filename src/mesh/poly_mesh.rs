use super::{CellMesh, MeshError};
use crate::math::{Point, Real, Vector};
use crate::shape::Tetrahedron;
use crate::utils;
use smallvec::SmallVec;

/// The vertex loop of a face. Most faces of practical meshes are triangles or quads.
pub(crate) type FaceLoop = SmallVec<[usize; 4]>;

/// A polyhedral mesh with owner/neighbour face addressing.
///
/// Each face is stored once with its vertex loop oriented outward for its owner cell. Internal
/// faces also have a neighbour cell, for which the loop is inward. Face and cell centroids and
/// cell volumes are computed on construction.
#[derive(Clone, Debug)]
pub struct PolyMesh {
    points: Vec<Point<Real>>,
    faces: Vec<FaceLoop>,
    owner: Vec<usize>,
    neighbour: Vec<Option<usize>>,
    cells: Vec<Vec<usize>>,
    face_centers: Vec<Point<Real>>,
    cell_centers: Vec<Point<Real>>,
    cell_volumes: Vec<Real>,
}

impl PolyMesh {
    /// Builds a mesh from its points, face vertex loops and face addressing.
    ///
    /// The number of cells is deduced from the largest cell index referenced by `owner` and
    /// `neighbour`.
    pub fn new(
        points: Vec<Point<Real>>,
        faces: Vec<Vec<usize>>,
        owner: Vec<usize>,
        neighbour: Vec<Option<usize>>,
    ) -> Result<Self, MeshError> {
        if faces.len() != owner.len() || faces.len() != neighbour.len() {
            return Err(MeshError::AddressingLength {
                faces: faces.len(),
                owners: owner.len(),
                neighbours: neighbour.len(),
            });
        }

        for (fid, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face: fid,
                    num_vertices: face.len(),
                });
            }

            if let Some(&vertex) = face.iter().find(|&&v| v >= points.len()) {
                return Err(MeshError::MissingVertex { face: fid, vertex });
            }

            if neighbour[fid] == Some(owner[fid]) {
                return Err(MeshError::SelfNeighbour {
                    face: fid,
                    cell: owner[fid],
                });
            }
        }

        let num_cells = owner
            .iter()
            .copied()
            .chain(neighbour.iter().flatten().copied())
            .max()
            .map(|c| c + 1)
            .unwrap_or(0);

        let mut bounded = vec![false; num_cells];

        for cell in owner.iter().chain(neighbour.iter().flatten()) {
            bounded[*cell] = true;
        }

        if let Some(cell) = bounded.iter().position(|b| !*b) {
            return Err(MeshError::EmptyCell(cell));
        }

        Ok(Self::assemble(points, faces, owner, neighbour, num_cells))
    }

    /// Builds the cell addressing and geometry of already validated face data.
    pub(crate) fn assemble(
        points: Vec<Point<Real>>,
        faces: Vec<Vec<usize>>,
        owner: Vec<usize>,
        neighbour: Vec<Option<usize>>,
        num_cells: usize,
    ) -> Self {
        let mut cells = vec![Vec::new(); num_cells];

        for (fid, (&own, nbr)) in owner.iter().zip(neighbour.iter()).enumerate() {
            cells[own].push(fid);

            if let Some(nbr) = *nbr {
                cells[nbr].push(fid);
            }
        }

        let faces: Vec<FaceLoop> = faces.into_iter().map(FaceLoop::from_vec).collect();
        let face_centers = faces
            .iter()
            .map(|face| polygon_center(&points, face))
            .collect();

        let mut result = PolyMesh {
            points,
            faces,
            owner,
            neighbour,
            cells,
            face_centers,
            cell_centers: Vec::new(),
            cell_volumes: Vec::new(),
        };

        let (cell_volumes, cell_centers): (Vec<_>, Vec<_>) = (0..num_cells)
            .map(|cell| result.cell_volume_and_center(cell))
            .unzip();
        result.cell_volumes = cell_volumes;
        result.cell_centers = cell_centers;
        result
    }

    /// The number of faces of this mesh.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    // Pyramid decomposition around the mean of the face centroids.
    fn cell_volume_and_center(&self, cell: usize) -> (Real, Point<Real>) {
        let face_centers: SmallVec<[Point<Real>; 8]> = self.cells[cell]
            .iter()
            .map(|&fid| self.face_centers[fid])
            .collect();
        let apex = utils::center(&face_centers);

        let mut volume = 0.0;
        let mut weighted = Vector::zeros();

        for (&fid, fc) in self.cells[cell].iter().zip(face_centers.iter()) {
            let outward = self.owner[fid] == cell;
            let face = &self.faces[fid];

            for i in 0..face.len() {
                let (mut a, mut b) = (face[i], face[(i + 1) % face.len()]);

                if !outward {
                    core::mem::swap(&mut a, &mut b);
                }

                let tet = Tetrahedron::new(apex, *fc, self.points[a], self.points[b]);
                let vol = tet.signed_volume();
                volume += vol;
                weighted += tet.center().coords * vol;
            }
        }

        if volume == 0.0 {
            (0.0, apex)
        } else {
            (volume, Point::from(weighted / volume))
        }
    }
}

/// The area-weighted centroid of a possibly non-planar polygon, from the triangle fan around
/// the mean of its vertices.
fn polygon_center(points: &[Point<Real>], face: &[usize]) -> Point<Real> {
    let vertices: SmallVec<[Point<Real>; 4]> = face.iter().map(|&v| points[v]).collect();
    let mean = utils::center(&vertices);
    let mut normal = Vector::zeros();
    let mut fan = SmallVec::<[(Vector<Real>, Point<Real>); 4]>::new();

    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        let scaled_normal = (a - mean).cross(&(b - mean));
        normal += scaled_normal;
        fan.push((scaled_normal, utils::center(&[mean, a, b])));
    }

    let norm2 = normal.norm_squared();

    if norm2 == 0.0 {
        return mean;
    }

    // Areas are projected on the mean normal so that warped faces keep positive weights.
    let mut total = 0.0;
    let mut weighted = Vector::zeros();

    for (scaled_normal, center) in &fan {
        let area = scaled_normal.dot(&normal) / norm2.sqrt();
        total += area;
        weighted += center.coords * area;
    }

    if total == 0.0 {
        mean
    } else {
        Point::from(weighted / total)
    }
}

impl CellMesh for PolyMesh {
    fn num_cells(&self) -> usize {
        self.cells.len()
    }

    fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    fn cell_faces(&self, cell: usize) -> &[usize] {
        &self.cells[cell]
    }

    fn cell_center(&self, cell: usize) -> Point<Real> {
        self.cell_centers[cell]
    }

    fn cell_volume(&self, cell: usize) -> Real {
        self.cell_volumes[cell]
    }

    fn face_vertices(&self, face: usize) -> &[usize] {
        &self.faces[face]
    }

    fn face_center(&self, face: usize) -> Point<Real> {
        self.face_centers[face]
    }

    fn face_owner(&self, face: usize) -> usize {
        self.owner[face]
    }

    fn face_neighbour(&self, face: usize) -> Option<usize> {
        self.neighbour[face]
    }
}
