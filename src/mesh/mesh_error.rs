/// Inconsistencies detected in the addressing of a polyhedral mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// The face, owner and neighbour lists do not have the same length.
    #[error("the mesh has {faces} faces but {owners} owners and {neighbours} neighbours.")]
    AddressingLength {
        /// Number of faces.
        faces: usize,
        /// Number of face owners.
        owners: usize,
        /// Number of face neighbours.
        neighbours: usize,
    },
    /// A face references a vertex that does not exist.
    #[error("the face {face} references the missing vertex {vertex}.")]
    MissingVertex {
        /// The offending face.
        face: usize,
        /// The vertex index not found in the point list.
        vertex: usize,
    },
    /// A face has less than three vertices.
    #[error("the face {face} has only {num_vertices} vertices.")]
    DegenerateFace {
        /// The offending face.
        face: usize,
        /// Its number of vertices.
        num_vertices: usize,
    },
    /// A face has the same cell on both sides.
    #[error("the face {face} has the cell {cell} as both owner and neighbour.")]
    SelfNeighbour {
        /// The offending face.
        face: usize,
        /// The cell on both sides.
        cell: usize,
    },
    /// A cell lists a face that does not bound it.
    #[error("the face {face} is not adjacent to the cell {cell}.")]
    FaceNotAdjacent {
        /// The face listed by the cell.
        face: usize,
        /// The cell.
        cell: usize,
    },
    /// A cell has no face.
    #[error("the cell {0} has no face.")]
    EmptyCell(usize),
}
