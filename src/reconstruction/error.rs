use crate::math::Real;
use crate::mesh::MeshError;

/// Errors preventing the reconstruction of the interface in a cell.
#[derive(thiserror::Error, Debug)]
pub enum MofError {
    /// The cell has a zero or negative volume.
    #[error("the cell {cell} is degenerate (volume: {volume}).")]
    DegenerateCell {
        /// The degenerate cell.
        cell: usize,
        /// Its volume, as computed from its tetrahedral decomposition.
        volume: Real,
    },
    /// The mesh addressing is inconsistent.
    #[error("invalid mesh: {0}")]
    MeshInvalid(#[from] MeshError),
    /// The cell index is not smaller than the number of cells.
    #[error("the cell {cell} does not exist (the mesh has {num_cells} cells).")]
    CellOutOfBounds {
        /// The requested cell.
        cell: usize,
        /// The number of cells of the mesh.
        num_cells: usize,
    },
    /// The volume fraction is not a number.
    #[error("the volume fraction {fraction} of the cell {cell} is not a number.")]
    InvalidFraction {
        /// The cell.
        cell: usize,
        /// The offending fraction.
        fraction: Real,
    },
    /// A per-cell input array does not have one entry per cell.
    #[error("expected {expected} per-cell values, found {found}.")]
    InputLength {
        /// The number of cells of the mesh.
        expected: usize,
        /// The length of the input.
        found: usize,
    },
    /// Writing the reconstructed surface failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Non-fatal conditions met while reconstructing the interface in a cell.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ReconstructionFlags(u8);

bitflags::bitflags! {
    impl ReconstructionFlags: u8 {
        /// The volume fraction was outside of `[0, 1]` and has been clamped.
        const FRACTION_CLAMPED = 1;
        /// The offset solver stopped before reaching the volume tolerance.
        const OFFSET_INEXACT = 1 << 1;
        /// The centroid optimizer stopped before converging. The returned plane is the best one
        /// found and still matches the volume fraction.
        const OPTIMIZE_INEXACT = 1 << 2;
    }
}
