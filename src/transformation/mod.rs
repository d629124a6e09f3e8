//! Decomposition of mesh cells and output of reconstructed surfaces.

pub use self::cell_decomposition::decompose_cell;

mod cell_decomposition;
pub mod vtk;
