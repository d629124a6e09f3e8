//! Moment-of-Fluid reconstruction of planar interfaces.
//!
//! In each cell, the interface is the plane that cuts the prescribed volume fraction of the
//! cell and whose material side has a centroid as close as possible to a reference centroid.
//! The material lies below the plane, i.e., on the side opposite to its normal.

pub use self::batch::{
    fraction_gradient, seed_normal, CellInterface, InterfaceReconstruction,
};
#[cfg(feature = "parallel")]
pub use self::batch::par_construct_interface;
pub use self::error::{MofError, ReconstructionFlags};
pub use self::moment_of_fluid::{CentroidMatch, FractionMatch, MomentOfFluid};
pub use self::offset_solver::{breakpoint_levels, LevelSolution, LevelSolver};
pub use self::parameters::MofParameters;

mod batch;
mod centroid_objective;
mod error;
mod moment_of_fluid;
mod offset_solver;
mod parameters;
