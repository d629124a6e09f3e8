//! Various unsorted geometrical and numerical operators.

pub use self::bfgs::{
    bfgs_minimize, BfgsParameters, BfgsResult, BfgsTermination, DifferentiableFunction,
};
pub use self::center::center;
pub use self::cubic::{Cubic, RootEstimate};
pub use self::line_search::{
    line_search, minimize_interpolant, LineSearchOutcome, LineSearchParameters, LineSearchStatus,
};
pub use self::spherical::{cartesian_to_spherical, spherical_to_cartesian};

mod bfgs;
mod center;
mod cubic;
mod line_search;
mod spherical;
