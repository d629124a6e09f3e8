use crate::math::Real;
use crate::utils::{BfgsParameters, LineSearchParameters};

/// Parameters of the Moment-of-Fluid reconstruction.
///
/// Tolerances on lengths and volumes are relative: they are scaled by the characteristic length
/// `V_cell^(1/3)` and by the volume `V_cell` of the cell being reconstructed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MofParameters {
    /// Relative tolerance under which a signed distance to the cutting plane counts as zero.
    pub geom_epsilon: Real,
    /// Relative tolerance on the volume matched by the cutting plane.
    pub volume_epsilon: Real,
    /// The optimizer stops once the norm of the objective gradient falls below this value.
    ///
    /// The objective is the squared centroid distance divided by the squared cell size, so this
    /// tolerance is non-dimensional.
    pub gradient_tolerance: Real,
    /// The optimizer stops once a step in `(theta, phi)` is shorter than this value.
    pub step_tolerance: Real,
    /// Maximum number of objective evaluations of the optimizer.
    pub max_evaluations: usize,
    /// The sufficient-decrease parameter of the line search.
    pub sufficient_decrease: Real,
    /// The curvature parameter of the line search.
    pub curvature: Real,
    /// The first step length tried by the line search.
    pub initial_step: Real,
    /// The largest step length of the line search.
    pub max_step: Real,
    /// Maximum number of iterations of the offset solver.
    pub max_offset_iterations: usize,
    /// Maximum number of trial steps of each phase of the line search.
    pub max_line_search_iterations: usize,
    /// Whether the batch reconstruction collects the triangulated interface of every cell.
    pub collect_surface: bool,
}

impl Default for MofParameters {
    fn default() -> Self {
        Self {
            geom_epsilon: 1.0e-12,
            volume_epsilon: 1.0e-10,
            gradient_tolerance: 1.0e-8,
            step_tolerance: 1.0e-10,
            max_evaluations: 50,
            sufficient_decrease: 1.0e-4,
            curvature: 0.9,
            initial_step: 1.0,
            max_step: 10.0,
            max_offset_iterations: 100,
            max_line_search_iterations: 30,
            collect_surface: true,
        }
    }
}

impl MofParameters {
    /// The parameters of the BFGS optimizer over the normal angles.
    ///
    /// The objective is a squared distance, hence bounded below by zero.
    pub fn bfgs(&self) -> BfgsParameters {
        BfgsParameters {
            gradient_tolerance: self.gradient_tolerance,
            step_tolerance: self.step_tolerance,
            max_evaluations: self.max_evaluations,
            // Angles beyond a half-turn wrap around.
            max_displacement: core::f64::consts::PI,
            line_search: LineSearchParameters {
                sufficient_decrease: self.sufficient_decrease,
                curvature: self.curvature,
                initial_step: self.initial_step,
                max_step: self.max_step,
                min_value: 0.0,
                max_iterations: self.max_line_search_iterations,
            },
        }
    }
}
