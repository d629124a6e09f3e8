use crate::math::{Matrix2, Real, Vector2};
use crate::utils::{line_search, LineSearchParameters, LineSearchStatus};

/// A function of two variables that can be evaluated together with its gradient.
pub trait DifferentiableFunction {
    /// Evaluates the function and its gradient at `x`.
    fn eval(&mut self, x: &Vector2<Real>) -> (Real, Vector2<Real>);
}

/// Parameters of the BFGS minimizer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BfgsParameters {
    /// Convergence is declared once the gradient norm falls below this value.
    pub gradient_tolerance: Real,
    /// Convergence is declared once a step is shorter than this value.
    pub step_tolerance: Real,
    /// Maximum number of function evaluations.
    pub max_evaluations: usize,
    /// Upper bound of the length of a single step, `|alpha * dir|`.
    pub max_displacement: Real,
    /// Parameters of the line search performed at each iteration.
    pub line_search: LineSearchParameters,
}

impl Default for BfgsParameters {
    fn default() -> Self {
        Self {
            gradient_tolerance: 1.0e-8,
            step_tolerance: 1.0e-10,
            max_evaluations: 50,
            max_displacement: Real::INFINITY,
            line_search: LineSearchParameters::default(),
        }
    }
}

/// The reason why a BFGS minimization stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BfgsTermination {
    /// The gradient norm fell below the gradient tolerance.
    GradientTolerance,
    /// The last step was shorter than the step tolerance.
    StepTolerance,
    /// The function reached its known lower bound.
    LowerBound,
    /// The maximum number of evaluations was exceeded.
    MaxEvaluations,
    /// The line search could not find an acceptable step.
    LineSearchFailed,
}

/// The result of a BFGS minimization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BfgsResult {
    /// The best point found.
    pub x: Vector2<Real>,
    /// The function value at `x`.
    pub value: Real,
    /// The gradient at `x`.
    pub gradient: Vector2<Real>,
    /// Number of BFGS iterations performed.
    pub iterations: usize,
    /// Number of function evaluations performed.
    pub evaluations: usize,
    /// Why the minimization stopped.
    pub termination: BfgsTermination,
}

impl BfgsResult {
    /// Did the minimization stop because a convergence criterion was met?
    pub fn converged(&self) -> bool {
        matches!(
            self.termination,
            BfgsTermination::GradientTolerance
                | BfgsTermination::StepTolerance
                | BfgsTermination::LowerBound
        )
    }
}

/// Wraps a function to remember the best point it was evaluated at.
struct BestSeen<'a, F> {
    function: &'a mut F,
    best: Option<(Vector2<Real>, Real, Vector2<Real>)>,
}

impl<F: DifferentiableFunction> DifferentiableFunction for BestSeen<'_, F> {
    fn eval(&mut self, x: &Vector2<Real>) -> (Real, Vector2<Real>) {
        let (value, gradient) = self.function.eval(x);

        if value.is_finite() && self.best.map(|b| value < b.1).unwrap_or(true) {
            self.best = Some((*x, value, gradient));
        }

        (value, gradient)
    }
}

/// Minimizes `function` starting from `x0` with the Broyden-Fletcher-Goldfarb-Shanno
/// quasi-Newton method.
///
/// An approximation `H` of the inverse Hessian (initially the identity) gives the search
/// direction `-H g`; the step length is chosen by an inexact Wolfe line search. The update of
/// `H` is skipped whenever the curvature condition `s · y > 0` is not safely satisfied, which
/// keeps `H` positive-definite.
///
/// The returned point is the best one evaluated, even if the minimization did not converge.
pub fn bfgs_minimize(
    function: &mut impl DifferentiableFunction,
    x0: Vector2<Real>,
    params: &BfgsParameters,
) -> BfgsResult {
    let mut function = BestSeen {
        function,
        best: None,
    };
    let lower_bound = params.line_search.min_value;

    let mut evaluations = 1;
    let mut iterations = 0;
    let mut x = x0;
    let (mut f, mut g) = function.eval(&x);
    let mut h = Matrix2::identity();

    let termination = loop {
        if g.norm() <= params.gradient_tolerance {
            break BfgsTermination::GradientTolerance;
        }

        if f <= lower_bound {
            break BfgsTermination::LowerBound;
        }

        if evaluations >= params.max_evaluations {
            break BfgsTermination::MaxEvaluations;
        }

        let mut dir = -(h * g);
        let mut df0 = g.dot(&dir);

        if df0 >= 0.0 {
            // Lost descent, restart from steepest descent.
            h = Matrix2::identity();
            dir = -g;
            df0 = -g.norm_squared();
        }

        let alpha_max = params
            .line_search
            .max_step
            .min(params.max_displacement / dir.norm());
        let ls_params = LineSearchParameters {
            max_step: alpha_max,
            ..params.line_search
        };
        let alpha_init = params.line_search.initial_step.min(alpha_max);

        let outcome = line_search(
            &mut function,
            &x,
            &dir,
            f,
            df0,
            alpha_init,
            &ls_params,
            &mut evaluations,
        );
        iterations += 1;

        if outcome.alpha == 0.0 {
            break BfgsTermination::LineSearchFailed;
        }

        let s = dir * outcome.alpha;
        let y = outcome.gradient - g;
        x += s;
        f = outcome.value;
        g = outcome.gradient;

        if outcome.status == LineSearchStatus::Failed {
            break BfgsTermination::LineSearchFailed;
        }

        if s.norm() <= params.step_tolerance {
            break BfgsTermination::StepTolerance;
        }

        let sy = s.dot(&y);

        if sy > Real::EPSILON * s.norm() * y.norm() {
            if iterations == 1 {
                // Rescale the initial approximation before the first update.
                h *= sy / y.norm_squared();
            }

            let rho = 1.0 / sy;
            let left = Matrix2::identity() - s * y.transpose() * rho;
            let right = Matrix2::identity() - y * s.transpose() * rho;
            h = left * h * right + s * s.transpose() * rho;
        }
    };

    let (x, value, gradient) = function.best.unwrap_or((x, f, g));

    BfgsResult {
        x,
        value,
        gradient,
        iterations,
        evaluations,
        termination,
    }
}
