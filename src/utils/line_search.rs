// "Practical Methods of Optimization", 2nd edition, §2.6
// R. Fletcher
use crate::math::{Real, Vector2};
use crate::utils::DifferentiableFunction;

/// Parameters of the inexact line search.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct LineSearchParameters {
    /// The sufficient-decrease (Armijo) parameter `ρ ∈ (0, 0.5)`.
    pub sufficient_decrease: Real,
    /// The curvature parameter `σ ∈ (ρ, 1)`.
    pub curvature: Real,
    /// The step length tried first.
    pub initial_step: Real,
    /// The largest step length allowed.
    pub max_step: Real,
    /// A lower bound of the function, used to bound the step length.
    pub min_value: Real,
    /// Maximum number of trial steps, for each of the bracketing and sectioning phases.
    pub max_iterations: usize,
}

impl Default for LineSearchParameters {
    fn default() -> Self {
        Self {
            sufficient_decrease: 1.0e-4,
            curvature: 0.9,
            initial_step: 1.0,
            max_step: 10.0,
            min_value: Real::NEG_INFINITY,
            max_iterations: 30,
        }
    }
}

/// How a line search terminated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineSearchStatus {
    /// The step satisfies the strong Wolfe conditions (or reached the function lower bound).
    Success,
    /// The maximum step length was reached while the function was still decreasing.
    MaxStep,
    /// No acceptable step was found.
    Failed,
}

/// The step selected by a line search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineSearchOutcome {
    /// The selected step length.
    pub alpha: Real,
    /// The function value at `x + alpha * dir`.
    pub value: Real,
    /// The gradient at `x + alpha * dir`.
    pub gradient: Vector2<Real>,
    /// How the line search terminated.
    pub status: LineSearchStatus,
}

// Interpolated steps stay at least this fraction of the bracket away from its ends.
const SECTION_SAFEGUARD: Real = 0.1;
// Largest extrapolation factor of the bracketing phase.
const EXTRAPOLATION_LIMIT: Real = 9.0;

/// Finds the minimizer on `[min(end_a, end_b), max(end_a, end_b)]` of the cubic interpolating
/// the values and slopes `(f1, df1)` at `alpha1` and `(f2, df2)` at `alpha2`.
///
/// Falls back to the quadratic interpolating `(f1, df1, f2)` when the cubic term vanishes.
pub fn minimize_interpolant(
    end_a: Real,
    end_b: Real,
    alpha1: Real,
    alpha2: Real,
    f1: Real,
    df1: Real,
    f2: Real,
    df2: Real,
) -> Real {
    let (lo, hi) = if end_a <= end_b {
        (end_a, end_b)
    } else {
        (end_b, end_a)
    };
    let width = alpha2 - alpha1;

    if width == 0.0 {
        return 0.5 * (lo + hi);
    }

    // Hermite cubic c(z) = f1 + d1 z + eta z² + xi z³ on alpha = alpha1 + z * width.
    let d1 = df1 * width;
    let d2 = df2 * width;
    let eta = 3.0 * (f2 - f1) - 2.0 * d1 - d2;
    let xi = d1 + d2 - 2.0 * (f2 - f1);
    let c = |z: Real| f1 + z * (d1 + z * (eta + z * xi));

    let z_a = (lo - alpha1) / width;
    let z_b = (hi - alpha1) / width;
    let (z_lo, z_hi) = if z_a <= z_b { (z_a, z_b) } else { (z_b, z_a) };

    let mut best_z = z_lo;
    let mut best_c = c(z_lo);

    let mut consider = |z: Real| {
        if z > z_lo && z < z_hi {
            let cz = c(z);
            if cz < best_c {
                best_z = z;
                best_c = cz;
            }
        }
    };

    // Stationary points of c: d1 + 2 eta z + 3 xi z² = 0.
    if relative_eq!(xi, 0.0, epsilon = Real::EPSILON * (d1.abs() + eta.abs() + 1.0)) {
        if eta > 0.0 {
            consider(-d1 / (2.0 * eta));
        }
    } else {
        let disc = eta * eta - 3.0 * xi * d1;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            consider((-eta + sq) / (3.0 * xi));
            consider((-eta - sq) / (3.0 * xi));
        }
    }

    if z_hi > z_lo && c(z_hi) < best_c {
        best_z = z_hi;
    }

    alpha1 + best_z * width
}

/// Inexact line search along `dir` from `x`, enforcing the strong Wolfe conditions.
///
/// `f0` and `df0` are the function value and directional derivative at `x`; `df0` must be
/// negative. Every call to `function` increments `evaluations`.
pub fn line_search(
    function: &mut impl DifferentiableFunction,
    x: &Vector2<Real>,
    dir: &Vector2<Real>,
    f0: Real,
    df0: Real,
    alpha_init: Real,
    params: &LineSearchParameters,
    evaluations: &mut usize,
) -> LineSearchOutcome {
    let rho = params.sufficient_decrease;
    let sigma = params.curvature;

    let mut probe = |alpha: Real, evaluations: &mut usize| {
        *evaluations += 1;
        let (value, gradient) = function.eval(&(x + dir * alpha));
        (value, gradient.dot(dir), gradient)
    };

    // Largest step worth trying: beyond it, the sufficient-decrease line falls below `min_value`.
    let mu = if df0 < 0.0 && params.min_value.is_finite() {
        ((params.min_value - f0) / (rho * df0)).min(params.max_step)
    } else {
        params.max_step
    };

    let mut alpha_prev = 0.0;
    let mut f_prev = f0;
    let mut df_prev = df0;
    let mut alpha = alpha_init.min(mu);

    // Bracketing phase.
    let mut bracket = None;
    let mut last = None;
    let mut g_prev = None;
    // Gradient at the `a` end of the bracket, if it was evaluated.
    let mut a_gradient = None;

    for i in 0..params.max_iterations {
        let (f, df, gradient) = probe(alpha, evaluations);
        last = Some((alpha, f, gradient));

        if f <= params.min_value {
            return LineSearchOutcome::new(alpha, f, gradient, LineSearchStatus::Success);
        }

        if f > f0 + rho * alpha * df0 || (i > 0 && f >= f_prev) {
            bracket = Some(Bracket::new(alpha_prev, f_prev, df_prev, alpha, f, df));
            a_gradient = g_prev;
            break;
        }

        if df.abs() <= -sigma * df0 {
            return LineSearchOutcome::new(alpha, f, gradient, LineSearchStatus::Success);
        }

        if df >= 0.0 {
            bracket = Some(Bracket::new(alpha, f, df, alpha_prev, f_prev, df_prev));
            a_gradient = Some(gradient);
            break;
        }

        if alpha >= mu {
            return LineSearchOutcome::new(alpha, f, gradient, LineSearchStatus::MaxStep);
        }

        let next = if mu <= 2.0 * alpha - alpha_prev {
            mu
        } else {
            let lo = 2.0 * alpha - alpha_prev;
            let hi = mu.min(alpha + EXTRAPOLATION_LIMIT * (alpha - alpha_prev));
            minimize_interpolant(lo, hi, alpha_prev, alpha, f_prev, df_prev, f, df)
        };

        alpha_prev = alpha;
        f_prev = f;
        df_prev = df;
        g_prev = Some(gradient);
        alpha = next;
    }

    let Some(mut bracket) = bracket else {
        // Ran out of iterations while extrapolating: the last step still decreased `f`.
        return match last {
            Some((alpha, f, gradient)) => {
                LineSearchOutcome::new(alpha, f, gradient, LineSearchStatus::MaxStep)
            }
            None => LineSearchOutcome::new(0.0, f0, Vector2::zeros(), LineSearchStatus::Failed),
        };
    };

    // Sectioning phase. `bracket.a` always satisfies the sufficient-decrease condition
    // and has the lowest value found so far.
    for _ in 0..params.max_iterations {
        let width = bracket.b - bracket.a;

        if (width * dir.norm()).abs() <= Real::EPSILON * (1.0 + bracket.a.abs() * dir.norm()) {
            break;
        }

        let alpha = minimize_interpolant(
            bracket.a + SECTION_SAFEGUARD * width,
            bracket.b - SECTION_SAFEGUARD * width,
            bracket.a,
            bracket.b,
            bracket.fa,
            bracket.dfa,
            bracket.fb,
            bracket.dfb,
        );
        let (f, df, gradient) = probe(alpha, evaluations);

        if f <= params.min_value {
            return LineSearchOutcome::new(alpha, f, gradient, LineSearchStatus::Success);
        }

        if f > f0 + rho * alpha * df0 || f >= bracket.fa {
            bracket.b = alpha;
            bracket.fb = f;
            bracket.dfb = df;
        } else {
            if df.abs() <= -sigma * df0 {
                return LineSearchOutcome::new(alpha, f, gradient, LineSearchStatus::Success);
            }

            if (bracket.b - bracket.a) * df >= 0.0 {
                bracket.b = bracket.a;
                bracket.fb = bracket.fa;
                bracket.dfb = bracket.dfa;
            }

            bracket.a = alpha;
            bracket.fa = f;
            bracket.dfa = df;
            a_gradient = Some(gradient);
        }
    }

    // The curvature condition could not be met. Report the best point found so the caller
    // can still use the decrease achieved.
    match a_gradient {
        Some(gradient) if bracket.a > 0.0 && bracket.fa < f0 => {
            LineSearchOutcome::new(bracket.a, bracket.fa, gradient, LineSearchStatus::Failed)
        }
        _ => LineSearchOutcome::new(0.0, f0, Vector2::zeros(), LineSearchStatus::Failed),
    }
}

struct Bracket {
    a: Real,
    fa: Real,
    dfa: Real,
    b: Real,
    fb: Real,
    dfb: Real,
}

impl Bracket {
    fn new(a: Real, fa: Real, dfa: Real, b: Real, fb: Real, dfb: Real) -> Self {
        Bracket {
            a,
            fa,
            dfa,
            b,
            fb,
            dfb,
        }
    }
}

impl LineSearchOutcome {
    fn new(alpha: Real, value: Real, gradient: Vector2<Real>, status: LineSearchStatus) -> Self {
        LineSearchOutcome {
            alpha,
            value,
            gradient,
            status,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{line_search, minimize_interpolant, LineSearchParameters, LineSearchStatus};
    use crate::math::{Real, Vector2};
    use crate::utils::DifferentiableFunction;

    struct Quadratic;

    impl DifferentiableFunction for Quadratic {
        fn eval(&mut self, x: &Vector2<Real>) -> (Real, Vector2<Real>) {
            let d = x - Vector2::new(1.0, -2.0);
            (d.norm_squared(), d * 2.0)
        }
    }

    #[test]
    fn interpolant_of_quadratic_is_exact() {
        // f(a) = (a - 0.3)², sampled at 0 and 1.
        let f = |a: Real| (a - 0.3) * (a - 0.3);
        let df = |a: Real| 2.0 * (a - 0.3);
        let alpha = minimize_interpolant(0.0, 1.0, 0.0, 1.0, f(0.0), df(0.0), f(1.0), df(1.0));
        assert_relative_eq!(alpha, 0.3, epsilon = 1.0e-12);

        // Restricted interval: the minimizer is clamped to the closest end.
        let alpha = minimize_interpolant(0.5, 0.9, 0.0, 1.0, f(0.0), df(0.0), f(1.0), df(1.0));
        assert_relative_eq!(alpha, 0.5, epsilon = 1.0e-12);
    }

    #[test]
    fn wolfe_step_on_quadratic() {
        let params = LineSearchParameters::default();
        let x = Vector2::zeros();
        let (f0, g0) = Quadratic.eval(&x);
        let dir = -g0;
        let df0 = g0.dot(&dir);
        let mut evaluations = 0;

        let outcome = line_search(&mut Quadratic, &x, &dir, f0, df0, 1.0, &params, &mut evaluations);

        assert_eq!(outcome.status, LineSearchStatus::Success);
        assert!(outcome.value <= f0 + params.sufficient_decrease * outcome.alpha * df0);
        assert!(outcome.gradient.dot(&dir).abs() <= -params.curvature * df0);
        assert!(evaluations >= 1);
    }

    #[test]
    fn step_bounded_by_max_step() {
        let params = LineSearchParameters {
            max_step: 0.01,
            ..LineSearchParameters::default()
        };
        let x = Vector2::zeros();
        let (f0, g0) = Quadratic.eval(&x);
        let dir = -g0;
        let mut evaluations = 0;

        let outcome = line_search(
            &mut Quadratic,
            &x,
            &dir,
            f0,
            g0.dot(&dir),
            1.0,
            &params,
            &mut evaluations,
        );

        assert_eq!(outcome.status, LineSearchStatus::MaxStep);
        assert_relative_eq!(outcome.alpha, 0.01);
        assert!(outcome.value < f0);
    }

    // The gradient of |x|² with its sign flipped: every reported descent direction ascends.
    struct ReversedGradient;

    impl DifferentiableFunction for ReversedGradient {
        fn eval(&mut self, x: &Vector2<Real>) -> (Real, Vector2<Real>) {
            (x.norm_squared(), x * -2.0)
        }
    }

    // Minimum at x = 0.3, but the reported slope never vanishes.
    struct ConstantSlope;

    impl DifferentiableFunction for ConstantSlope {
        fn eval(&mut self, x: &Vector2<Real>) -> (Real, Vector2<Real>) {
            let value = (x.x - 0.3) * (x.x - 0.3) + x.y * x.y;
            (value, Vector2::new(-1.0, 0.0))
        }
    }

    #[test]
    fn no_decrease_along_direction() {
        let params = LineSearchParameters::default();
        let x = Vector2::new(1.0, 0.5);
        let (f0, g0) = ReversedGradient.eval(&x);
        let dir = -g0;
        let mut evaluations = 0;

        let outcome = line_search(
            &mut ReversedGradient,
            &x,
            &dir,
            f0,
            g0.dot(&dir),
            1.0,
            &params,
            &mut evaluations,
        );

        assert_eq!(outcome.status, LineSearchStatus::Failed);
        assert_eq!(outcome.alpha, 0.0);
        assert_eq!(outcome.value, f0);
        assert!(evaluations > 1);
    }

    #[test]
    fn failed_search_keeps_best_decrease() {
        let params = LineSearchParameters::default();
        let x = Vector2::zeros();
        let dir = Vector2::new(1.0, 0.0);
        let (f0, g0) = ConstantSlope.eval(&x);
        let mut evaluations = 0;

        let outcome = line_search(
            &mut ConstantSlope,
            &x,
            &dir,
            f0,
            g0.dot(&dir),
            1.0,
            &params,
            &mut evaluations,
        );

        // The curvature condition never holds, but the step still decreases the function.
        assert_eq!(outcome.status, LineSearchStatus::Failed);
        assert!(outcome.alpha > 0.0);
        assert!(outcome.value <= f0 + params.sufficient_decrease * outcome.alpha * g0.dot(&dir));
        assert_relative_eq!(outcome.value, (outcome.alpha - 0.3) * (outcome.alpha - 0.3));
        assert_eq!(outcome.gradient, Vector2::new(-1.0, 0.0));
    }
}
