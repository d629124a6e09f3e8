use crate::math::Real;
use na::{Matrix4, Vector4};

/// A cubic polynomial `c[0] x³ + c[1] x² + c[2] x + c[3]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cubic {
    /// The coefficients, from the highest degree to the constant term.
    pub coeffs: [Real; 4],
}

/// The result of a bracketed root search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootEstimate {
    /// The best root estimate found.
    pub root: Real,
    /// The value of the function at `root`.
    pub residual: Real,
    /// Whether `|residual|` reached the requested tolerance.
    pub converged: bool,
}

impl Cubic {
    /// Creates a cubic from its coefficients, highest degree first.
    #[inline]
    pub fn new(coeffs: [Real; 4]) -> Self {
        Cubic { coeffs }
    }

    /// Computes the unique cubic passing through the four given samples `(x, y)`.
    ///
    /// Returns `None` if the abscissae are not pairwise distinct.
    pub fn interpolate(samples: &[(Real, Real); 4]) -> Option<Self> {
        let vandermonde = Matrix4::from_fn(|i, j| samples[i].0.powi(3 - j as i32));
        let rhs = Vector4::from_fn(|i, _| samples[i].1);
        let c = vandermonde.lu().solve(&rhs)?;
        Some(Cubic::new([c[0], c[1], c[2], c[3]]))
    }

    /// Evaluates this polynomial at `x`.
    #[inline]
    pub fn eval(&self, x: Real) -> Real {
        let [a, b, c, d] = self.coeffs;
        ((a * x + b) * x + c) * x + d
    }

    /// Evaluates the derivative of this polynomial at `x`.
    #[inline]
    pub fn derivative(&self, x: Real) -> Real {
        let [a, b, c, _] = self.coeffs;
        (3.0 * a * x + 2.0 * b) * x + c
    }

    /// Finds `x ∈ [lo, hi]` such that `self.eval(x) = target`.
    ///
    /// This is a safeguarded Newton iteration: whenever the Newton step leaves the current
    /// bracket or does not shrink fast enough, a bisection step is taken instead. The function
    /// values at `lo` and `hi` must bracket `target`, otherwise the endpoint closest to the
    /// target is returned as a non-converged estimate.
    pub fn solve_in(
        &self,
        target: Real,
        lo: Real,
        hi: Real,
        tolerance: Real,
        max_iterations: usize,
    ) -> RootEstimate {
        let f = |x: Real| self.eval(x) - target;
        let f_lo = f(lo);
        let f_hi = f(hi);

        let mut best = if f_lo.abs() <= f_hi.abs() {
            RootEstimate::new(lo, f_lo, tolerance)
        } else {
            RootEstimate::new(hi, f_hi, tolerance)
        };

        if best.converged || f_lo * f_hi > 0.0 {
            return best;
        }

        // Orient the bracket so that f(xl) < 0 < f(xh).
        let (mut xl, mut xh) = if f_lo < 0.0 { (lo, hi) } else { (hi, lo) };
        let mut x = 0.5 * (lo + hi);
        let mut dx_old = (hi - lo).abs();
        let mut dx = dx_old;
        let mut fx = f(x);
        let mut dfx = self.derivative(x);

        for _ in 0..max_iterations {
            if fx.abs() < best.residual.abs() {
                best = RootEstimate::new(x, fx, tolerance);
            }

            if best.converged {
                break;
            }

            let newton_leaves_bracket = ((x - xh) * dfx - fx) * ((x - xl) * dfx - fx) > 0.0;
            let newton_too_slow = (2.0 * fx).abs() > (dx_old * dfx).abs();

            dx_old = dx;

            if newton_leaves_bracket || newton_too_slow {
                dx = 0.5 * (xh - xl);
                x = xl + dx;
            } else {
                dx = fx / dfx;
                x -= dx;
            }

            if dx == 0.0 {
                break;
            }

            fx = f(x);
            dfx = self.derivative(x);

            if fx < 0.0 {
                xl = x;
            } else {
                xh = x;
            }
        }

        if fx.abs() < best.residual.abs() {
            best = RootEstimate::new(x, fx, tolerance);
        }

        best
    }
}

impl RootEstimate {
    fn new(root: Real, residual: Real, tolerance: Real) -> Self {
        RootEstimate {
            root,
            residual,
            converged: residual.abs() <= tolerance,
        }
    }
}
