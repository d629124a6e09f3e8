use crate::math::{Real, Vector};
use core::f64::consts::PI;

/// Converts the spherical angles `(theta, phi)` to the corresponding unit vector.
///
/// `theta` is the polar angle measured from the `+z` axis and `phi` the azimuth measured
/// from the `+x` axis: `(sin θ cos φ, sin θ sin φ, cos θ)`.
#[inline]
pub fn spherical_to_cartesian(theta: Real, phi: Real) -> Vector<Real> {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    Vector::new(st * cp, st * sp, ct)
}

/// Computes the spherical angles `(theta, phi)` of the direction of `v`.
///
/// The result satisfies `theta ∈ [0, π]` and `phi ∈ [0, 2π)`. The null vector is mapped
/// to `(0, 0)`.
#[inline]
pub fn cartesian_to_spherical(v: &Vector<Real>) -> (Real, Real) {
    let norm = v.norm();

    if norm == 0.0 {
        return (0.0, 0.0);
    }

    let theta = (v.z / norm).clamp(-1.0, 1.0).acos();
    let mut phi = v.y.atan2(v.x);

    if phi < 0.0 {
        phi += 2.0 * PI;
    }

    // atan2 can return exactly -0.0 + 2π rounding up to 2π.
    if phi >= 2.0 * PI {
        phi = 0.0;
    }

    (theta, phi)
}

#[cfg(test)]
mod test {
    use super::{cartesian_to_spherical, spherical_to_cartesian};
    use crate::math::Vector;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn axes_have_expected_angles() {
        let (theta, phi) = cartesian_to_spherical(&Vector::new(0.0, 0.0, 2.0));
        assert_relative_eq!(theta, 0.0);
        assert_relative_eq!(phi, 0.0);

        let (theta, phi) = cartesian_to_spherical(&Vector::new(0.0, -1.0, 0.0));
        assert_relative_eq!(theta, FRAC_PI_2);
        assert_relative_eq!(phi, 3.0 * FRAC_PI_2);

        assert_relative_eq!(
            spherical_to_cartesian(FRAC_PI_2, PI),
            Vector::new(-1.0, 0.0, 0.0),
            epsilon = 1.0e-15
        );
    }

    #[test]
    fn conversion_roundtrip() {
        for k in 0..16 {
            let v = Vector::new((k as f64).cos(), (k as f64 * 0.7).sin(), 0.3 * k as f64 - 2.0)
                .normalize();
            let (theta, phi) = cartesian_to_spherical(&v);
            assert_relative_eq!(spherical_to_cartesian(theta, phi), v, epsilon = 1.0e-12);
        }
    }
}
