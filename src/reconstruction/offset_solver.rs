//! Matching a volume with a plane of fixed orientation.
//!
//! The volume below the plane `n · x = level` of a tetrahedral decomposition is a
//! non-decreasing, piecewise-cubic function of `level`. Its breakpoints are the levels of the
//! tetrahedra vertices, so it is a single cubic polynomial between two consecutive breakpoints.

use crate::math::{Real, UnitVector};
use crate::shape::Tetrahedron;
use crate::utils::Cubic;
use ordered_float::OrderedFloat;

/// The level of the plane matching a target volume.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LevelSolution {
    /// The level `n · x` of the plane.
    pub level: Real,
    /// The volume below the plane at `level`.
    pub volume: Real,
    /// The levels of the breakpoints bracketing the solution.
    pub bracket: [Real; 2],
    /// The volumes below the plane at the bracket ends.
    pub bracket_volumes: [Real; 2],
    /// Whether the volume matches the target within tolerance.
    pub converged: bool,
}

/// Parameters of the volume-matching solver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LevelSolver {
    /// The distance under which two breakpoints are merged.
    pub epsilon: Real,
    /// The absolute tolerance on the matched volume.
    pub volume_tolerance: Real,
    /// Maximum number of iterations of the root finders.
    pub max_iterations: usize,
}

/// The sorted, deduplicated levels `normal · p` of the vertices of `tets`.
///
/// Levels closer than `epsilon` from the previous kept level are discarded.
pub fn breakpoint_levels(
    tets: &[Tetrahedron],
    normal: &UnitVector<Real>,
    epsilon: Real,
) -> Vec<Real> {
    let mut levels: Vec<_> = tets
        .iter()
        .flat_map(|tet| tet.vertices())
        .map(|pt| OrderedFloat(normal.dot(&pt.coords)))
        .collect();
    levels.sort_unstable();
    levels.dedup_by(|a, b| a.0 - b.0 <= epsilon);
    levels.into_iter().map(|l| l.0).collect()
}

impl LevelSolver {
    /// Finds the level at which `volume_at(level)` equals `fraction * total`.
    ///
    /// `levels` are the sorted breakpoints of `volume_at`, which must be non-decreasing with
    /// `volume_at(levels[0]) = 0` and `volume_at(levels[last]) = total`. A fraction not greater
    /// than zero (resp. not smaller than one) gives a level just below the first (resp. above the
    /// last) breakpoint.
    pub fn solve(
        &self,
        levels: &[Real],
        fraction: Real,
        total: Real,
        mut volume_at: impl FnMut(Real) -> Real,
    ) -> LevelSolution {
        let (Some(&lowest), Some(&highest)) = (levels.first(), levels.last()) else {
            return LevelSolution {
                level: 0.0,
                volume: 0.0,
                bracket: [0.0; 2],
                bracket_volumes: [0.0; 2],
                converged: false,
            };
        };

        let target = fraction * total;
        let span = [lowest - self.epsilon, highest + self.epsilon];

        if fraction <= 0.0 || fraction >= 1.0 {
            let level = if fraction <= 0.0 { span[0] } else { span[1] };
            let volume = volume_at(level);

            return LevelSolution {
                level,
                volume,
                bracket: [level; 2],
                bracket_volumes: [volume; 2],
                converged: (volume - target).abs() <= self.volume_tolerance,
            };
        }

        // Linear scan of the breakpoints for the piece containing the solution.
        let mut prev = (lowest, volume_at(lowest));
        let mut bracket = None;

        if prev.1 < target {
            for &level in &levels[1..] {
                let curr = (level, volume_at(level));

                if (curr.1 - target).abs() <= self.volume_tolerance {
                    return LevelSolution {
                        level,
                        volume: curr.1,
                        bracket: [prev.0, level],
                        bracket_volumes: [prev.1, curr.1],
                        converged: true,
                    };
                }

                if curr.1 > target {
                    bracket = Some((prev, curr));
                    break;
                }

                prev = curr;
            }
        }

        match bracket {
            Some((lo, hi)) => self.solve_in_piece(lo, hi, target, &mut volume_at),
            None => {
                // Numerical noise broke monotonicity: fall back to the whole span.
                log::debug!("no bracketing breakpoints found for the volume {}", target);
                self.bisect((span[0], 0.0), (span[1], total), target, &mut volume_at)
            }
        }
    }

    // Solves on a single polynomial piece, from four samples of the volume.
    fn solve_in_piece(
        &self,
        lo: (Real, Real),
        hi: (Real, Real),
        target: Real,
        volume_at: &mut impl FnMut(Real) -> Real,
    ) -> LevelSolution {
        let width = hi.0 - lo.0;
        let t1 = 1.0 / 3.0;
        let t2 = 2.0 / 3.0;
        let samples = [
            (0.0, lo.1),
            (t1, volume_at(lo.0 + t1 * width)),
            (t2, volume_at(lo.0 + t2 * width)),
            (1.0, hi.1),
        ];

        if let Some(cubic) = Cubic::interpolate(&samples) {
            let root = cubic.solve_in(
                target,
                0.0,
                1.0,
                self.volume_tolerance * 1.0e-3,
                self.max_iterations,
            );
            let level = lo.0 + root.root * width;
            let volume = volume_at(level);

            if (volume - target).abs() <= self.volume_tolerance {
                return LevelSolution {
                    level,
                    volume,
                    bracket: [lo.0, hi.0],
                    bracket_volumes: [lo.1, hi.1],
                    converged: true,
                };
            }

            log::debug!(
                "cubic fit missed the volume {} by {}, bisecting",
                target,
                volume - target
            );
        }

        let mut result = self.bisect(lo, hi, target, volume_at);
        result.bracket = [lo.0, hi.0];
        result.bracket_volumes = [lo.1, hi.1];
        result
    }

    fn bisect(
        &self,
        mut lo: (Real, Real),
        mut hi: (Real, Real),
        target: Real,
        volume_at: &mut impl FnMut(Real) -> Real,
    ) -> LevelSolution {
        let bracket = [lo.0, hi.0];
        let bracket_volumes = [lo.1, hi.1];
        let mut best = if (lo.1 - target).abs() <= (hi.1 - target).abs() {
            lo
        } else {
            hi
        };

        for _ in 0..self.max_iterations {
            let mid = 0.5 * (lo.0 + hi.0);
            let volume = volume_at(mid);

            if (volume - target).abs() <= (best.1 - target).abs() {
                best = (mid, volume);
            }

            if (volume - target).abs() <= self.volume_tolerance {
                break;
            }

            if volume < target {
                lo = (mid, volume);
            } else {
                hi = (mid, volume);
            }
        }

        LevelSolution {
            level: best.0,
            volume: best.1,
            bracket,
            bracket_volumes,
            converged: (best.1 - target).abs() <= self.volume_tolerance,
        }
    }
}
