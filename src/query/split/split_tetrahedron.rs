use crate::math::{Point, Real};
use crate::query::split::TetrahedronClip;
use crate::shape::{Plane, Tetrahedron, Triangle};

// Even permutations of the vertex indices bringing the given vertex first.
const SINGLE_FIRST: [[usize; 4]; 4] = [[0, 1, 2, 3], [1, 0, 3, 2], [2, 3, 0, 1], [3, 2, 1, 0]];

// Even permutations of the vertex indices bringing the given pair `(i, j)`, `i < j`, first.
fn pair_first(i: usize, j: usize) -> [usize; 4] {
    match (i, j) {
        (0, 1) => [0, 1, 2, 3],
        (0, 2) => [0, 2, 3, 1],
        (0, 3) => [0, 3, 1, 2],
        (1, 2) => [1, 2, 0, 3],
        (1, 3) => [1, 3, 2, 0],
        _ => [2, 3, 0, 1],
    }
}

impl Tetrahedron {
    /// Clips this tetrahedron by `plane`, keeping the part below it.
    ///
    /// Signed distances smaller than `epsilon` in magnitude are snapped to zero, and vertices
    /// lying on the plane count as below. The kept part is returned as up to three tetrahedra,
    /// each built from an even permutation of this tetrahedron's vertex order so that its signed
    /// volume has the same sign as `self.signed_volume()`. The section of this tetrahedron by the
    /// plane is returned as up to two triangles with normals along `plane.normal`.
    ///
    /// When every below vertex lies exactly on the plane the kept part is flat and no tetrahedron
    /// is returned. A face lying in the plane is still reported as a section triangle when the
    /// rest of the tetrahedron is above the plane.
    pub fn clip_below(&self, plane: &Plane, epsilon: Real) -> TetrahedronClip {
        let pts = self.vertices();
        let mut dists = [0.0; 4];

        for (d, pt) in dists.iter_mut().zip(pts.iter()) {
            let s = plane.signed_distance(pt);
            *d = if s.abs() < epsilon { 0.0 } else { s };
        }

        let below_count = dists.iter().filter(|s| **s <= 0.0).count();
        let flat_contact = dists.iter().all(|s| *s >= 0.0);
        let mut result = TetrahedronClip::default();
        let section = |a: Point<Real>, b: Point<Real>, c: Point<Real>| {
            Triangle::new(a, b, c).oriented_along(&plane.normal)
        };
        let intersect = |i: usize, j: usize| edge_intersection(&pts, &dists, i, j, epsilon);

        match below_count {
            0 => {}
            4 => {
                if !flat_contact {
                    result.below.push(*self);
                }
            }
            1 => {
                if !flat_contact {
                    let i = dists.iter().position(|s| *s <= 0.0).unwrap_or(0);
                    let [b, a1, a2, a3] = SINGLE_FIRST[i];
                    let q1 = intersect(b, a1);
                    let q2 = intersect(b, a2);
                    let q3 = intersect(b, a3);

                    result.below.push(Tetrahedron::new(pts[b], q1, q2, q3));
                    result.section.push(section(q1, q2, q3));
                }
            }
            3 => {
                let i = dists.iter().position(|s| *s > 0.0).unwrap_or(0);
                let [a, b1, b2, b3] = SINGLE_FIRST[i];

                if flat_contact {
                    result.section.push(section(pts[b1], pts[b2], pts[b3]));
                } else {
                    let q1 = intersect(a, b1);
                    let q2 = intersect(a, b2);
                    let q3 = intersect(a, b3);
                    let (b1, b2, b3) = (pts[b1], pts[b2], pts[b3]);

                    result.below.push(Tetrahedron::new(q1, b1, b2, b3));
                    result.below.push(Tetrahedron::new(q2, q1, b2, b3));
                    result.below.push(Tetrahedron::new(q1, q2, q3, b3));
                    result.section.push(section(q1, q2, q3));
                }
            }
            _ => {
                if !flat_contact {
                    let mut below = (0..4).filter(|k| dists[*k] <= 0.0);
                    let i = below.next().unwrap_or(0);
                    let j = below.next().unwrap_or(1);
                    let [b1, b2, a1, a2] = pair_first(i, j);
                    let p11 = intersect(b1, a1);
                    let p12 = intersect(b1, a2);
                    let p21 = intersect(b2, a1);
                    let p22 = intersect(b2, a2);
                    let (b1, b2) = (pts[b1], pts[b2]);

                    result.below.push(Tetrahedron::new(b1, b2, p11, p12));
                    result.below.push(Tetrahedron::new(b2, p11, p12, p21));
                    result.below.push(Tetrahedron::new(b2, p21, p12, p22));
                    // The section quad is split along the same `p12 - p21` diagonal.
                    result.section.push(section(p11, p21, p12));
                    result.section.push(section(p21, p22, p12));
                }
            }
        }

        result
    }
}

/// The intersection of the edge `(pts[i], pts[j])` with the plane, from the signed distances
/// of its endpoints.
fn edge_intersection(
    pts: &[Point<Real>; 4],
    dists: &[Real; 4],
    i: usize,
    j: usize,
    epsilon: Real,
) -> Point<Real> {
    let (sa, sb) = (dists[i], dists[j]);

    if (sa - sb).abs() < epsilon {
        pts[i]
    } else {
        pts[i] + (pts[j] - pts[i]) * (sa / (sa - sb))
    }
}
