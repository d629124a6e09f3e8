use super::{quad_prism, unit_cube};
use mof3d::math::{Point, Real, Vector};
use mof3d::mesh::CellMesh;
use mof3d::reconstruction::MomentOfFluid;
use mof3d::shape::Plane;
use na::Unit;

fn random_normals(seed: u128, count: usize) -> Vec<mof3d::math::UnitVector<Real>> {
    let mut rng = oorandom::Rand64::new(seed);
    (0..count)
        .map(|_| {
            let v = Vector::new(
                rng.rand_float() - 0.5,
                rng.rand_float() - 0.5,
                rng.rand_float() - 0.5,
            );
            Unit::new_normalize(v)
        })
        .collect()
}

#[test]
fn complementary_volumes() {
    let mesh = quad_prism([[0.0, 0.0], [2.0, 0.0], [1.5, 1.0], [0.2, 1.2]]);
    let mut mof = MomentOfFluid::new(&mesh);
    mof.decompose_cell(0).unwrap();
    let total = mof.cell_volume();
    let center = mof.cell_center();

    for (i, normal) in random_normals(1, 30).into_iter().enumerate() {
        let plane = Plane::from_point_and_normal(&center, normal);
        let offset = plane.offset + 0.05 * (i as Real - 15.0);
        let (below, _) = mof.evaluate(&Plane::new(normal, offset));
        let (above, _) = mof.evaluate(&Plane::new(-normal, -offset));

        assert_relative_eq!(below + above, total, epsilon = 1.0e-12);
    }
}

#[test]
fn limits_of_the_offset() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    let normal = Unit::new_normalize(Vector::new(0.2, -0.7, 0.4));

    let empty = mof.match_fraction(0, 0.0, &normal).unwrap();
    assert_eq!(empty.volume, 0.0);
    assert!(empty.center.is_none());
    assert!(empty.plane.offset > empty.span[1]);
    assert!(mof.surface().is_empty());

    let full = mof.match_fraction(0, 1.0, &normal).unwrap();
    assert_relative_eq!(full.volume, 1.0, epsilon = 1.0e-14);
    assert_relative_eq!(full.center.unwrap(), Point::new(0.5, 0.5, 0.5), epsilon = 1.0e-14);
    assert!(full.plane.offset < full.span[0]);

    for pt in mesh.points() {
        assert!(empty.plane.signed_distance(pt) > 0.0);
        assert!(full.plane.signed_distance(pt) < 0.0);
    }
}

#[test]
fn volume_is_monotonic_in_the_level() {
    let mesh = quad_prism([[0.0, 0.0], [2.0, 0.0], [1.5, 1.0], [0.2, 1.2]]);
    let mut mof = MomentOfFluid::new(&mesh);

    for normal in random_normals(2, 10) {
        let fit = mof.match_fraction(0, 0.5, &normal).unwrap();
        let [d_min, d_max] = fit.span;
        let mut prev = -1.0;

        // Decreasing offsets, i.e. increasing levels.
        for k in 0..=40 {
            let offset = d_max - (d_max - d_min) * k as Real / 40.0;
            let (volume, _) = mof.evaluate(&Plane::new(normal, offset));
            assert!(volume >= prev - 1.0e-14);
            prev = volume;
        }

        assert_relative_eq!(prev, mof.cell_volume(), epsilon = 1.0e-12);
    }
}

#[test]
fn matched_volume_residual() {
    let mesh = quad_prism([[0.0, 0.0], [2.0, 0.0], [1.5, 1.0], [0.2, 1.2]]);
    let mut mof = MomentOfFluid::new(&mesh);
    let total = mesh.cell_volume(0);

    for (i, normal) in random_normals(3, 20).into_iter().enumerate() {
        let fraction = 0.02 + 0.96 * i as Real / 19.0;
        let fit = mof.match_fraction(0, fraction, &normal).unwrap();

        assert!(fit.flags.is_empty());
        assert!((fit.volume - fraction * total).abs() <= 1.0e-10 * total);
        assert!(fit.bracket_volumes[0] <= fit.volume && fit.volume <= fit.bracket_volumes[1]);
    }
}

#[test]
fn fraction_matching_is_idempotent() {
    let mesh = mof3d::mesh::PolyMesh::cartesian_block(
        Point::new(-1.0, 0.0, 0.0),
        Vector::new(0.5, 1.0, 2.0),
        [2, 2, 1],
    );
    let mut mof = MomentOfFluid::new(&mesh);
    let normal = Unit::new_normalize(Vector::new(-0.3, 0.9, 0.1));

    let first = mof.match_fraction(3, 0.71, &normal).unwrap();
    let _ = mof.match_fraction(0, 0.2, &normal).unwrap();
    let second = mof.match_fraction(3, 0.71, &first.plane.normal).unwrap();

    assert_eq!(mof.current_cell(), Some(3));
    assert_relative_eq!(second.plane.offset, first.plane.offset, epsilon = 1.0e-9);
    assert_relative_eq!(second.volume, first.volume, epsilon = 1.0e-10);
}

#[test]
fn mirrored_data_gives_mirrored_planes() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    let seed = Unit::new_normalize(Vector::new(0.1, 0.9, 0.3));

    let left = mof
        .optimize_centroid(0, 0.25, &Point::new(0.125, 0.5, 0.5), &seed)
        .unwrap();
    let right = mof
        .optimize_centroid(0, 0.25, &Point::new(0.875, 0.5, 0.5), &seed)
        .unwrap();

    assert_relative_eq!(left.plane.normal.into_inner(), Vector::x(), epsilon = 1.0e-3);
    assert_relative_eq!(right.plane.normal.into_inner(), -Vector::x(), epsilon = 1.0e-3);
    assert_relative_eq!(left.plane.offset, -0.25, epsilon = 1.0e-3);
    assert_relative_eq!(right.plane.offset, 0.75, epsilon = 1.0e-3);
}

#[test]
fn reference_at_the_cell_centroid() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    let center = Point::new(0.5, 0.5, 0.5);
    let seed = Unit::new_normalize(Vector::new(0.3, 0.5, 0.8));
    let result = mof.optimize_centroid(0, 0.5, &center, &seed).unwrap();

    // Any plane through the centroid of the cube cuts half of it.
    assert!((result.volume - 0.5).abs() <= 1.0e-10);
    assert_relative_eq!(result.plane.signed_distance(&center), 0.0, epsilon = 1.0e-9);
}

#[test]
fn decomposition_about_an_inner_apex() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    mof.decompose_cell_about(0, Point::new(0.2, 0.3, 0.9)).unwrap();
    assert_relative_eq!(mof.cell_volume(), 1.0, epsilon = 1.0e-14);

    let fit = mof.match_fraction(0, 0.4, &Vector::z_axis()).unwrap();
    assert_relative_eq!(fit.plane.offset, -0.4, epsilon = 1.0e-9);
    assert_relative_eq!(fit.center.unwrap(), Point::new(0.5, 0.5, 0.2), epsilon = 1.0e-9);
}
