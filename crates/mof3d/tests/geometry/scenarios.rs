use super::{quad_prism, unit_cube, unit_tetrahedron};
use mof3d::math::{Point, Real, Vector};
use mof3d::mesh::{CellMesh, PolyMesh};
use mof3d::reconstruction::{MofParameters, MomentOfFluid, ReconstructionFlags};
use mof3d::utils::BfgsTermination;
use na::Unit;

fn seed(x: Real, y: Real, z: Real) -> mof3d::math::UnitVector<Real> {
    Unit::new_normalize(Vector::new(x, y, z))
}

#[test]
fn half_cube() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    let ref_center = Point::new(0.25, 0.5, 0.5);
    let result = mof
        .optimize_centroid(0, 0.5, &ref_center, &seed(1.0, 0.2, -0.1))
        .unwrap();

    assert_relative_eq!(result.plane.normal.into_inner(), Vector::x(), epsilon = 1.0e-3);
    assert_relative_eq!(result.plane.offset, -0.5, epsilon = 1.0e-3);
    assert_relative_eq!(result.center.unwrap(), ref_center, epsilon = 1.0e-4);
    assert!((result.volume - 0.5).abs() <= 1.0e-10);
    assert!(result.distance < 1.0e-4);
}

#[test]
fn quarter_cube() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    let ref_center = Point::new(0.125, 0.5, 0.5);
    let result = mof
        .optimize_centroid(0, 0.25, &ref_center, &seed(1.0, 0.3, 0.2))
        .unwrap();

    assert_relative_eq!(result.plane.normal.into_inner(), Vector::x(), epsilon = 1.0e-3);
    assert_relative_eq!(result.plane.offset, -0.25, epsilon = 1.0e-3);
    assert_relative_eq!(result.center.unwrap(), ref_center, epsilon = 1.0e-4);
    assert!((result.volume - 0.25).abs() <= 1.0e-10);
}

#[test]
fn cube_corner() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    let ref_center = Point::new(1.0, 1.0, 1.0) / 3.0;
    let result = mof
        .optimize_centroid(0, 1.0 / 6.0, &ref_center, &seed(1.0, 0.8, 1.2))
        .unwrap();
    let diagonal = Vector::repeat(1.0).normalize();

    // The reference centroid is not reachable: the closest one is the corner tetrahedron's.
    assert_relative_eq!(result.plane.normal.into_inner(), diagonal, epsilon = 1.0e-2);
    assert!((result.volume - 1.0 / 6.0).abs() <= 1.0e-10);
    assert_relative_eq!(result.distance, 3.0f64.sqrt() / 12.0, epsilon = 1.0e-4);
}

#[test]
fn half_tetrahedron() {
    let mesh = unit_tetrahedron();
    let mut mof = MomentOfFluid::new(&mesh);
    let scale = 0.5f64.cbrt();
    let ref_center = Point::from(Vector::repeat(scale / 4.0));
    let result = mof
        .optimize_centroid(0, 0.5, &ref_center, &seed(1.0, 1.2, 0.9))
        .unwrap();
    let diagonal = Vector::repeat(1.0).normalize();

    assert_relative_eq!(result.plane.normal.into_inner(), diagonal, epsilon = 1.0e-3);
    assert_relative_eq!(result.plane.offset, -scale / 3.0f64.sqrt(), epsilon = 1.0e-3);
    assert!((result.volume - 1.0 / 12.0).abs() <= 1.0e-10 / 6.0);
}

#[test]
fn prism_slab() {
    let base = [[0.0, 0.0], [2.0, 0.0], [1.5, 1.0], [0.2, 1.2]];
    let mesh = quad_prism(base);
    let mut mof = MomentOfFluid::new(&mesh);

    // The slab `z <= 0.3` has the centroid of the base polygon, at mid-height.
    let (mut area, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for i in 0..4 {
        let [x0, y0] = base[i];
        let [x1, y1] = base[(i + 1) % 4];
        let cross = x0 * y1 - x1 * y0;
        area += cross / 2.0;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    let ref_center = Point::new(cx / (6.0 * area), cy / (6.0 * area), 0.15);

    let result = mof
        .optimize_centroid(0, 0.3, &ref_center, &seed(0.0, 1.0, 0.0))
        .unwrap();

    assert_relative_eq!(mesh.cell_volume(0), area, epsilon = 1.0e-12);
    assert_relative_eq!(result.plane.normal.into_inner(), Vector::z(), epsilon = 1.0e-3);
    assert_relative_eq!(result.plane.offset, -0.3, epsilon = 1.0e-3);
    assert!((result.volume - 0.3 * area).abs() <= 1.0e-10 * area);
}

#[test]
fn random_block() {
    let mesh = PolyMesh::cartesian_block(Point::origin(), Vector::repeat(1.0), [5, 5, 4]);
    let mut mof = MomentOfFluid::new(&mesh);
    let mut rng = oorandom::Rand64::new(42);
    let mut fractions = Vec::new();
    let mut ref_centers = Vec::new();

    // Reachable reference centroids, from random planes.
    for cell in 0..mesh.num_cells() {
        let theta = rng.rand_float() * core::f64::consts::PI;
        let phi = rng.rand_float() * 2.0 * core::f64::consts::PI;
        let normal = Unit::new_normalize(mof3d::utils::spherical_to_cartesian(theta, phi));
        let fraction = 0.05 + 0.9 * rng.rand_float();
        let matched = mof.match_fraction(cell, fraction, &normal).unwrap();

        fractions.push(fraction);
        ref_centers.push(matched.center.unwrap());
    }

    let result = mof.construct_interface(&fractions, &ref_centers).unwrap();
    assert!(result.failures.is_empty());
    assert_eq!(result.cells.len(), 100);

    for interface in &result.cells {
        let cell = interface.cell;
        let target = fractions[cell] * mesh.cell_volume(cell);
        assert!((interface.result.volume - target).abs() <= 1.0e-10 * mesh.cell_volume(cell));

        let along_x = mof
            .match_fraction(cell, fractions[cell], &Vector::x_axis())
            .unwrap();
        let distance_x = (along_x.center.unwrap() - ref_centers[cell]).norm();
        assert!(interface.result.distance <= distance_x + 1.0e-12);

        let from_x = mof
            .optimize_centroid(cell, fractions[cell], &ref_centers[cell], &Vector::x_axis())
            .unwrap();
        assert!(from_x.distance <= distance_x + 1.0e-12);
        assert!((from_x.volume - target).abs() <= 1.0e-10 * mesh.cell_volume(cell));
    }
}

#[test]
fn evaluation_budget_is_honored() {
    let mesh = unit_cube();
    let params = MofParameters {
        max_evaluations: 3,
        ..MofParameters::default()
    };
    let mut mof = MomentOfFluid::with_parameters(&mesh, params);
    let ref_center = Point::new(0.5, 0.5, 0.15);
    let normal = seed(1.0, 1.0, 0.0);
    let at_seed = mof.match_fraction(0, 0.3, &normal).unwrap();
    let result = mof.optimize_centroid(0, 0.3, &ref_center, &normal).unwrap();

    // The optimizer stops early but still returns its best plane, matching the volume.
    assert_eq!(result.termination, Some(BfgsTermination::MaxEvaluations));
    assert!(result.flags.contains(ReconstructionFlags::OPTIMIZE_INEXACT));
    assert!((result.volume - 0.3).abs() <= 1.0e-10);
    assert!(result.distance <= (at_seed.center.unwrap() - ref_center).norm() + 1.0e-12);
}
