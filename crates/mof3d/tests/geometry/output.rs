use super::unit_cube;
use mof3d::math::{Point, Vector};
use mof3d::mesh::PolyMesh;
use mof3d::reconstruction::MomentOfFluid;
use std::fs;

fn temp_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("mof3d-{}-{}", std::process::id(), name))
}

#[test]
fn cell_surface_as_vtk() {
    let mesh = unit_cube();
    let mut mof = MomentOfFluid::new(&mesh);
    let result = mof
        .optimize_centroid(0, 0.5, &Point::new(0.5, 0.5, 0.25), &Vector::z_axis())
        .unwrap();
    assert_relative_eq!(result.plane.normal.into_inner(), Vector::z(), epsilon = 1.0e-6);

    let num_tris = mof.surface().len();
    let mut out = Vec::<u8>::new();
    mof.output_surface(&mut out, "half cube").unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();

    assert!(num_tris > 0);
    assert_eq!(lines[..4], ["# vtk DataFile Version 2.0", "half cube", "ASCII", "DATASET POLYDATA"]);
    assert_eq!(lines[4], format!("POINTS {} double", 3 * num_tris));
    assert_eq!(
        lines[5 + 3 * num_tris],
        format!("POLYGONS {} {}", num_tris, 4 * num_tris)
    );
    assert_eq!(lines.len(), 6 + 4 * num_tris);

    // Every point lies on the interface plane z = 0.5.
    for line in &lines[5..5 + 3 * num_tris] {
        let z: f64 = line.split(' ').nth(2).unwrap().parse().unwrap();
        assert_relative_eq!(z, 0.5, epsilon = 1.0e-6);
    }

    let path = temp_file("surface.vtk");
    mof.output_surface_to_file(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(written.lines().skip(2).collect::<Vec<_>>(), lines[2..]);
}

#[test]
fn plane_patch_as_vtk() {
    let mesh = PolyMesh::hexahedron(Point::origin(), Point::new(2.0, 2.0, 2.0));
    let mof = MomentOfFluid::new(&mesh);
    let center = Point::new(1.0, 1.0, 1.0);
    let path = temp_file("plane.vtk");

    mof.output_plane_to_file(&path, &center, &Vector::x_axis(), 0)
        .unwrap();
    let written = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let lines: Vec<_> = written.lines().collect();

    assert_eq!(lines[4], "POINTS 4 double");
    assert_eq!(lines[9], "POLYGONS 1 5");

    // The patch lies in the plane x = 1, with half-width the cell size.
    for line in &lines[5..9] {
        let coords: Vec<f64> = line.split(' ').map(|c| c.parse().unwrap()).collect();
        assert_relative_eq!(coords[0], 1.0, epsilon = 1.0e-12);
        assert_relative_eq!((coords[1] - 1.0).abs(), 2.0, epsilon = 1.0e-12);
        assert_relative_eq!((coords[2] - 1.0).abs(), 2.0, epsilon = 1.0e-12);
    }
}

#[test]
fn batch_surface_as_vtk() {
    let mesh = PolyMesh::cartesian_block(Point::origin(), Vector::repeat(1.0), [2, 1, 1]);
    let mut mof = MomentOfFluid::new(&mesh);
    let fractions = [0.5, 0.5];
    let ref_centers = [Point::new(0.5, 0.5, 0.25), Point::new(1.5, 0.5, 0.25)];
    let result = mof.construct_interface(&fractions, &ref_centers).unwrap();

    assert_eq!(result.cells.len(), 2);
    let area: f64 = result.surface.iter().map(|tri| tri.area()).sum();
    assert_relative_eq!(area, 2.0, epsilon = 1.0e-6);

    let mut out = Vec::<u8>::new();
    result.write_surface(&mut out, "block").unwrap();
    let text = String::from_utf8(out).unwrap();
    let num_tris = result.surface.len();
    assert!(text.contains(&format!("POLYGONS {} {}\n", num_tris, 4 * num_tris)));
}
