use mof3d::math::{Point, Real};
use mof3d::mesh::PolyMesh;

mod invariants;
mod output;
mod scenarios;

pub fn unit_cube() -> PolyMesh {
    PolyMesh::hexahedron(Point::origin(), Point::new(1.0, 1.0, 1.0))
}

pub fn unit_tetrahedron() -> PolyMesh {
    PolyMesh::tetrahedron(
        Point::origin(),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
    )
}

/// A right prism of height 1 over the given counter-clockwise quadrilateral.
pub fn quad_prism(base: [[Real; 2]; 4]) -> PolyMesh {
    let points = (0..2)
        .flat_map(|k| base.iter().map(move |p| Point::new(p[0], p[1], k as Real)))
        .collect();
    let mut faces = vec![vec![0, 3, 2, 1], vec![4, 5, 6, 7]];
    faces.extend((0..4).map(|i| vec![i, (i + 1) % 4, (i + 1) % 4 + 4, i + 4]));

    PolyMesh::from_polyhedron(points, faces).unwrap()
}
