//! Legacy VTK (`.vtk`) ASCII output of polygonal surfaces.

use crate::math::{Point, Real};
use crate::shape::Triangle;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the given polygons as a legacy VTK ASCII polydata dataset.
///
/// Each polygon is a list of indices into `points`. The title is truncated to its first line.
pub fn write_vtk_polydata<W: Write>(
    out: &mut W,
    title: &str,
    points: &[Point<Real>],
    polygons: &[&[usize]],
) -> io::Result<()> {
    let title = title.lines().next().unwrap_or_default();
    let size: usize = polygons.iter().map(|poly| poly.len() + 1).sum();

    writeln!(out, "# vtk DataFile Version 2.0")?;
    writeln!(out, "{}", title)?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET POLYDATA")?;
    writeln!(out, "POINTS {} double", points.len())?;

    for pt in points {
        writeln!(out, "{} {} {}", pt.x, pt.y, pt.z)?;
    }

    writeln!(out, "POLYGONS {} {}", polygons.len(), size)?;

    for poly in polygons {
        write!(out, "{}", poly.len())?;

        for id in poly.iter() {
            write!(out, " {}", id)?;
        }

        writeln!(out)?;
    }

    Ok(())
}

/// Writes a triangle soup as a legacy VTK ASCII polydata dataset.
///
/// Vertices are not merged: triangle `i` uses the points `3i`, `3i + 1` and `3i + 2`.
pub fn write_vtk_triangles<W: Write>(
    out: &mut W,
    title: &str,
    triangles: &[Triangle],
) -> io::Result<()> {
    let points: Vec<_> = triangles.iter().flat_map(|tri| tri.vertices()).collect();
    let indices: Vec<[usize; 3]> = (0..triangles.len())
        .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
        .collect();
    let polygons: Vec<&[usize]> = indices.iter().map(|tri| &tri[..]).collect();
    write_vtk_polydata(out, title, &points, &polygons)
}

/// Writes a single polygon as a legacy VTK ASCII polydata dataset.
pub fn write_vtk_polygon<W: Write>(
    out: &mut W,
    title: &str,
    vertices: &[Point<Real>],
) -> io::Result<()> {
    let indices: Vec<usize> = (0..vertices.len()).collect();
    write_vtk_polydata(out, title, vertices, &[&indices[..]])
}

/// Creates the file at `path` and writes `triangles` to it with [`write_vtk_triangles`].
pub fn write_vtk_triangles_to_file(
    path: impl AsRef<Path>,
    title: &str,
    triangles: &[Triangle],
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_vtk_triangles(&mut out, title, triangles)?;
    out.flush()
}

/// Creates the file at `path` and writes the polygon to it with [`write_vtk_polygon`].
pub fn write_vtk_polygon_to_file(
    path: impl AsRef<Path>,
    title: &str,
    vertices: &[Point<Real>],
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_vtk_polygon(&mut out, title, vertices)?;
    out.flush()
}
