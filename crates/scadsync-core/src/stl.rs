use crate::mesh::{scene_mesh, TriangleMesh};
use crate::model::ShapeRecord;
use std::fmt;

/// File name offered for a scene download.
pub const EXPORT_FILE_NAME: &str = "scene.stl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StlOptions {
    pub segments: u32,
    pub format: StlFormat,
}

impl Default for StlOptions {
    fn default() -> Self {
        Self {
            segments: 32,
            format: StlFormat::Binary,
        }
    }
}

/// Tessellate the scene and serialize it. Sizes are raw scene units.
pub fn export_scene_stl(shapes: &[ShapeRecord], options: &StlOptions) -> Vec<u8> {
    let mesh = scene_mesh(shapes, options.segments);
    tracing::info!(
        shapes = shapes.len(),
        triangles = mesh.triangles.len(),
        "exporting scene mesh"
    );
    match options.format {
        StlFormat::Binary => to_binary_stl(&mesh, "scene"),
        StlFormat::Ascii => to_ascii_stl(&mesh, "scene").into_bytes(),
    }
}

/// One output triangle: its unit normal and corners in winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: [f64; 3],
    pub corners: [[f64; 3]; 3],
}

impl Facet {
    pub fn new(corners: [[f64; 3]; 3]) -> Self {
        let [a, b, c] = corners;
        Self {
            normal: triangle_normal(a, b, c),
            corners,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [nx, ny, nz] = self.normal;
        writeln!(f, "  facet normal {nx} {ny} {nz}")?;
        writeln!(f, "    outer loop")?;
        for [x, y, z] in self.corners {
            writeln!(f, "      vertex {x} {y} {z}")?;
        }
        writeln!(f, "    endloop")?;
        writeln!(f, "  endfacet")
    }
}

/// Facets of the mesh in triangle order.
pub fn facets(mesh: &TriangleMesh) -> impl Iterator<Item = Facet> + '_ {
    mesh.triangles
        .iter()
        .map(|tri| Facet::new(tri.map(|i| mesh.vertices[i as usize])))
}

/// Binary STL: 80-byte header carrying `name`, little-endian facet count,
/// then 50 bytes per facet.
pub fn to_binary_stl(mesh: &TriangleMesh, name: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(84 + mesh.triangles.len() * 50);

    let mut header = [0u8; 80];
    let len = name.len().min(header.len());
    header[..len].copy_from_slice(&name.as_bytes()[..len]);
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(&(mesh.triangles.len() as u32).to_le_bytes());

    for facet in facets(mesh) {
        for v in std::iter::once(facet.normal).chain(facet.corners) {
            for c in v {
                bytes.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        // Attribute byte count, unused.
        bytes.extend_from_slice(&[0, 0]);
    }
    bytes
}

pub fn write_ascii_stl(
    out: &mut impl fmt::Write,
    mesh: &TriangleMesh,
    name: &str,
) -> fmt::Result {
    writeln!(out, "solid {name}")?;
    for facet in facets(mesh) {
        write!(out, "{facet}")?;
    }
    writeln!(out, "endsolid {name}")
}

pub fn to_ascii_stl(mesh: &TriangleMesh, name: &str) -> String {
    let mut out = String::new();
    // Formatting into a String does not fail.
    let _ = write_ascii_stl(&mut out, mesh, name);
    out
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Unit normal of `a, b, c` by the right-hand rule; zero when degenerate.
pub fn triangle_normal(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [f64; 3] {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = cross(ab, ac);
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len <= f64::EPSILON {
        return [0.0; 3];
    }
    n.map(|c| c / len)
}

#[cfg(test)]
mod tests {
    use super::triangle_normal;

    #[test]
    fn normal_follows_winding() {
        let n = triangle_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!([0.0, 0.0, 1.0], n);
    }

    #[test]
    fn degenerate_triangle_has_zero_normal() {
        let n = triangle_normal([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert_eq!([0.0, 0.0, 0.0], n);
    }
}
