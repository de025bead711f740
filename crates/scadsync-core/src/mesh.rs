use crate::geom::{BBox3, Vec3};
use crate::model::{ShapeDims, ShapeRecord};
use std::f64::consts::{PI, TAU};

/// Indexed triangle mesh; triangles wind counter-clockwise seen from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append `other`, re-indexing its triangles.
    pub fn append(&mut self, other: TriangleMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.triangles.extend(
            other
                .triangles
                .into_iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    pub fn bbox(&self) -> BBox3 {
        let mut bbox = BBox3::empty();
        for v in &self.vertices {
            bbox.include_point(Vec3::from(*v));
        }
        bbox
    }

    fn push_vertex(&mut self, center: Vec3, x: f64, y: f64, z: f64) -> u32 {
        let id = self.vertices.len() as u32;
        self.vertices.push([center.x + x, center.y + y, center.z + z]);
        id
    }
}

/// Tessellate one shape, centred on its position with the Y axis up.
///
/// Curved shapes use `segments` divisions around their axis (at least 3);
/// spheres also use `segments` bands from pole to pole.
pub fn tessellate(shape: &ShapeRecord, segments: u32) -> TriangleMesh {
    let segments = segments.max(3);
    match shape.dims() {
        ShapeDims::Box { edge } => box_mesh(shape.position, edge),
        ShapeDims::Sphere { radius } => sphere_mesh(shape.position, radius, segments),
        ShapeDims::Cylinder { radius, height } => {
            cylinder_mesh(shape.position, radius, height, segments)
        }
    }
}

/// All shapes merged into one mesh, in list order.
pub fn scene_mesh(shapes: &[ShapeRecord], segments: u32) -> TriangleMesh {
    let mut mesh = TriangleMesh::empty();
    for shape in shapes {
        mesh.append(tessellate(shape, segments));
    }
    mesh
}

fn box_mesh(center: Vec3, edge: f64) -> TriangleMesh {
    let h = edge * 0.5;
    let mut mesh = TriangleMesh::empty();
    // Corner i sits at (+-h) per bit: x = bit 0, y = bit 1, z = bit 2.
    for i in 0..8u32 {
        let sx = if i & 1 == 0 { -h } else { h };
        let sy = if i & 2 == 0 { -h } else { h };
        let sz = if i & 4 == 0 { -h } else { h };
        mesh.push_vertex(center, sx, sy, sz);
    }
    const QUADS: [[u32; 4]; 6] = [
        [0, 4, 6, 2], // -x
        [1, 3, 7, 5], // +x
        [0, 1, 5, 4], // -y
        [2, 6, 7, 3], // +y
        [0, 2, 3, 1], // -z
        [4, 5, 7, 6], // +z
    ];
    for [a, b, c, d] in QUADS {
        mesh.triangles.push([a, b, c]);
        mesh.triangles.push([a, c, d]);
    }
    mesh
}

fn sphere_mesh(center: Vec3, radius: f64, segments: u32) -> TriangleMesh {
    let rings = segments;
    let sectors = segments;
    let mut mesh = TriangleMesh::empty();

    let top = mesh.push_vertex(center, 0.0, radius, 0.0);
    let mut ring_starts = Vec::with_capacity(rings as usize - 1);
    for i in 1..rings {
        let theta = PI * i as f64 / rings as f64;
        ring_starts.push(mesh.vertices.len() as u32);
        for j in 0..sectors {
            let phi = TAU * j as f64 / sectors as f64;
            mesh.push_vertex(
                center,
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            );
        }
    }
    let bottom = mesh.push_vertex(center, 0.0, -radius, 0.0);

    let at = |ring: usize, j: u32| ring_starts[ring] + j % sectors;
    for j in 0..sectors {
        mesh.triangles.push([top, at(0, j + 1), at(0, j)]);
    }
    for ring in 0..ring_starts.len() - 1 {
        for j in 0..sectors {
            let a = at(ring, j);
            let b = at(ring, j + 1);
            let c = at(ring + 1, j + 1);
            let d = at(ring + 1, j);
            mesh.triangles.push([a, b, c]);
            mesh.triangles.push([a, c, d]);
        }
    }
    let last = ring_starts.len() - 1;
    for j in 0..sectors {
        mesh.triangles.push([at(last, j), at(last, j + 1), bottom]);
    }
    mesh
}

fn cylinder_mesh(center: Vec3, radius: f64, height: f64, segments: u32) -> TriangleMesh {
    let half = height * 0.5;
    let mut mesh = TriangleMesh::empty();

    let top_start = mesh.vertices.len() as u32;
    for (x, z) in ring_points(radius, segments) {
        mesh.push_vertex(center, x, half, z);
    }
    let bottom_start = mesh.vertices.len() as u32;
    for (x, z) in ring_points(radius, segments) {
        mesh.push_vertex(center, x, -half, z);
    }
    let top_center = mesh.push_vertex(center, 0.0, half, 0.0);
    let bottom_center = mesh.push_vertex(center, 0.0, -half, 0.0);

    for j in 0..segments {
        let next = (j + 1) % segments;
        let a = top_start + j;
        let b = top_start + next;
        let c = bottom_start + next;
        let d = bottom_start + j;
        mesh.triangles.push([a, b, c]);
        mesh.triangles.push([a, c, d]);
        mesh.triangles.push([top_center, b, a]);
        mesh.triangles.push([d, c, bottom_center]);
    }
    mesh
}

fn ring_points(radius: f64, segments: u32) -> impl Iterator<Item = (f64, f64)> {
    (0..segments).map(move |j| {
        let phi = TAU * j as f64 / segments as f64;
        (radius * phi.cos(), radius * phi.sin())
    })
}
