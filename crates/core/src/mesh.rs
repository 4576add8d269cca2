use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::edge::{rotate_corners, LocalEdge, EDGES_PER_POLYGON};
use crate::error::SplitError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Four point indices. Triangles repeat the last corner, so `c == d`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl Polygon {
    pub fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { a, b, c, d }
    }

    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c, d: c }
    }

    pub fn from_corners(corners: [u32; 4]) -> Self {
        Self::new(corners[0], corners[1], corners[2], corners[3])
    }

    pub fn corners(&self) -> [u32; 4] {
        [self.a, self.b, self.c, self.d]
    }

    pub fn is_triangle(&self) -> bool {
        self.c == self.d
    }

    /// Corners reordered so that `edge` becomes the AB edge.
    pub fn rotated(&self, edge: LocalEdge) -> [u32; 4] {
        rotate_corners(self.corners(), edge)
    }

    pub fn edge(&self, edge: LocalEdge) -> (u32, u32) {
        let [a, b, _, _] = self.rotated(edge);
        (a, b)
    }

    pub fn max_index(&self) -> u32 {
        self.a.max(self.b).max(self.c).max(self.d)
    }
}

/// Points plus quad-encoded polygons. This is the in-memory topology store the
/// document and the file loaders work with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonMesh {
    pub points: Vec<[f32; 3]>,
    pub polygons: Vec<Polygon>,
}

impl PolygonMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points_polygons(points: Vec<[f32; 3]>, polygons: Vec<Polygon>) -> Self {
        Self { points, polygons }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn edge_count(&self) -> usize {
        self.polygons.len() * EDGES_PER_POLYGON
    }

    pub fn point(&self, index: usize) -> Option<[f32; 3]> {
        self.points.get(index).copied()
    }

    pub fn polygon(&self, index: usize) -> Option<Polygon> {
        self.polygons.get(index).copied()
    }

    /// Grows or shrinks both sequences. New slots hold placeholder values until
    /// every index has been written again.
    pub fn resize(&mut self, point_count: usize, polygon_count: usize) {
        self.points.resize(point_count, [0.0, 0.0, 0.0]);
        self.polygons.resize(polygon_count, Polygon::default());
    }

    pub fn set_point(&mut self, index: usize, point: [f32; 3]) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = point;
        }
    }

    pub fn set_polygon(&mut self, index: usize, polygon: Polygon) {
        if let Some(slot) = self.polygons.get_mut(index) {
            *slot = polygon;
        }
    }

    pub fn validate(&self) -> Result<(), SplitError> {
        let point_count = self.points.len();
        for (index, polygon) in self.polygons.iter().enumerate() {
            let max = polygon.max_index();
            if max as usize >= point_count {
                return Err(SplitError::InvalidTopology {
                    polygon: index,
                    point: max as usize,
                    point_count,
                });
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.points.iter();
        let first = iter.next()?;
        let mut min = Vec3::from(*first);
        let mut max = min;

        for p in iter {
            let p = Vec3::from(*p);
            min = min.min(p);
            max = max.max(p);
        }

        Some(Aabb {
            min: min.to_array(),
            max: max.to_array(),
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.polygons.iter().filter(|poly| poly.is_triangle()).count()
    }
}

pub fn make_box(size: [f32; 3]) -> PolygonMesh {
    let hx = size[0] * 0.5;
    let hy = size[1] * 0.5;
    let hz = size[2] * 0.5;

    let points = vec![
        [-hx, -hy, -hz],
        [hx, -hy, -hz],
        [hx, hy, -hz],
        [-hx, hy, -hz],
        [-hx, -hy, hz],
        [hx, -hy, hz],
        [hx, hy, hz],
        [-hx, hy, hz],
    ];

    let polygons = vec![
        Polygon::new(0, 3, 2, 1), // -Z
        Polygon::new(4, 5, 6, 7), // +Z
        Polygon::new(0, 1, 5, 4), // -Y
        Polygon::new(2, 3, 7, 6), // +Y
        Polygon::new(1, 2, 6, 5), // +X
        Polygon::new(3, 0, 4, 7), // -X
    ];

    PolygonMesh::with_points_polygons(points, polygons)
}

pub fn make_quad_grid(size: [f32; 2], divisions: [u32; 2]) -> PolygonMesh {
    let width = size[0].max(0.0);
    let depth = size[1].max(0.0);
    let div_x = divisions[0].max(1);
    let div_z = divisions[1].max(1);

    let step_x = width / div_x as f32;
    let step_z = depth / div_z as f32;
    let origin_x = -width * 0.5;
    let origin_z = -depth * 0.5;

    let mut points = Vec::new();
    for z in 0..=div_z {
        for x in 0..=div_x {
            points.push([
                origin_x + x as f32 * step_x,
                0.0,
                origin_z + z as f32 * step_z,
            ]);
        }
    }

    let mut polygons = Vec::new();
    let stride = div_x + 1;
    for z in 0..div_z {
        for x in 0..div_x {
            let i0 = z * stride + x;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            polygons.push(Polygon::new(i0, i2, i3, i1));
        }
    }

    PolygonMesh::with_points_polygons(points, polygons)
}
