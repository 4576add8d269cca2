//! Interfaces the split expects from whatever owns the mesh.
//!
//! The host keeps the topology, the optional attribute channels and the edge
//! selection. The split only reads through these traits, computes everything,
//! then writes back inside one transaction and reports each change with
//! [`SplitHost::notify`].

use crate::attributes::{UvCorners, VertexColorTag};
use crate::mesh::{Polygon, PolygonMesh};
use crate::selection::EdgeSelection;

pub trait TopologyStore {
    fn point_count(&self) -> usize;
    fn polygon_count(&self) -> usize;
    fn point(&self, index: usize) -> Option<[f32; 3]>;
    fn polygon(&self, index: usize) -> Option<Polygon>;

    /// After a resize every point and polygon slot must be written before the
    /// store is read again.
    fn resize(&mut self, point_count: usize, polygon_count: usize);
    fn set_point(&mut self, index: usize, point: [f32; 3]);
    fn set_polygon(&mut self, index: usize, polygon: Polygon);

    fn snapshot(&self) -> PolygonMesh {
        let points = (0..self.point_count())
            .map(|index| self.point(index).unwrap_or([0.0, 0.0, 0.0]))
            .collect();
        let polygons = (0..self.polygon_count())
            .map(|index| self.polygon(index).unwrap_or_default())
            .collect();
        PolygonMesh::with_points_polygons(points, polygons)
    }
}

impl TopologyStore for PolygonMesh {
    fn point_count(&self) -> usize {
        PolygonMesh::point_count(self)
    }

    fn polygon_count(&self) -> usize {
        PolygonMesh::polygon_count(self)
    }

    fn point(&self, index: usize) -> Option<[f32; 3]> {
        PolygonMesh::point(self, index)
    }

    fn polygon(&self, index: usize) -> Option<Polygon> {
        PolygonMesh::polygon(self, index)
    }

    fn resize(&mut self, point_count: usize, polygon_count: usize) {
        PolygonMesh::resize(self, point_count, polygon_count);
    }

    fn set_point(&mut self, index: usize, point: [f32; 3]) {
        PolygonMesh::set_point(self, index, point);
    }

    fn set_polygon(&mut self, index: usize, polygon: Polygon) {
        PolygonMesh::set_polygon(self, index, polygon);
    }

    fn snapshot(&self) -> PolygonMesh {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeNotice {
    Topology,
    EdgeSelection,
    Uv,
    WeightMap(usize),
    VertexColors(usize),
}

/// Channel accessors default to "channel absent" so hosts only implement what
/// they carry.
pub trait SplitHost: TopologyStore {
    fn edge_selection(&self) -> EdgeSelection;
    fn set_edge_selection(&mut self, selection: EdgeSelection);

    fn has_uv(&self) -> bool {
        false
    }

    fn uv_polygon(&self, _polygon: usize) -> Option<UvCorners> {
        None
    }

    fn set_uv_polygon(&mut self, _polygon: usize, _corners: UvCorners) {}

    /// Replaces the whole UV channel, which may change its row count. The
    /// default only reaches rows `set_uv_polygon` can already address.
    fn set_uv_corners(&mut self, corners: Vec<UvCorners>) {
        for (polygon, row) in corners.into_iter().enumerate() {
            self.set_uv_polygon(polygon, row);
        }
    }

    fn uv_snapshot(&self) -> Option<Vec<UvCorners>> {
        if !self.has_uv() {
            return None;
        }
        (0..self.polygon_count())
            .map(|polygon| self.uv_polygon(polygon))
            .collect()
    }

    fn weight_map_count(&self) -> usize {
        0
    }

    fn weight_map(&self, _index: usize) -> Option<Vec<f32>> {
        None
    }

    fn set_weight_map(&mut self, _index: usize, _values: Vec<f32>) {}

    fn vertex_color_count(&self) -> usize {
        0
    }

    fn vertex_colors(&self, _index: usize) -> Option<VertexColorTag> {
        None
    }

    fn set_vertex_colors(&mut self, _index: usize, _tag: VertexColorTag) {}

    fn notify(&mut self, notice: ChangeNotice);

    fn begin_transaction(&mut self);
    fn end_transaction(&mut self);
}
