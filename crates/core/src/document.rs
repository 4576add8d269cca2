use tracing::debug;

use crate::attributes::{check_len, UvCorners, UvTag, VertexColorTag, WeightMap};
use crate::error::{AttributeError, SplitError};
use crate::host::{ChangeNotice, SplitHost, TopologyStore};
use crate::mesh::{Polygon, PolygonMesh};
use crate::selection::EdgeSelection;

#[derive(Debug, Clone, PartialEq)]
struct DocumentSnapshot {
    mesh: PolygonMesh,
    uv: Option<UvTag>,
    weight_maps: Vec<WeightMap>,
    vertex_colors: Vec<VertexColorTag>,
    edge_selection: EdgeSelection,
}

#[derive(Debug, Clone, Default)]
struct UndoStack {
    past: Vec<DocumentSnapshot>,
    future: Vec<DocumentSnapshot>,
}

impl UndoStack {
    fn push(&mut self, snapshot: DocumentSnapshot) {
        self.past.push(snapshot);
        self.future.clear();
    }

    fn undo(&mut self, current: DocumentSnapshot) -> Option<DocumentSnapshot> {
        let prev = self.past.pop()?;
        self.future.push(current);
        Some(prev)
    }

    fn redo(&mut self, current: DocumentSnapshot) -> Option<DocumentSnapshot> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

/// A polygon object with its tags and edge selection, acting as the split host.
///
/// Resizing the topology only touches the mesh and the edge selection; each
/// attribute channel changes when it is written. The outermost transaction
/// records one undo step.
#[derive(Debug, Clone, Default)]
pub struct MeshDocument {
    mesh: PolygonMesh,
    uv: Option<UvTag>,
    weight_maps: Vec<WeightMap>,
    vertex_colors: Vec<VertexColorTag>,
    edge_selection: EdgeSelection,
    notices: Vec<ChangeNotice>,
    history: UndoStack,
    transaction_depth: usize,
}

impl MeshDocument {
    pub fn new(mesh: PolygonMesh) -> Self {
        let edge_selection = EdgeSelection::new(mesh.polygon_count());
        Self {
            mesh,
            edge_selection,
            ..Self::default()
        }
    }

    pub fn mesh(&self) -> &PolygonMesh {
        &self.mesh
    }

    pub fn uv(&self) -> Option<&UvTag> {
        self.uv.as_ref()
    }

    pub fn weight_maps(&self) -> &[WeightMap] {
        &self.weight_maps
    }

    pub fn weight_map_named(&self, name: &str) -> Option<&WeightMap> {
        self.weight_maps.iter().find(|map| map.name == name)
    }

    pub fn vertex_color_tags(&self) -> &[VertexColorTag] {
        &self.vertex_colors
    }

    pub fn selection(&self) -> &EdgeSelection {
        &self.edge_selection
    }

    pub fn selected_edges(&self) -> Vec<usize> {
        self.edge_selection.iter_selected().collect()
    }

    pub fn set_uv(&mut self, uv: UvTag) -> Result<(), AttributeError> {
        check_len(self.mesh.polygon_count(), uv.len())?;
        self.uv = Some(uv);
        Ok(())
    }

    pub fn clear_uv(&mut self) {
        self.uv = None;
    }

    pub fn add_weight_map(
        &mut self,
        name: impl Into<String>,
        values: Vec<f32>,
    ) -> Result<usize, AttributeError> {
        check_len(self.mesh.point_count(), values.len())?;
        self.weight_maps.push(WeightMap::new(name, values));
        Ok(self.weight_maps.len() - 1)
    }

    pub fn add_vertex_colors(&mut self, tag: VertexColorTag) -> Result<usize, AttributeError> {
        tag.check_len(self.mesh.point_count(), self.mesh.polygon_count())?;
        self.vertex_colors.push(tag);
        Ok(self.vertex_colors.len() - 1)
    }

    pub fn select_edges(&mut self, indices: &[usize]) -> Result<(), SplitError> {
        self.edge_selection = EdgeSelection::from_raw_indices(indices, self.mesh.polygon_count())?;
        Ok(())
    }

    pub fn notices(&self) -> &[ChangeNotice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<ChangeNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction_depth > 0
    }

    pub fn undo_depth(&self) -> usize {
        self.history.past.len()
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot_state();
        match self.history.undo(current) {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot_state();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn snapshot_state(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            mesh: self.mesh.clone(),
            uv: self.uv.clone(),
            weight_maps: self.weight_maps.clone(),
            vertex_colors: self.vertex_colors.clone(),
            edge_selection: self.edge_selection.clone(),
        }
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.mesh = snapshot.mesh;
        self.uv = snapshot.uv;
        self.weight_maps = snapshot.weight_maps;
        self.vertex_colors = snapshot.vertex_colors;
        self.edge_selection = snapshot.edge_selection;
        self.notices.push(ChangeNotice::Topology);
    }
}

impl TopologyStore for MeshDocument {
    fn point_count(&self) -> usize {
        self.mesh.point_count()
    }

    fn polygon_count(&self) -> usize {
        self.mesh.polygon_count()
    }

    fn point(&self, index: usize) -> Option<[f32; 3]> {
        self.mesh.point(index)
    }

    fn polygon(&self, index: usize) -> Option<Polygon> {
        self.mesh.polygon(index)
    }

    fn resize(&mut self, point_count: usize, polygon_count: usize) {
        self.mesh.resize(point_count, polygon_count);
        self.edge_selection.resize_for(polygon_count);
    }

    fn set_point(&mut self, index: usize, point: [f32; 3]) {
        self.mesh.set_point(index, point);
    }

    fn set_polygon(&mut self, index: usize, polygon: Polygon) {
        self.mesh.set_polygon(index, polygon);
    }

    fn snapshot(&self) -> PolygonMesh {
        self.mesh.clone()
    }
}

impl SplitHost for MeshDocument {
    fn edge_selection(&self) -> EdgeSelection {
        self.edge_selection.clone()
    }

    fn set_edge_selection(&mut self, selection: EdgeSelection) {
        self.edge_selection = selection;
    }

    fn has_uv(&self) -> bool {
        self.uv.is_some()
    }

    fn uv_polygon(&self, polygon: usize) -> Option<UvCorners> {
        self.uv.as_ref()?.corners.get(polygon).copied()
    }

    fn set_uv_polygon(&mut self, polygon: usize, corners: UvCorners) {
        if let Some(slot) = self
            .uv
            .as_mut()
            .and_then(|uv| uv.corners.get_mut(polygon))
        {
            *slot = corners;
        }
    }

    fn uv_snapshot(&self) -> Option<Vec<UvCorners>> {
        self.uv.as_ref().map(|uv| uv.corners.clone())
    }

    fn set_uv_corners(&mut self, corners: Vec<UvCorners>) {
        if let Some(uv) = &mut self.uv {
            uv.corners = corners;
        }
    }

    fn weight_map_count(&self) -> usize {
        self.weight_maps.len()
    }

    fn weight_map(&self, index: usize) -> Option<Vec<f32>> {
        self.weight_maps.get(index).map(|map| map.values.clone())
    }

    fn set_weight_map(&mut self, index: usize, values: Vec<f32>) {
        if let Some(map) = self.weight_maps.get_mut(index) {
            map.values = values;
        }
    }

    fn vertex_color_count(&self) -> usize {
        self.vertex_colors.len()
    }

    fn vertex_colors(&self, index: usize) -> Option<VertexColorTag> {
        self.vertex_colors.get(index).cloned()
    }

    fn set_vertex_colors(&mut self, index: usize, tag: VertexColorTag) {
        if let Some(slot) = self.vertex_colors.get_mut(index) {
            *slot = tag;
        }
    }

    fn notify(&mut self, notice: ChangeNotice) {
        debug!("document: {:?} changed", notice);
        self.notices.push(notice);
    }

    fn begin_transaction(&mut self) {
        if self.transaction_depth == 0 {
            let snapshot = self.snapshot_state();
            self.history.push(snapshot);
        }
        self.transaction_depth += 1;
    }

    fn end_transaction(&mut self) {
        self.transaction_depth = self.transaction_depth.saturating_sub(1);
    }
}
