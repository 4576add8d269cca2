//! Splitting selected edges of quad-encoded polygon meshes.
//!
//! Each selected raw edge splits its polygon at the edge midpoint. The default
//! mode replaces the polygon with a triangle and a quad; the triangle mode
//! (held modifier) replaces it with three triangles. UVs, weight maps and
//! vertex colors are carried over and the edge selection is rebuilt on the new
//! polygons.
//!
//! The operation runs in two steps. [`EdgeSplit::prepare`] reads the host,
//! validates the selection and computes every new value without writing
//! anything. [`PreparedSplit::commit`] then writes the result inside one host
//! transaction. A rejected selection leaves the host untouched.
//!
//! Running the split twice on the same edges subdivides again; it is not
//! idempotent.

mod execute;
mod interpolate;
mod plan;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::attributes::VertexColorTag;
use crate::error::SplitError;
use crate::host::{ChangeNotice, SplitHost};
use crate::selection::{rebuild_selection, EdgeSelection};

use execute::execute_plan;
pub use execute::{PointLineage, SplitOutcome};
pub use interpolate::{interpolate_colors, interpolate_weights, promote_corner_colors};
pub use plan::{plan_split, SplitEntry, SplitPlan};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitMode {
    /// Triangle `(a, mid, d, d)` plus quad `(mid, b, c, d)`.
    #[default]
    QuadPreserving,
    /// Triangles `(a, mid, d, d)`, `(mid, b, c, c)` and `(mid, c, d, d)`.
    TriangleOnly,
}

impl SplitMode {
    pub fn from_modifier(shift_held: bool) -> Self {
        if shift_held {
            SplitMode::TriangleOnly
        } else {
            SplitMode::QuadPreserving
        }
    }

    pub fn polygons_per_split(self) -> usize {
        match self {
            SplitMode::QuadPreserving => 2,
            SplitMode::TriangleOnly => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParams {
    pub mode: SplitMode,
}

impl SplitParams {
    pub fn with_mode(mode: SplitMode) -> Self {
        Self { mode }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReport {
    pub mode: SplitMode,
    pub split_polygons: usize,
    pub new_points: usize,
    pub reused_points: usize,
    pub points_before: usize,
    pub points_after: usize,
    pub polygons_before: usize,
    pub polygons_after: usize,
    pub selection: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct EdgeSplit {
    params: SplitParams,
}

impl EdgeSplit {
    pub fn new(params: SplitParams) -> Self {
        Self { params }
    }

    pub fn with_mode(mode: SplitMode) -> Self {
        Self::new(SplitParams::with_mode(mode))
    }

    pub fn params(&self) -> &SplitParams {
        &self.params
    }

    /// Validates the host's current edge selection and computes the full
    /// result. Nothing is written to the host.
    pub fn prepare<H: SplitHost + ?Sized>(&self, host: &H) -> Result<PreparedSplit, SplitError> {
        let mode = self.params.mode;
        let polygon_count = host.polygon_count();
        if polygon_count == 0 {
            return Err(SplitError::EmptyMesh);
        }

        let current_selection = host.edge_selection();
        let selected = current_selection.to_raw_indices(polygon_count)?;
        if selected.is_empty() {
            return Err(SplitError::NoEdgesSelected);
        }

        let mesh = host.snapshot();
        let points_before = mesh.point_count();
        let uvs = match host.uv_snapshot() {
            Some(uvs) if uvs.len() == polygon_count => Some(uvs),
            Some(uvs) => {
                warn!(
                    "edge split: UV channel has {} rows for {} polygons; skipping",
                    uvs.len(),
                    polygon_count
                );
                None
            }
            None => None,
        };

        let plan = plan_split(&selected, &mesh.polygons, uvs.as_deref(), points_before)?;
        let split_polygons = plan.len();
        let outcome = execute_plan(plan, mesh.points.clone(), mode);
        let points_after = outcome.points.len();

        let mut weight_maps = Vec::new();
        for index in 0..host.weight_map_count() {
            match host.weight_map(index) {
                Some(values) if values.len() == points_before => {
                    let values = interpolate_weights(&values, points_after, &outcome.lineage);
                    weight_maps.push((index, values));
                }
                Some(values) => warn!(
                    "edge split: weight map {} has {} values for {} points; skipping",
                    index,
                    values.len(),
                    points_before
                ),
                None => debug!("edge split: weight map {} unavailable", index),
            }
        }

        let mut vertex_colors = Vec::new();
        for index in 0..host.vertex_color_count() {
            match host.vertex_colors(index) {
                Some(tag) if tag.check_len(points_before, polygon_count).is_ok() => {
                    if !tag.is_per_point() {
                        debug!(
                            "edge split: converting vertex colors '{}' to per-point",
                            tag.name
                        );
                    }
                    let tag = interpolate_colors(
                        &tag,
                        &mesh.polygons,
                        points_before,
                        points_after,
                        &outcome.lineage,
                    );
                    vertex_colors.push((index, tag));
                }
                Some(tag) => warn!(
                    "edge split: vertex colors '{}' have {} values, expected {}; skipping",
                    tag.name,
                    tag.values.len(),
                    tag.expected_len(points_before, polygon_count)
                ),
                None => debug!("edge split: vertex colors {} unavailable", index),
            }
        }

        let mut selection = current_selection;
        rebuild_selection(&mut selection, outcome.polygons.len(), &outcome.selection)?;

        debug!(
            "edge split planned: {} polygons, {} new points, {:?}",
            split_polygons,
            outcome.lineage.len(),
            mode
        );

        Ok(PreparedSplit {
            mode,
            split_polygons,
            points_before,
            polygons_before: polygon_count,
            outcome,
            selection,
            weight_maps,
            vertex_colors,
        })
    }

    /// Prepares and commits in one call.
    pub fn apply<H: SplitHost + ?Sized>(&self, host: &mut H) -> Result<SplitReport, SplitError> {
        match self.prepare(host) {
            Ok(prepared) => Ok(prepared.commit(host)),
            Err(err) => {
                warn!("edge split rejected: {err}");
                Err(err)
            }
        }
    }
}

/// A validated split whose every value is already computed.
#[derive(Debug, Clone)]
pub struct PreparedSplit {
    mode: SplitMode,
    split_polygons: usize,
    points_before: usize,
    polygons_before: usize,
    outcome: SplitOutcome,
    selection: EdgeSelection,
    weight_maps: Vec<(usize, Vec<f32>)>,
    vertex_colors: Vec<(usize, VertexColorTag)>,
}

impl PreparedSplit {
    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    pub fn outcome(&self) -> &SplitOutcome {
        &self.outcome
    }

    pub fn selection(&self) -> &EdgeSelection {
        &self.selection
    }

    /// Writes the split into `host` as one transaction. Cannot fail: all
    /// validation happened in [`EdgeSplit::prepare`].
    pub fn commit<H: SplitHost + ?Sized>(self, host: &mut H) -> SplitReport {
        let PreparedSplit {
            mode,
            split_polygons,
            points_before,
            polygons_before,
            outcome,
            selection,
            weight_maps,
            vertex_colors,
        } = self;
        let SplitOutcome {
            points,
            polygons,
            uvs,
            lineage,
            selection: selected_edges,
            reused_points,
        } = outcome;

        host.begin_transaction();

        host.resize(points.len(), polygons.len());
        for (index, point) in points.iter().enumerate() {
            host.set_point(index, *point);
        }
        for (index, polygon) in polygons.iter().enumerate() {
            host.set_polygon(index, *polygon);
        }
        host.notify(ChangeNotice::Topology);

        host.set_edge_selection(selection);
        host.notify(ChangeNotice::EdgeSelection);

        for (index, values) in weight_maps {
            host.set_weight_map(index, values);
            host.notify(ChangeNotice::WeightMap(index));
        }

        for (index, tag) in vertex_colors {
            host.set_vertex_colors(index, tag);
            host.notify(ChangeNotice::VertexColors(index));
        }

        if let Some(uvs) = uvs {
            host.set_uv_corners(uvs);
            host.notify(ChangeNotice::Uv);
        }

        host.end_transaction();

        let report = SplitReport {
            mode,
            split_polygons,
            new_points: lineage.len(),
            reused_points,
            points_before,
            points_after: points.len(),
            polygons_before,
            polygons_after: polygons.len(),
            selection: selected_edges,
        };
        info!(
            "edge split: {} polygons split, points {} -> {}, polygons {} -> {}",
            report.split_polygons,
            report.points_before,
            report.points_after,
            report.polygons_before,
            report.polygons_after
        );
        report
    }
}

/// Splits the host's selected edges with `params`.
pub fn split_selected_edges<H: SplitHost + ?Sized>(
    host: &mut H,
    params: &SplitParams,
) -> Result<SplitReport, SplitError> {
    EdgeSplit::new(params.clone()).apply(host)
}
