use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::attributes::UvCorners;
use crate::edge::{decode_raw_edge, edge_count, LocalEdge};
use crate::error::SplitError;
use crate::mesh::Polygon;

/// A polygon taken out of the live sequence, waiting to be replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitEntry {
    /// Index in the mesh the plan was built from.
    pub polygon: usize,
    pub raw_edge: usize,
    pub edge: LocalEdge,
    pub corners: Polygon,
    pub uv: Option<UvCorners>,
}

/// Staged entries plus what remains of the polygon (and UV) sequence once they
/// are removed. Kept records preserve their relative order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitPlan {
    pub entries: Vec<SplitEntry>,
    pub kept_polygons: Vec<Polygon>,
    pub kept_uvs: Option<Vec<UvCorners>>,
}

impl SplitPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stages one split per selected raw edge.
///
/// Two raw edges on the same polygon are rejected. Two polygons that share a
/// geometric edge have distinct raw edges and are both split.
pub fn plan_split(
    selected: &[usize],
    polygons: &[Polygon],
    uvs: Option<&[UvCorners]>,
    point_count: usize,
) -> Result<SplitPlan, SplitError> {
    let edge_count = edge_count(polygons.len());
    let mut live = polygons.to_vec();
    let mut live_uvs = uvs.map(|uvs| uvs.to_vec());
    let mut staged: HashMap<usize, usize> = HashMap::new();
    let mut removed = BTreeSet::new();
    let mut entries = Vec::with_capacity(selected.len());

    for &raw in selected {
        if raw >= edge_count {
            return Err(SplitError::InvalidIndex {
                index: raw,
                edge_count,
            });
        }
        let (pid, edge) = decode_raw_edge(raw);
        if let Some(&first_edge) = staged.get(&pid) {
            return Err(SplitError::AmbiguousSplit {
                polygon: pid,
                first_edge,
                second_edge: raw,
            });
        }

        let corners = polygons[pid];
        let max = corners.max_index() as usize;
        if max >= point_count {
            return Err(SplitError::InvalidTopology {
                polygon: pid,
                point: max,
                point_count,
            });
        }

        // Positions below pid that were already taken out shift it down.
        let live_index = pid - removed.range(..pid).count();
        let poly = live.remove(live_index);
        let uv = live_uvs.as_mut().map(|uvs| uvs.remove(live_index));

        staged.insert(pid, raw);
        removed.insert(pid);
        entries.push(SplitEntry {
            polygon: pid,
            raw_edge: raw,
            edge,
            corners: poly,
            uv,
        });
    }

    debug!(
        "split plan: {} polygons staged, {} kept",
        entries.len(),
        live.len()
    );

    Ok(SplitPlan {
        entries,
        kept_polygons: live,
        kept_uvs: live_uvs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::make_quad_grid;

    #[test]
    fn stages_polygon_and_removes_it_from_live_sequence() {
        let mesh = make_quad_grid([3.0, 1.0], [3, 1]);
        let plan = plan_split(&[5], &mesh.polygons, None, mesh.point_count()).expect("plan");
        assert_eq!(plan.len(), 1);
        let entry = &plan.entries[0];
        assert_eq!(entry.polygon, 1);
        assert_eq!(entry.edge, LocalEdge::Bc);
        assert_eq!(entry.corners, mesh.polygons[1]);
        assert_eq!(plan.kept_polygons, vec![mesh.polygons[0], mesh.polygons[2]]);
        assert!(plan.kept_uvs.is_none());
    }

    #[test]
    fn index_correction_handles_descending_input() {
        let mesh = make_quad_grid([4.0, 1.0], [4, 1]);
        let plan = plan_split(&[12, 0, 9], &mesh.polygons, None, mesh.point_count())
            .expect("plan");
        let staged: Vec<_> = plan.entries.iter().map(|entry| entry.corners).collect();
        assert_eq!(
            staged,
            vec![mesh.polygons[3], mesh.polygons[0], mesh.polygons[2]]
        );
        assert_eq!(plan.kept_polygons, vec![mesh.polygons[1]]);
    }

    #[test]
    fn uv_rows_follow_their_polygons() {
        let mesh = make_quad_grid([2.0, 1.0], [2, 1]);
        let uvs = vec![[[0.0, 0.0]; 4], [[1.0, 1.0]; 4]];
        let plan =
            plan_split(&[0], &mesh.polygons, Some(&uvs), mesh.point_count()).expect("plan");
        assert_eq!(plan.entries[0].uv, Some([[0.0, 0.0]; 4]));
        assert_eq!(plan.kept_uvs, Some(vec![[[1.0, 1.0]; 4]]));
    }

    #[test]
    fn two_edges_of_one_polygon_are_ambiguous() {
        let mesh = make_quad_grid([1.0, 1.0], [1, 1]);
        let result = plan_split(&[0, 2], &mesh.polygons, None, mesh.point_count());
        assert_eq!(
            result,
            Err(SplitError::AmbiguousSplit {
                polygon: 0,
                first_edge: 0,
                second_edge: 2
            })
        );
    }

    #[test]
    fn shared_geometric_edge_splits_both_polygons() {
        let mesh = make_quad_grid([2.0, 1.0], [2, 1]);
        // Polygon 0 edge CD and polygon 1 edge AB are the same segment.
        let plan = plan_split(&[2, 4], &mesh.polygons, None, mesh.point_count()).expect("plan");
        assert_eq!(plan.len(), 2);
        assert!(plan.kept_polygons.is_empty());
    }

    #[test]
    fn out_of_range_edge_is_invalid() {
        let mesh = make_quad_grid([1.0, 1.0], [1, 1]);
        let result = plan_split(&[4], &mesh.polygons, None, mesh.point_count());
        assert!(matches!(result, Err(SplitError::InvalidIndex { index: 4, .. })));
    }

    #[test]
    fn dangling_corner_is_rejected_before_staging() {
        let polygons = vec![Polygon::new(0, 1, 2, 9)];
        let result = plan_split(&[1], &polygons, None, 4);
        assert!(matches!(
            result,
            Err(SplitError::InvalidTopology { polygon: 0, point: 9, .. })
        ));
    }
}
