use std::collections::{BTreeMap, HashMap};

use glam::{Vec2, Vec3};

use crate::attributes::UvCorners;
use crate::edge::{raw_edge_index, rotate_corners, LocalEdge};
use crate::mesh::Polygon;
use crate::split::plan::SplitPlan;
use crate::split::SplitMode;

/// New midpoint index to the two points it was averaged from. Only points the
/// split appended appear here.
pub type PointLineage = BTreeMap<u32, (u32, u32)>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitOutcome {
    pub points: Vec<[f32; 3]>,
    pub polygons: Vec<Polygon>,
    pub uvs: Option<Vec<UvCorners>>,
    pub lineage: PointLineage,
    /// Two raw edges per split: AB of the first and second polygon emitted.
    pub selection: Vec<usize>,
    pub reused_points: usize,
}

/// Exact-coordinate lookup. `-0.0` and `0.0` share a key; NaN never matches.
struct PointLookup {
    first_index: HashMap<[u32; 3], u32>,
}

impl PointLookup {
    fn new(points: &[[f32; 3]]) -> Self {
        let mut first_index = HashMap::with_capacity(points.len());
        for (index, point) in points.iter().enumerate() {
            if let Some(key) = point_key(*point) {
                first_index.entry(key).or_insert(index as u32);
            }
        }
        Self { first_index }
    }

    fn find(&self, point: [f32; 3]) -> Option<u32> {
        point_key(point).and_then(|key| self.first_index.get(&key).copied())
    }

    fn insert(&mut self, point: [f32; 3], index: u32) {
        if let Some(key) = point_key(point) {
            self.first_index.entry(key).or_insert(index);
        }
    }
}

fn point_key(point: [f32; 3]) -> Option<[u32; 3]> {
    if point.iter().any(|value| value.is_nan()) {
        return None;
    }
    Some(point.map(|value| (value + 0.0).to_bits()))
}

/// Point indices in `plan` must be valid for `points`; `plan_split` checks
/// this against the same mesh.
pub(crate) fn execute_plan(plan: SplitPlan, points: Vec<[f32; 3]>, mode: SplitMode) -> SplitOutcome {
    let SplitPlan {
        entries,
        kept_polygons: mut polygons,
        kept_uvs: mut uvs,
    } = plan;

    let mut points = points;
    let mut lookup = PointLookup::new(&points);
    let mut lineage = PointLineage::new();
    let mut selection = Vec::with_capacity(entries.len() * 2);
    let mut reused_points = 0;
    polygons.reserve(entries.len() * mode.polygons_per_split());

    for entry in entries {
        let [a, b, c, d] = entry.corners.rotated(entry.edge);
        let midpoint = ((Vec3::from(points[a as usize]) + Vec3::from(points[b as usize])) * 0.5)
            .to_array();

        let mid = match lookup.find(midpoint) {
            Some(existing) => {
                reused_points += 1;
                existing
            }
            None => {
                let index = points.len() as u32;
                points.push(midpoint);
                lookup.insert(midpoint, index);
                lineage.insert(index, (a, b));
                index
            }
        };

        let first = polygons.len();
        match mode {
            SplitMode::QuadPreserving => {
                polygons.push(Polygon::new(a, mid, d, d));
                polygons.push(Polygon::new(mid, b, c, d));
            }
            SplitMode::TriangleOnly => {
                polygons.push(Polygon::new(a, mid, d, d));
                polygons.push(Polygon::new(mid, b, c, c));
                polygons.push(Polygon::new(mid, c, d, d));
            }
        }

        if let (Some(out), Some(corners)) = (uvs.as_mut(), entry.uv) {
            split_uv_corners(out, corners, entry.edge, mode);
        }

        selection.push(raw_edge_index(first, LocalEdge::Ab));
        selection.push(raw_edge_index(first + 1, LocalEdge::Ab));
    }

    SplitOutcome {
        points,
        polygons,
        uvs,
        lineage,
        selection,
        reused_points,
    }
}

/// Same rotation and arity as the polygons, with the AB midpoint averaged.
fn split_uv_corners(out: &mut Vec<UvCorners>, corners: UvCorners, edge: LocalEdge, mode: SplitMode) {
    let [uva, uvb, uvc, uvd] = rotate_corners(corners, edge);
    let uv_mid = ((Vec2::from(uva) + Vec2::from(uvb)) * 0.5).to_array();
    match mode {
        SplitMode::QuadPreserving => {
            out.push([uva, uv_mid, uvd, uvd]);
            out.push([uv_mid, uvb, uvc, uvd]);
        }
        SplitMode::TriangleOnly => {
            out.push([uva, uv_mid, uvd, uvd]);
            out.push([uv_mid, uvb, uvc, uvc]);
            out.push([uv_mid, uvc, uvd, uvd]);
        }
    }
}
