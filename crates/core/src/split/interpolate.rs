use glam::Vec3;

use crate::attributes::{ColorDomain, VertexColor, VertexColorTag};
use crate::mesh::Polygon;
use crate::split::execute::PointLineage;

/// Extends a per-point weight map to `point_count` and fills each new midpoint
/// with the mean of its two source points.
pub fn interpolate_weights(values: &[f32], point_count: usize, lineage: &PointLineage) -> Vec<f32> {
    let mut out = values.to_vec();
    out.resize(point_count, 0.0);
    for (&mid, &(a, b)) in lineage {
        let (Some(va), Some(vb)) = (values.get(a as usize), values.get(b as usize)) else {
            continue;
        };
        if let Some(slot) = out.get_mut(mid as usize) {
            *slot = (va + vb) * 0.5;
        }
    }
    out
}

/// Averages every corner that references a point. A triangle's repeated last
/// corner is counted once. Unreferenced points become opaque white.
pub fn promote_corner_colors(
    values: &[VertexColor],
    polygons: &[Polygon],
    point_count: usize,
) -> Vec<VertexColor> {
    let mut rgb_sum = vec![Vec3::ZERO; point_count];
    let mut alpha_sum = vec![0.0f32; point_count];
    let mut counts = vec![0u32; point_count];

    for (poly_index, polygon) in polygons.iter().enumerate() {
        let corners = polygon.corners();
        let corner_count = if polygon.is_triangle() { 3 } else { 4 };
        for (corner, &point) in corners.iter().enumerate().take(corner_count) {
            let Some(color) = values.get(poly_index * 4 + corner) else {
                continue;
            };
            let point = point as usize;
            if point >= point_count {
                continue;
            }
            rgb_sum[point] += Vec3::from(color.rgb);
            alpha_sum[point] += color.alpha;
            counts[point] += 1;
        }
    }

    (0..point_count)
        .map(|point| {
            let count = counts[point];
            if count == 0 {
                return VertexColor::WHITE;
            }
            let inv = 1.0 / count as f32;
            VertexColor::new((rgb_sum[point] * inv).to_array(), alpha_sum[point] * inv)
        })
        .collect()
}

/// Returns the channel in per-point mode, extended to `point_count` with the
/// midpoints interpolated. A per-corner channel is converted first using the
/// polygons it was authored against; that conversion is permanent.
pub fn interpolate_colors(
    tag: &VertexColorTag,
    polygons_before: &[Polygon],
    points_before: usize,
    point_count: usize,
    lineage: &PointLineage,
) -> VertexColorTag {
    let per_point = match tag.domain {
        ColorDomain::Point => tag.values.clone(),
        ColorDomain::Corner => promote_corner_colors(&tag.values, polygons_before, points_before),
    };

    let mut out = per_point.clone();
    out.resize(point_count, VertexColor::WHITE);
    for (&mid, &(a, b)) in lineage {
        let (Some(ca), Some(cb)) = (per_point.get(a as usize), per_point.get(b as usize)) else {
            continue;
        };
        if let Some(slot) = out.get_mut(mid as usize) {
            let rgb = (Vec3::from(ca.rgb) + Vec3::from(cb.rgb)) * 0.5;
            let alpha = (ca.alpha + cb.alpha) * 0.5;
            *slot = VertexColor::new(rgb.to_array(), alpha);
        }
    }

    VertexColorTag::per_point(tag.name.clone(), out)
}
