use crate::attributes::{UvTag, VertexColor, VertexColorTag};
use crate::document::MeshDocument;
use crate::error::SplitError;
use crate::host::{ChangeNotice, SplitHost, TopologyStore};
use crate::mesh::{make_box, make_quad_grid, Polygon, PolygonMesh};

use super::{split_selected_edges, EdgeSplit, SplitMode, SplitParams};

fn unit_square() -> PolygonMesh {
    PolygonMesh::with_points_polygons(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ],
        vec![Polygon::new(0, 1, 2, 3)],
    )
}

fn square_document(edges: &[usize]) -> MeshDocument {
    let mut doc = MeshDocument::new(unit_square());
    doc.select_edges(edges).expect("select");
    doc
}

#[test]
fn unit_square_quad_mode() {
    let mut doc = square_document(&[0]);
    let report = EdgeSplit::with_mode(SplitMode::QuadPreserving)
        .apply(&mut doc)
        .expect("split");

    assert_eq!(doc.mesh().polygon_count(), 2);
    assert_eq!(doc.mesh().point_count(), 5);
    assert_eq!(doc.mesh().point(4), Some([0.5, 0.0, 0.0]));
    assert_eq!(report.split_polygons, 1);
    assert_eq!(report.new_points, 1);
    assert_eq!(report.polygons_after, 2);
}

#[test]
fn unit_square_triangle_mode() {
    let mut doc = square_document(&[0]);
    EdgeSplit::with_mode(SplitMode::TriangleOnly)
        .apply(&mut doc)
        .expect("split");

    assert_eq!(doc.mesh().polygon_count(), 3);
    assert_eq!(doc.mesh().point_count(), 5);
    assert_eq!(doc.mesh().triangle_count(), 3);
}

#[test]
fn midpoint_weight_is_half() {
    let mut doc = square_document(&[0]);
    doc.add_weight_map("weight", vec![0.0, 1.0, 0.0, 0.0])
        .expect("weights");
    EdgeSplit::default().apply(&mut doc).expect("split");

    let weights = &doc.weight_map_named("weight").expect("map").values;
    assert_eq!(weights.len(), 5);
    assert_eq!(weights[4], 0.5);
}

#[test]
fn ambiguous_selection_leaves_document_untouched() {
    let mut doc = square_document(&[0, 2]);
    let before = doc.mesh().clone();

    let result = EdgeSplit::default().apply(&mut doc);

    assert_eq!(
        result,
        Err(SplitError::AmbiguousSplit {
            polygon: 0,
            first_edge: 0,
            second_edge: 2
        })
    );
    assert_eq!(doc.mesh(), &before);
    assert_eq!(doc.mesh().point_count(), 4);
    assert_eq!(doc.mesh().polygon_count(), 1);
    assert_eq!(doc.selected_edges(), vec![0, 2]);
    assert!(doc.notices().is_empty());
    assert_eq!(doc.undo_depth(), 0);
}

#[test]
fn empty_selection_is_a_precondition_error() {
    let mut doc = square_document(&[]);
    let result = split_selected_edges(&mut doc, &SplitParams::default());
    assert_eq!(result, Err(SplitError::NoEdgesSelected));

    let mut empty = MeshDocument::new(PolygonMesh::new());
    assert_eq!(
        split_selected_edges(&mut empty, &SplitParams::default()),
        Err(SplitError::EmptyMesh)
    );
}

#[test]
fn dangling_corner_is_rejected_without_writing() {
    let mesh = PolygonMesh::with_points_polygons(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        vec![Polygon::new(0, 1, 2, 3)],
    );
    let mut doc = MeshDocument::new(mesh.clone());
    doc.select_edges(&[0]).expect("select");

    let result = EdgeSplit::default().apply(&mut doc);

    assert!(matches!(
        result,
        Err(SplitError::InvalidTopology { polygon: 0, point: 3, .. })
    ));
    assert_eq!(doc.mesh(), &mesh);
    assert_eq!(doc.undo_depth(), 0);
}

#[test]
fn counts_grow_per_split_polygon() {
    for mode in [SplitMode::QuadPreserving, SplitMode::TriangleOnly] {
        let mesh = make_quad_grid([3.0, 3.0], [3, 3]);
        let polygons_before = mesh.polygon_count();
        let points_before = mesh.point_count();
        let mut doc = MeshDocument::new(mesh);
        // One edge on each of four different polygons.
        doc.select_edges(&[0, 5, 18, 35]).expect("select");

        let report = EdgeSplit::with_mode(mode).apply(&mut doc).expect("split");

        let added = mode.polygons_per_split() - 1;
        assert_eq!(doc.mesh().polygon_count(), polygons_before + 4 * added);
        assert!(doc.mesh().point_count() <= points_before + 4);
        assert_eq!(report.points_after, doc.mesh().point_count());
        assert!(doc.mesh().validate().is_ok());
    }
}

#[test]
fn shared_edge_on_box_reuses_midpoint() {
    let mut doc = MeshDocument::new(make_box([2.0, 2.0, 2.0]));
    // -Z is (0, 3, 2, 1) with DA = 1-0; -Y is (0, 1, 5, 4) with AB = 0-1.
    doc.select_edges(&[3, 8]).expect("select");

    let report = EdgeSplit::default().apply(&mut doc).expect("split");

    assert_eq!(doc.mesh().point_count(), 9);
    assert_eq!(doc.mesh().polygon_count(), 8);
    assert_eq!(report.new_points, 1);
    assert_eq!(report.reused_points, 1);
    assert_eq!(doc.mesh().point(8), Some([0.0, -1.0, -1.0]));
}

#[test]
fn new_selection_marks_first_edge_of_first_two_new_polygons() {
    for mode in [SplitMode::QuadPreserving, SplitMode::TriangleOnly] {
        let mut doc = MeshDocument::new(make_quad_grid([2.0, 1.0], [2, 1]));
        doc.select_edges(&[1]).expect("select");

        let report = EdgeSplit::with_mode(mode).apply(&mut doc).expect("split");

        // Polygon 1 survives at index 0; the split polygons start at 1.
        assert_eq!(report.selection, vec![4, 8]);
        assert_eq!(doc.selected_edges(), vec![4, 8]);
        assert_eq!(doc.selection().len(), doc.mesh().edge_count());
    }
}

#[test]
fn uv_channel_follows_split() {
    let mut doc = square_document(&[0]);
    doc.set_uv(UvTag::new(vec![[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]))
        .expect("uv");

    EdgeSplit::default().apply(&mut doc).expect("split");

    let uv = doc.uv().expect("uv");
    assert_eq!(uv.len(), 2);
    assert_eq!(uv.corners[0], [[0.0, 0.0], [0.5, 0.0], [0.0, 1.0], [0.0, 1.0]]);
    assert_eq!(uv.corners[1], [[0.5, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
}

#[test]
fn missing_uv_channel_is_not_an_error() {
    let mut doc = square_document(&[0]);
    assert!(!doc.has_uv());
    EdgeSplit::default().apply(&mut doc).expect("split");
    assert!(doc.uv().is_none());
    assert!(!doc.notices().contains(&ChangeNotice::Uv));
}

#[test]
fn per_corner_colors_become_per_point() {
    let mut doc = square_document(&[0]);
    let red = VertexColor::new([1.0, 0.0, 0.0], 1.0);
    let blue = VertexColor::new([0.0, 0.0, 1.0], 0.0);
    doc.add_vertex_colors(VertexColorTag::per_corner("Cd", vec![red, blue, blue, red]))
        .expect("colors");

    EdgeSplit::default().apply(&mut doc).expect("split");

    let tag = &doc.vertex_color_tags()[0];
    assert!(tag.is_per_point());
    assert_eq!(tag.values.len(), 5);
    assert_eq!(tag.values[0], red);
    assert_eq!(tag.values[1], blue);
    assert_eq!(tag.values[4], VertexColor::new([0.5, 0.0, 0.5], 0.5));
}

#[test]
fn mismatched_weight_map_is_skipped() {
    let mut doc = square_document(&[0]);
    doc.add_weight_map("good", vec![0.0, 1.0, 1.0, 0.0])
        .expect("weights");
    // Bypass the length check to simulate a stale channel on the host side.
    doc.set_weight_map(0, vec![0.0, 1.0]);

    EdgeSplit::default().apply(&mut doc).expect("split");

    assert_eq!(doc.mesh().point_count(), 5);
    assert_eq!(doc.weight_maps()[0].values, vec![0.0, 1.0]);
    assert!(!doc.notices().contains(&ChangeNotice::WeightMap(0)));
}

#[test]
fn mismatched_channels_are_left_untouched() {
    let mut doc = square_document(&[0]);
    doc.add_weight_map("stale", vec![0.0; 4]).expect("weights");
    doc.add_weight_map("live", vec![0.0, 1.0, 0.0, 0.0])
        .expect("weights");
    doc.add_vertex_colors(VertexColorTag::per_point("Cd", vec![VertexColor::WHITE; 4]))
        .expect("colors");
    doc.set_uv(UvTag::new(vec![[[0.0, 0.0]; 4]])).expect("uv");

    // Stale host-side channels: wrong lengths for the current topology.
    let stale_colors = VertexColorTag::per_point("Cd", vec![VertexColor::WHITE; 3]);
    let stale_uv = vec![[[0.25, 0.25]; 4]; 2];
    doc.set_weight_map(0, vec![0.5, 0.5]);
    doc.set_vertex_colors(0, stale_colors.clone());
    doc.set_uv_corners(stale_uv.clone());

    EdgeSplit::default().apply(&mut doc).expect("split");

    assert_eq!(doc.weight_maps()[0].values, vec![0.5, 0.5]);
    assert_eq!(doc.weight_maps()[1].values, vec![0.0, 1.0, 0.0, 0.0, 0.5]);
    assert_eq!(doc.vertex_color_tags()[0], stale_colors);
    assert_eq!(doc.uv().map(|uv| uv.corners.clone()), Some(stale_uv));
    assert_eq!(
        doc.take_notices(),
        vec![
            ChangeNotice::Topology,
            ChangeNotice::EdgeSelection,
            ChangeNotice::WeightMap(1),
        ]
    );
}

#[test]
fn notices_follow_commit_order() {
    let mut doc = square_document(&[0]);
    doc.add_weight_map("w", vec![0.0; 4]).expect("weights");
    doc.add_vertex_colors(VertexColorTag::per_point("Cd", vec![VertexColor::WHITE; 4]))
        .expect("colors");
    doc.set_uv(UvTag::new(vec![[[0.0, 0.0]; 4]])).expect("uv");

    EdgeSplit::default().apply(&mut doc).expect("split");

    assert_eq!(
        doc.take_notices(),
        vec![
            ChangeNotice::Topology,
            ChangeNotice::EdgeSelection,
            ChangeNotice::WeightMap(0),
            ChangeNotice::VertexColors(0),
            ChangeNotice::Uv,
        ]
    );
}

#[test]
fn split_is_a_single_undo_step() {
    let mut doc = square_document(&[0]);
    doc.add_weight_map("w", vec![0.0, 1.0, 0.0, 0.0])
        .expect("weights");
    let before = doc.mesh().clone();

    EdgeSplit::with_mode(SplitMode::TriangleOnly)
        .apply(&mut doc)
        .expect("split");
    assert_eq!(doc.undo_depth(), 1);

    assert!(doc.undo());
    assert_eq!(doc.mesh(), &before);
    assert_eq!(doc.weight_maps()[0].values.len(), 4);
    assert_eq!(doc.selected_edges(), vec![0]);
}

#[test]
fn prepare_does_not_write() {
    let doc = square_document(&[0]);
    let prepared = EdgeSplit::default().prepare(&doc).expect("prepare");
    assert_eq!(prepared.outcome().polygons.len(), 2);
    assert_eq!(doc.mesh().polygon_count(), 1);
    assert!(doc.notices().is_empty());
}

#[test]
fn commit_writes_every_slot() {
    let mut doc = MeshDocument::new(make_quad_grid([2.0, 2.0], [2, 2]));
    doc.select_edges(&[1, 6, 11, 12]).expect("select");
    let prepared = EdgeSplit::default().prepare(&doc).expect("prepare");
    let expected = prepared.outcome().clone();

    prepared.commit(&mut doc);

    assert_eq!(doc.mesh().points, expected.points);
    assert_eq!(doc.mesh().polygons, expected.polygons);
    assert!(doc
        .mesh()
        .polygons
        .iter()
        .all(|poly| (poly.max_index() as usize) < doc.point_count()));
}

#[test]
fn modifier_selects_triangle_mode() {
    assert_eq!(SplitMode::from_modifier(true), SplitMode::TriangleOnly);
    assert_eq!(SplitMode::from_modifier(false), SplitMode::QuadPreserving);
    assert_eq!(SplitParams::default().mode, SplitMode::QuadPreserving);
}
