//! Edges are never stored. A raw edge index addresses one side of one polygon:
//! `polygon * 4 + local`, where local 0..4 is AB, BC, CD, DA.

use serde::{Deserialize, Serialize};

use crate::mesh::PolygonMesh;

pub const EDGES_PER_POLYGON: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocalEdge {
    Ab,
    Bc,
    Cd,
    Da,
}

impl LocalEdge {
    pub const ALL: [LocalEdge; 4] = [LocalEdge::Ab, LocalEdge::Bc, LocalEdge::Cd, LocalEdge::Da];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            LocalEdge::Ab => 0,
            LocalEdge::Bc => 1,
            LocalEdge::Cd => 2,
            LocalEdge::Da => 3,
        }
    }
}

pub fn edge_count(polygon_count: usize) -> usize {
    polygon_count * EDGES_PER_POLYGON
}

pub fn raw_edge_index(polygon: usize, edge: LocalEdge) -> usize {
    polygon * EDGES_PER_POLYGON + edge.index()
}

pub fn decode_raw_edge(raw: usize) -> (usize, LocalEdge) {
    let edge = match raw % EDGES_PER_POLYGON {
        0 => LocalEdge::Ab,
        1 => LocalEdge::Bc,
        2 => LocalEdge::Cd,
        _ => LocalEdge::Da,
    };
    (raw / EDGES_PER_POLYGON, edge)
}

/// Rotates a corner record so `edge` ends up in the AB slot.
pub fn rotate_corners<T: Copy>(corners: [T; 4], edge: LocalEdge) -> [T; 4] {
    let [c0, c1, c2, c3] = corners;
    match edge {
        LocalEdge::Ab => [c0, c1, c2, c3],
        LocalEdge::Bc => [c1, c2, c3, c0],
        LocalEdge::Cd => [c2, c3, c0, c1],
        LocalEdge::Da => [c3, c0, c1, c2],
    }
}

pub fn edge_points(mesh: &PolygonMesh, raw: usize) -> Option<(u32, u32)> {
    let (polygon, edge) = decode_raw_edge(raw);
    mesh.polygons.get(polygon).map(|poly| poly.edge(edge))
}
