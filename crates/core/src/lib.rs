mod attributes;
mod document;
mod edge;
mod error;
mod host;
mod mesh;
mod obj_io;
mod scene_file;
mod selection;
mod split;

pub use attributes::{
    check_len, color_domain_len, ColorDomain, UvCorners, UvTag, VertexColor, VertexColorTag,
    WeightMap,
};
pub use document::MeshDocument;
pub use edge::{
    decode_raw_edge, edge_count, edge_points, raw_edge_index, rotate_corners, LocalEdge,
    EDGES_PER_POLYGON,
};
pub use error::{AttributeError, ErrorKind, IoError, Result, SplitError};
pub use host::{ChangeNotice, SplitHost, TopologyStore};
pub use mesh::{make_box, make_quad_grid, Aabb, Polygon, PolygonMesh};
pub use obj_io::{load_obj, load_obj_bytes, write_obj, write_obj_to};
pub use scene_file::{load_scene, parse_scene, save_scene, SceneFile, SCENE_VERSION};
pub use selection::{rebuild_selection, EdgeSelection};
pub use split::{
    interpolate_colors, interpolate_weights, plan_split, promote_corner_colors,
    split_selected_edges, EdgeSplit, PointLineage, PreparedSplit, SplitEntry, SplitMode,
    SplitOutcome, SplitParams, SplitPlan, SplitReport,
};
