use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attributes::{UvTag, VertexColorTag, WeightMap};
use crate::document::MeshDocument;
use crate::error::IoError;
use crate::mesh::PolygonMesh;
use crate::split::SplitParams;

pub const SCENE_VERSION: u32 = 1;

/// On-disk form of a [`MeshDocument`]. Undo history and change notices are
/// session state and are not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub version: u32,
    pub mesh: PolygonMesh,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<UvTag>,
    #[serde(default)]
    pub weight_maps: Vec<WeightMap>,
    #[serde(default)]
    pub vertex_colors: Vec<VertexColorTag>,
    #[serde(default)]
    pub selected_edges: Vec<usize>,
    #[serde(default)]
    pub split: SplitParams,
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            version: SCENE_VERSION,
            mesh: PolygonMesh::default(),
            uv: None,
            weight_maps: Vec::new(),
            vertex_colors: Vec::new(),
            selected_edges: Vec::new(),
            split: SplitParams::default(),
        }
    }
}

impl SceneFile {
    pub fn from_document(document: &MeshDocument, split: SplitParams) -> Self {
        Self {
            version: SCENE_VERSION,
            mesh: document.mesh().clone(),
            uv: document.uv().cloned(),
            weight_maps: document.weight_maps().to_vec(),
            vertex_colors: document.vertex_color_tags().to_vec(),
            selected_edges: document.selected_edges(),
            split,
        }
    }

    pub fn into_document(self) -> Result<MeshDocument, IoError> {
        if self.version > SCENE_VERSION {
            return Err(IoError::UnsupportedVersion {
                found: self.version,
                supported: SCENE_VERSION,
            });
        }
        self.mesh.validate()?;

        let mut document = MeshDocument::new(self.mesh);
        if let Some(uv) = self.uv {
            document.set_uv(uv)?;
        }
        for map in self.weight_maps {
            document.add_weight_map(map.name, map.values)?;
        }
        for tag in self.vertex_colors {
            document.add_vertex_colors(tag)?;
        }
        document.select_edges(&self.selected_edges)?;
        Ok(document)
    }
}

pub fn parse_scene(data: &[u8]) -> Result<SceneFile, IoError> {
    Ok(serde_json::from_slice(data)?)
}

pub fn load_scene(path: &Path) -> Result<SceneFile, IoError> {
    let data = std::fs::read(path)?;
    parse_scene(&data)
}

pub fn save_scene(path: &Path, scene: &SceneFile) -> Result<(), IoError> {
    let data = serde_json::to_vec_pretty(scene)?;
    std::fs::write(path, data)?;
    Ok(())
}
