use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The selection cannot be split as asked.
    Validation,
    /// There is nothing to operate on.
    Precondition,
}

/// Every variant is raised before the first write to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error(
        "polygon {polygon} would be split more than once (raw edges {first_edge} and \
         {second_edge}); select only one edge per polygon"
    )]
    AmbiguousSplit {
        polygon: usize,
        first_edge: usize,
        second_edge: usize,
    },

    #[error("raw edge index {index} is out of range for {edge_count} edges")]
    InvalidIndex { index: usize, edge_count: usize },

    #[error("polygon {polygon} references point {point} but the mesh has {point_count} points")]
    InvalidTopology {
        polygon: usize,
        point: usize,
        point_count: usize,
    },

    #[error("select a polygon mesh with at least one edge selected")]
    NoEdgesSelected,

    #[error("the mesh has no polygons")]
    EmptyMesh,
}

impl SplitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SplitError::AmbiguousSplit { .. }
            | SplitError::InvalidIndex { .. }
            | SplitError::InvalidTopology { .. } => ErrorKind::Validation,
            SplitError::NoEdgesSelected | SplitError::EmptyMesh => ErrorKind::Precondition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("attribute has {actual} values, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OBJ load failed: {0}")]
    Obj(String),

    #[error("face {face} has {arity} corners; only triangles and quads are supported")]
    UnsupportedFace { face: usize, arity: usize },

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("scene version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

impl From<AttributeError> for IoError {
    fn from(err: AttributeError) -> Self {
        IoError::InvalidScene(err.to_string())
    }
}

impl From<SplitError> for IoError {
    fn from(err: SplitError) -> Self {
        IoError::InvalidScene(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_split_message_names_polygon() {
        let err = SplitError::AmbiguousSplit {
            polygon: 3,
            first_edge: 12,
            second_edge: 14,
        };
        let text = format!("{err}");
        assert!(text.contains("polygon 3"));
        assert!(text.contains("one edge per polygon"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn missing_selection_is_a_precondition() {
        assert_eq!(SplitError::NoEdgesSelected.kind(), ErrorKind::Precondition);
        assert_eq!(SplitError::EmptyMesh.kind(), ErrorKind::Precondition);
        assert_eq!(
            SplitError::InvalidIndex {
                index: 8,
                edge_count: 4
            }
            .kind(),
            ErrorKind::Validation
        );
    }
}
