use serde::{Deserialize, Serialize};

use crate::edge::EDGES_PER_POLYGON;
use crate::error::AttributeError;

pub type UvCorners = [[f32; 2]; 4];

/// Four UV coordinates per polygon, index-aligned with the polygon corners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UvTag {
    pub corners: Vec<UvCorners>,
}

impl UvTag {
    pub fn new(corners: Vec<UvCorners>) -> Self {
        Self { corners }
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }
}

/// One scalar per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMap {
    pub name: String,
    pub values: Vec<f32>,
}

impl WeightMap {
    pub fn new(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexColor {
    pub rgb: [f32; 3],
    pub alpha: f32,
}

impl VertexColor {
    pub const WHITE: VertexColor = VertexColor {
        rgb: [1.0, 1.0, 1.0],
        alpha: 1.0,
    };

    pub fn new(rgb: [f32; 3], alpha: f32) -> Self {
        Self { rgb, alpha }
    }
}

impl Default for VertexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorDomain {
    /// One value per point.
    Point,
    /// One value per polygon corner, `polygon * 4 + corner`.
    Corner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexColorTag {
    pub name: String,
    pub domain: ColorDomain,
    pub values: Vec<VertexColor>,
}

impl VertexColorTag {
    pub fn per_point(name: impl Into<String>, values: Vec<VertexColor>) -> Self {
        Self {
            name: name.into(),
            domain: ColorDomain::Point,
            values,
        }
    }

    pub fn per_corner(name: impl Into<String>, values: Vec<VertexColor>) -> Self {
        Self {
            name: name.into(),
            domain: ColorDomain::Corner,
            values,
        }
    }

    pub fn is_per_point(&self) -> bool {
        self.domain == ColorDomain::Point
    }

    pub fn expected_len(&self, point_count: usize, polygon_count: usize) -> usize {
        color_domain_len(self.domain, point_count, polygon_count)
    }

    pub fn check_len(&self, point_count: usize, polygon_count: usize) -> Result<(), AttributeError> {
        check_len(
            self.expected_len(point_count, polygon_count),
            self.values.len(),
        )
    }
}

pub fn color_domain_len(domain: ColorDomain, point_count: usize, polygon_count: usize) -> usize {
    match domain {
        ColorDomain::Point => point_count,
        ColorDomain::Corner => polygon_count * EDGES_PER_POLYGON,
    }
}

pub fn check_len(expected: usize, actual: usize) -> Result<(), AttributeError> {
    if expected != actual {
        return Err(AttributeError::InvalidLength { expected, actual });
    }
    Ok(())
}
