use crate::collaborators::ElementSource;
use crate::element::{Circle, ElementId, LineSegment, MapPoint, Polygon};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to read project: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid project file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub circles: Vec<Circle>,
    #[serde(default)]
    pub line_segments: Vec<LineSegment>,
    #[serde(default)]
    pub points: Vec<MapPoint>,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
}

impl Project {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let data = fs_err::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn circle(&self, id: &ElementId) -> Option<&Circle> {
        self.circles.iter().find(|c| &c.id == id)
    }

    pub fn line_segment(&self, id: &ElementId) -> Option<&LineSegment> {
        self.line_segments.iter().find(|l| &l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
            && self.line_segments.is_empty()
            && self.points.is_empty()
            && self.polygons.is_empty()
    }
}

impl ElementSource for Project {
    fn circles(&self) -> Vec<Circle> {
        self.circles.clone()
    }

    fn line_segments(&self) -> Vec<LineSegment> {
        self.line_segments.clone()
    }

    fn points(&self) -> Vec<MapPoint> {
        self.points.clone()
    }

    fn polygons(&self) -> Vec<Polygon> {
        self.polygons.clone()
    }
}
