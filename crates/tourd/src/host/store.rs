use mapnav::collaborators::ElementSource;
use mapnav::element::{Circle, ElementId, LineSegment, MapPoint, Polygon};
use mapnav::project::{Project, ProjectError};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// The loaded project, shared with the file watcher thread.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    inner: Arc<RwLock<Project>>,
}

impl ProjectStore {
    pub fn new(project: Project) -> Self {
        Self {
            inner: Arc::new(RwLock::new(project)),
        }
    }

    pub fn reload(&self, path: &Path) -> Result<(), ProjectError> {
        let project = Project::load(path)?;
        *self.inner.write() = project;
        Ok(())
    }

    pub fn replace(&self, project: Project) {
        *self.inner.write() = project;
    }

    pub fn circle(&self, id: &ElementId) -> Option<Circle> {
        self.inner.read().circle(id).cloned()
    }

    pub fn line_segment(&self, id: &ElementId) -> Option<LineSegment> {
        self.inner.read().line_segment(id).cloned()
    }

    /// (circles, line segments, points, polygons)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let p = self.inner.read();
        (
            p.circles.len(),
            p.line_segments.len(),
            p.points.len(),
            p.polygons.len(),
        )
    }
}

impl ElementSource for ProjectStore {
    fn circles(&self) -> Vec<Circle> {
        self.inner.read().circles.clone()
    }

    fn line_segments(&self) -> Vec<LineSegment> {
        self.inner.read().line_segments.clone()
    }

    fn points(&self) -> Vec<MapPoint> {
        self.inner.read().points.clone()
    }

    fn polygons(&self) -> Vec<Polygon> {
        self.inner.read().polygons.clone()
    }
}
