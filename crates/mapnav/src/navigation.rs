use crate::element::{Circle, ElementId, LineSegment};
use crate::geo::{self, GeoPoint, KM_PER_DEGREE};
use strum::{Display as StrumDisplay, EnumString};

const STEP_BASE_FACTOR: f64 = 5.0;
const STEP_MULTIPLIER: f64 = 10.0;
const STEP_REFERENCE_ZOOM: f64 = 11.0;
/// Smallest step ever taken, in kilometers.
pub const MIN_STEP_KM: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum NavElementKind {
    #[default]
    None,
    Circle,
    LineSegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum StepDirection {
    #[strum(serialize = "forward", serialize = "f", serialize = "right", serialize = "up")]
    Forward,
    #[strum(serialize = "backward", serialize = "back", serialize = "b", serialize = "left", serialize = "down")]
    Backward,
}

impl StepDirection {
    fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Kilometers covered by one step at `zoom_level`. Halves with every zoom
/// level and never drops below [`MIN_STEP_KM`].
pub fn step_km(zoom_level: f64) -> f64 {
    let step = 2f64.powf(STEP_REFERENCE_ZOOM - zoom_level) * STEP_BASE_FACTOR * STEP_MULTIPLIER;
    step.max(MIN_STEP_KM)
}

/// Folds a raw progress value back into [0, 1] by reflecting off both ends.
///
/// One crossing gives `1 - (p - 1)` past the end and `-p` before the start;
/// larger overshoots keep reflecting.
pub fn bounce(progress: f64) -> f64 {
    if (0.0..=1.0).contains(&progress) {
        return progress;
    }
    let folded = progress.rem_euclid(2.0);
    if folded > 1.0 { 2.0 - folded } else { folded }
}

fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if a >= 360.0 { 0.0 } else { a }
}

/// Point on the circle at `angle_deg` (0 = north, 90 = east), using the
/// planar 111 km/degree approximation.
pub fn circle_point(circle: &Circle, angle_deg: f64) -> GeoPoint {
    let theta = geo::to_radians(angle_deg);
    GeoPoint::new(
        circle.center.lat + (circle.radius / KM_PER_DEGREE) * theta.cos(),
        circle.center.lon + (circle.radius * geo::degrees_per_km(circle.center.lat)) * theta.sin(),
    )
}

/// Linear blend of both coordinates between the segment ends.
pub fn segment_point(segment: &LineSegment, progress: f64) -> GeoPoint {
    match segment.effective_endpoint() {
        Some(end) => GeoPoint::new(
            segment.center.lat + (end.lat - segment.center.lat) * progress,
            segment.center.lon + (end.lon - segment.center.lon) * progress,
        ),
        None => segment.center,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationSession {
    pub active: bool,
    pub element_kind: NavElementKind,
    pub element_id: Option<ElementId>,
    /// Fraction along a line segment.
    pub progress: f64,
    /// Degrees around a circle, in [0, 360).
    pub angle_position: f64,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the session on an element, abandoning any previous one.
    /// Only the cursor matching `kind` is reset.
    pub fn start(&mut self, kind: NavElementKind, id: ElementId) {
        log::debug!("Navigation started on {} {}", kind, id);
        self.active = true;
        self.element_kind = kind;
        self.element_id = Some(id);
        match kind {
            NavElementKind::Circle => self.angle_position = 0.0,
            NavElementKind::LineSegment => self.progress = 0.0,
            NavElementKind::None => {}
        }
    }

    pub fn exit(&mut self) {
        *self = Self::default();
    }

    pub fn step_circle(&mut self, circle: &Circle, zoom_level: f64, direction: StepDirection) {
        if circle.radius <= 0.0 {
            return;
        }
        let degrees_per_km = geo::degrees_per_km(circle.center.lat);
        let delta = geo::to_degrees(step_km(zoom_level) * degrees_per_km / circle.radius);
        self.angle_position = normalize_angle(self.angle_position + direction.sign() * delta);
    }

    pub fn step_line(&mut self, segment: &LineSegment, zoom_level: f64, direction: StepDirection) {
        let length = segment.length_km();
        if length <= 0.0 {
            return;
        }
        self.progress = bounce(self.progress + direction.sign() * step_km(zoom_level) / length);
    }

    pub fn circle_coords(&self, circle: &Circle) -> GeoPoint {
        circle_point(circle, self.angle_position)
    }

    pub fn line_coords(&self, segment: &LineSegment) -> GeoPoint {
        segment_point(segment, self.progress)
    }
}
