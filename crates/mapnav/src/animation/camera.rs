use crate::element::{AnimatableElement, Circle, LineMode, LineSegment, Polygon};
use crate::geo::{self, GeoPoint, KM_PER_DEGREE};

pub const MIN_ZOOM: f64 = 6.0;
pub const MAX_ZOOM: f64 = 18.0;
pub const PARALLEL_ZOOM: f64 = 6.0;
pub const POINT_ZOOM: f64 = 16.0;
pub const DEFAULT_LINE_ZOOM: f64 = 15.0;

const CIRCLE_ZOOM_BASE: f64 = 13.0;
const SPAN_ZOOM_BASE: f64 = 15.0;
/// Span in kilometers that fits the screen at `SPAN_ZOOM_BASE`.
const SPAN_REFERENCE_KM: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl CameraTarget {
    fn new(center: GeoPoint, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

fn fit_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MAX_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

fn span_zoom(span_km: f64) -> f64 {
    fit_zoom(SPAN_ZOOM_BASE - (span_km / SPAN_REFERENCE_KM).log2())
}

fn circle_target(circle: &Circle) -> CameraTarget {
    let radius_deg = circle.radius / KM_PER_DEGREE;
    CameraTarget::new(circle.center, fit_zoom(CIRCLE_ZOOM_BASE - radius_deg.log2()))
}

fn line_target(line: &LineSegment) -> CameraTarget {
    if let (LineMode::Parallel, Some(longitude)) = (line.mode, line.longitude) {
        return CameraTarget::new(GeoPoint::new(0.0, longitude), PARALLEL_ZOOM);
    }

    let zoom = line
        .effective_endpoint()
        .map(|end| span_zoom(geo::distance_km(line.center, end)))
        .unwrap_or(DEFAULT_LINE_ZOOM);
    CameraTarget::new(line.center, zoom)
}

fn polygon_target(polygon: &Polygon) -> Option<CameraTarget> {
    let first = polygon.vertices.first()?;
    let n = polygon.vertices.len() as f64;

    let (sum_lat, sum_lon) = polygon
        .vertices
        .iter()
        .fold((0.0, 0.0), |(lat, lon), v| (lat + v.lat, lon + v.lon));

    let (min, max) = polygon.vertices.iter().fold((*first, *first), |(min, max), v| {
        (
            GeoPoint::new(min.lat.min(v.lat), min.lon.min(v.lon)),
            GeoPoint::new(max.lat.max(v.lat), max.lon.max(v.lon)),
        )
    });

    Some(CameraTarget::new(
        GeoPoint::new(sum_lat / n, sum_lon / n),
        span_zoom(geo::distance_km(min, max)),
    ))
}

/// Where the camera should fly to show `element`, or `None` when the element
/// has no usable geometry (a polygon without vertices).
pub fn camera_target(element: &AnimatableElement) -> Option<CameraTarget> {
    match element {
        AnimatableElement::Circle(circle) => Some(circle_target(circle)),
        AnimatableElement::LineSegment(line) => Some(line_target(line)),
        AnimatableElement::Point(point) => Some(CameraTarget::new(point.coordinates, POINT_ZOOM)),
        AnimatableElement::Polygon(polygon) => polygon_target(polygon),
    }
}
