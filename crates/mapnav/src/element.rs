use crate::collaborators::ElementSource;
use crate::geo::{self, GeoPoint};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::cmp::Ordering;
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ElementId(String);

crate::impl_string_newtype!(ElementId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "lineSegment", serialize = "line")]
    LineSegment,
    #[strum(serialize = "point")]
    Point,
    #[strum(serialize = "polygon")]
    Polygon,
}

/// How a line segment was drawn. Only `Azimuth` derives its endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    #[default]
    #[strum(serialize = "coordinate")]
    Coordinate,
    #[strum(serialize = "azimuth")]
    Azimuth,
    #[strum(serialize = "intersection")]
    Intersection,
    #[strum(serialize = "parallel")]
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: ElementId,
    pub center: GeoPoint,
    /// Kilometers.
    pub radius: f64,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSegment {
    pub id: ElementId,
    /// Start of the segment.
    pub center: GeoPoint,
    #[serde(default)]
    pub endpoint: Option<GeoPoint>,
    #[serde(default)]
    pub mode: LineMode,
    /// Kilometers, used with `LineMode::Azimuth`.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Degrees clockwise from north, used with `LineMode::Azimuth`.
    #[serde(default)]
    pub azimuth: Option<f64>,
    /// Meridian shown for `LineMode::Parallel`.
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl LineSegment {
    /// Endpoint the segment actually ends at.
    ///
    /// Azimuth segments are projected from `center`, `distance` and `azimuth`;
    /// every other mode uses the stored endpoint.
    pub fn effective_endpoint(&self) -> Option<GeoPoint> {
        match self.mode {
            LineMode::Azimuth => match (self.distance, self.azimuth) {
                (Some(distance), Some(azimuth)) => {
                    Some(geo::destination(self.center, distance, azimuth))
                }
                _ => self.endpoint,
            },
            _ => self.endpoint,
        }
    }

    /// Great-circle length in kilometers, 0 when no endpoint resolves.
    pub fn length_km(&self) -> f64 {
        self.effective_endpoint()
            .map(|end| geo::distance_km(self.center, end))
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub id: ElementId,
    pub coordinates: GeoPoint,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub id: ElementId,
    #[serde(default)]
    pub vertices: Vec<GeoPoint>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Anything the playback sequencer can fly to and reveal.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatableElement {
    Circle(Circle),
    LineSegment(LineSegment),
    Point(MapPoint),
    Polygon(Polygon),
}

impl AnimatableElement {
    pub fn id(&self) -> &ElementId {
        match self {
            Self::Circle(c) => &c.id,
            Self::LineSegment(l) => &l.id,
            Self::Point(p) => &p.id,
            Self::Polygon(p) => &p.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Circle(_) => ElementKind::Circle,
            Self::LineSegment(_) => ElementKind::LineSegment,
            Self::Point(_) => ElementKind::Point,
            Self::Polygon(_) => ElementKind::Polygon,
        }
    }

    pub fn created_at(&self) -> Option<i64> {
        match self {
            Self::Circle(c) => c.created_at,
            Self::LineSegment(l) => l.created_at,
            Self::Point(p) => p.created_at,
            Self::Polygon(p) => p.created_at,
        }
    }

    fn order(a: &Self, b: &Self) -> Ordering {
        a.created_at()
            .unwrap_or(0)
            .cmp(&b.created_at().unwrap_or(0))
            .then_with(|| a.id().cmp(b.id()))
    }
}

/// Snapshot of every element in reveal order: `createdAt` ascending (missing
/// counts as 0), then id.
pub fn animation_order(source: &dyn ElementSource) -> Vec<AnimatableElement> {
    let mut elements: Vec<AnimatableElement> = source
        .circles()
        .into_iter()
        .map(AnimatableElement::Circle)
        .chain(
            source
                .line_segments()
                .into_iter()
                .map(AnimatableElement::LineSegment),
        )
        .chain(source.points().into_iter().map(AnimatableElement::Point))
        .chain(source.polygons().into_iter().map(AnimatableElement::Polygon))
        .collect();

    elements.sort_by(AnimatableElement::order);
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;

    fn point(id: &str, created_at: Option<i64>) -> MapPoint {
        MapPoint {
            id: ElementId::from(id),
            coordinates: GeoPoint::default(),
            created_at,
        }
    }

    #[test]
    fn test_order_missing_timestamp_first_then_id() {
        let project = Project {
            points: vec![point("b", Some(5)), point("a", Some(5)), point("c", None)],
            ..Default::default()
        };

        let ids: Vec<String> = animation_order(&project)
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_order_merges_collections() {
        let project = Project {
            circles: vec![Circle {
                id: ElementId::from("circle"),
                center: GeoPoint::default(),
                radius: 1.0,
                created_at: Some(20),
            }],
            points: vec![point("point", Some(10))],
            polygons: vec![Polygon {
                id: ElementId::from("poly"),
                vertices: Vec::new(),
                created_at: Some(15),
            }],
            ..Default::default()
        };

        let kinds: Vec<ElementKind> = animation_order(&project).iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Point, ElementKind::Polygon, ElementKind::Circle]
        );
    }

    #[test]
    fn test_azimuth_endpoint_is_derived() {
        let line = LineSegment {
            id: ElementId::from("l"),
            center: GeoPoint::new(0.0, 0.0),
            endpoint: Some(GeoPoint::new(10.0, 10.0)),
            mode: LineMode::Azimuth,
            distance: Some(111.0),
            azimuth: Some(90.0),
            longitude: None,
            created_at: None,
        };

        let end = line.effective_endpoint().unwrap();
        assert!(end.lat.abs() < 1e-6);
        assert!((end.lon - 1.0).abs() < 0.01, "got {}", end.lon);
    }

    #[test]
    fn test_other_modes_use_stored_endpoint() {
        let line = LineSegment {
            id: ElementId::from("l"),
            center: GeoPoint::new(0.0, 0.0),
            endpoint: None,
            mode: LineMode::Intersection,
            distance: Some(111.0),
            azimuth: Some(90.0),
            longitude: None,
            created_at: None,
        };

        assert_eq!(line.effective_endpoint(), None);
        assert_eq!(line.length_km(), 0.0);
    }

    #[test]
    fn test_line_mode_deserialization() {
        let cases = vec![
            ("\"azimuth\"", LineMode::Azimuth),
            ("\"Azimuth\"", LineMode::Azimuth),
            ("\"PARALLEL\"", LineMode::Parallel),
            ("\"coordinate\"", LineMode::Coordinate),
            ("\"intersection\"", LineMode::Intersection),
        ];

        for (json, expected) in cases {
            let deserialized: LineMode = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_element_kind_parses_aliases() {
        assert_eq!("line".parse::<ElementKind>().unwrap(), ElementKind::LineSegment);
        assert_eq!("LineSegment".parse::<ElementKind>().unwrap(), ElementKind::LineSegment);
        assert_eq!(ElementKind::LineSegment.to_string(), "lineSegment");
    }
}
