use crate::element::{Circle, ElementId, ElementKind, LineSegment, MapPoint, Polygon};
use crate::geo::GeoPoint;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const FLIGHT_DURATION: Duration = Duration::from_millis(1500);
pub const EASE_LINEARITY: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyOptions {
    pub duration: Duration,
    pub ease_linearity: f64,
}

impl Default for FlyOptions {
    fn default() -> Self {
        Self {
            duration: FLIGHT_DURATION,
            ease_linearity: EASE_LINEARITY,
        }
    }
}

pub trait MapCamera {
    /// False while no map instance exists.
    fn is_ready(&self) -> bool;

    fn fly_to(&self, target: GeoPoint, zoom: f64, options: FlyOptions);

    /// Runs `callback` once, when the current camera movement settles.
    fn once_move_end(&self, callback: Box<dyn FnOnce()>);
}

/// Per-element visibility, keyed by kind and id. Calls are idempotent.
pub trait ElementVisibility {
    fn set_visibility(&self, kind: ElementKind, id: &ElementId, visible: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum SidePanel {
    Elements,
    Tools,
}

/// Flags owned by the UI layer. The playing flag is also set from outside.
pub trait UiState: ElementVisibility {
    fn is_playing(&self) -> bool;
    fn set_playing(&self, playing: bool);
    fn set_panel_open(&self, panel: SidePanel, open: bool);
    fn set_current_step(&self, index: usize);
    /// `None` once the countdown is over.
    fn set_countdown(&self, value: Option<u8>);
}

pub trait ElementSource {
    fn circles(&self) -> Vec<Circle>;
    fn line_segments(&self) -> Vec<LineSegment>;
    fn points(&self) -> Vec<MapPoint>;
    fn polygons(&self) -> Vec<Polygon>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}
