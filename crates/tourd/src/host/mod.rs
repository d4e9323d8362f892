pub mod map;
pub mod store;
pub mod ui;

pub use map::{DrawingLayer, SimulatedCamera};
pub use store::ProjectStore;
pub use ui::{HeadlessUi, LogNotifier};

use crate::config::Config;
use crate::events::{AppEvent, NavCommand};
use crate::sys::scheduler::LocalScheduler;
use mapnav::animation::{Collaborators, Sequencer};
use mapnav::collaborators::{MapCamera, UiState};
use mapnav::geo::GeoPoint;
use mapnav::navigation::{NavElementKind, NavigationSession, step_km};
use mapnav::scheduler::Scheduler;
use std::rc::Rc;

pub struct Host {
    pub ui: Rc<HeadlessUi>,
    pub camera: Rc<SimulatedCamera>,
    pub drawing: Rc<DrawingLayer>,
    pub notifier: Rc<LogNotifier>,
    store: ProjectStore,
    sequencer: Sequencer,
    navigation: NavigationSession,
    zoom: f64,
}

impl Host {
    pub fn new(config: &Config, store: ProjectStore, scheduler: Rc<dyn Scheduler>) -> Self {
        let ui = Rc::new(HeadlessUi::default());
        let camera = Rc::new(SimulatedCamera::new(
            config.camera.ready,
            config.camera.initial_zoom,
        ));
        let drawing = Rc::new(DrawingLayer::default());
        let notifier = Rc::new(LogNotifier::default());

        let sequencer = Sequencer::new(
            Collaborators {
                camera: camera.clone(),
                ui: ui.clone(),
                drawing: drawing.clone(),
                elements: Rc::new(store.clone()),
                notifier: notifier.clone(),
                scheduler,
            },
            config.playback.timing(),
        );

        Self {
            ui,
            camera,
            drawing,
            notifier,
            store,
            sequencer,
            navigation: NavigationSession::new(),
            zoom: config.camera.initial_zoom,
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn navigation(&self) -> &NavigationSession {
        &self.navigation
    }

    /// Applies one event. Returns false once the host should shut down.
    pub fn update(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Play => {
                let was_playing = self.ui.is_playing();
                self.ui.set_playing(true);
                self.sequencer.playing_flag_changed(was_playing, true);
            }
            AppEvent::Stop => {
                if self.ui.is_playing() {
                    log::info!("Stop requested");
                }
                self.ui.set_playing(false);
            }
            AppEvent::Navigate(cmd) => self.navigate(cmd),
            AppEvent::ProjectReload => {
                let (circles, lines, points, polygons) = self.store.counts();
                log::info!(
                    "Project reloaded: {} circle(s), {} line(s), {} point(s), {} polygon(s)",
                    circles,
                    lines,
                    points,
                    polygons
                );
                self.drop_stale_navigation();
            }
            AppEvent::Quit => {
                self.sequencer.cancel();
                return false;
            }
        }
        true
    }

    fn navigate(&mut self, cmd: NavCommand) {
        match cmd {
            NavCommand::Start(kind, id) => {
                let exists = match kind {
                    NavElementKind::Circle => self.store.circle(&id).is_some(),
                    NavElementKind::LineSegment => self.store.line_segment(&id).is_some(),
                    NavElementKind::None => false,
                };
                if !exists {
                    log::warn!("No {} with id '{}'", kind, id);
                    return;
                }
                self.navigation.start(kind, id);
                self.report_cursor();
            }
            NavCommand::Step(direction) => {
                if !self.navigation.active {
                    log::warn!("Not navigating");
                    return;
                }
                let Some(id) = self.navigation.element_id.clone() else {
                    return;
                };
                match self.navigation.element_kind {
                    NavElementKind::Circle => {
                        if let Some(circle) = self.store.circle(&id) {
                            self.navigation.step_circle(&circle, self.zoom, direction);
                        }
                    }
                    NavElementKind::LineSegment => {
                        if let Some(line) = self.store.line_segment(&id) {
                            self.navigation.step_line(&line, self.zoom, direction);
                        }
                    }
                    NavElementKind::None => {}
                }
                self.report_cursor();
            }
            NavCommand::Zoom(level) => {
                self.zoom = level;
                log::info!("Zoom {} ({:.3} km per step)", level, step_km(level));
            }
            NavCommand::Exit => {
                self.navigation.exit();
                log::info!("Navigation ended");
            }
        }
    }

    /// Current cursor coordinate, if navigating an element that still exists.
    pub fn cursor(&self) -> Option<GeoPoint> {
        if !self.navigation.active {
            return None;
        }
        let id = self.navigation.element_id.as_ref()?;
        match self.navigation.element_kind {
            NavElementKind::Circle => self
                .store
                .circle(id)
                .map(|c| self.navigation.circle_coords(&c)),
            NavElementKind::LineSegment => self
                .store
                .line_segment(id)
                .map(|l| self.navigation.line_coords(&l)),
            NavElementKind::None => None,
        }
    }

    fn report_cursor(&self) {
        if let Some(p) = self.cursor() {
            log::info!("Cursor at ({:.6}, {:.6})", p.lat, p.lon);
        }
    }

    fn drop_stale_navigation(&mut self) {
        if self.navigation.active && self.cursor().is_none() {
            log::warn!("Navigated element is gone, leaving navigation");
            self.navigation.exit();
        }
    }
}

/// Event loop. Must run inside a `LocalSet`.
pub async fn run(config: Config, store: ProjectStore, rx: async_channel::Receiver<AppEvent>) {
    let mut host = Host::new(&config, store, Rc::new(LocalScheduler));
    log::info!("camera ready: {}", host.camera.is_ready());

    while let Ok(event) = rx.recv().await {
        if !host.update(event) {
            break;
        }
    }
    log::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapnav::collaborators::{Severity, SidePanel};
    use mapnav::element::{ElementId, ElementKind};
    use mapnav::navigation::StepDirection;
    use mapnav::project::Project;
    use mapnav::scheduler::ManualScheduler;
    use std::time::Duration;

    fn project() -> Project {
        serde_json::from_value(serde_json::json!({
            "circles": [
                { "id": "c1", "center": { "lat": 0.0, "lon": 0.0 }, "radius": 50.0, "createdAt": 2 }
            ],
            "lineSegments": [
                { "id": "l1", "center": { "lat": 0.0, "lon": 0.0 },
                  "endpoint": { "lat": 1.0, "lon": 0.0 }, "createdAt": 1 }
            ]
        }))
        .unwrap()
    }

    fn offline_host(scheduler: Rc<ManualScheduler>) -> Host {
        let mut config = Config::default();
        config.camera.ready = false;
        Host::new(&config, ProjectStore::new(project()), scheduler)
    }

    #[test]
    fn test_play_without_camera_runs_to_completion() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut host = offline_host(scheduler.clone());

        assert!(host.update(AppEvent::Play));
        assert!(!host.ui.is_panel_open(SidePanel::Elements));
        assert!(!host.ui.is_panel_open(SidePanel::Tools));
        assert!(host.drawing.is_hidden(ElementKind::Circle, &ElementId::from("c1")));
        assert_eq!(host.ui.countdown(), Some(3));

        scheduler.advance(Duration::from_millis(3000));
        assert!(host.ui.is_visible(ElementKind::LineSegment, &ElementId::from("l1")));
        assert!(!host.ui.is_visible(ElementKind::Circle, &ElementId::from("c1")));

        scheduler.advance(Duration::from_millis(4000));
        assert!(host.ui.is_visible(ElementKind::Circle, &ElementId::from("c1")));
        assert!(!host.drawing.is_hidden(ElementKind::Circle, &ElementId::from("c1")));
        assert!(!host.ui.is_playing());
        assert_eq!(host.notifier.last().map(|(_, s)| s), Some(Severity::Success));
    }

    #[test]
    fn test_step_index_follows_reveals() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut host = offline_host(scheduler.clone());

        host.update(AppEvent::Play);
        assert_eq!(host.ui.current_step(), 0);

        scheduler.advance(Duration::from_millis(3000));
        assert_eq!(host.ui.current_step(), 0);
        scheduler.advance(Duration::from_millis(2000));
        assert_eq!(host.ui.current_step(), 1);
    }

    #[test]
    fn test_each_play_uses_current_project_order() {
        let scheduler = Rc::new(ManualScheduler::new());
        let store = ProjectStore::new(project());
        let mut config = Config::default();
        config.camera.ready = false;
        let mut host = Host::new(&config, store.clone(), scheduler.clone());

        let ids = |host: &Host| -> Vec<String> {
            host.sequencer()
                .elements()
                .iter()
                .map(|e| e.id().to_string())
                .collect()
        };

        host.update(AppEvent::Play);
        assert_eq!(ids(&host), vec!["l1", "c1"]);
        scheduler.advance(Duration::from_secs(10));
        assert!(!host.ui.is_playing());

        store.replace(
            serde_json::from_value(serde_json::json!({
                "points": [
                    { "id": "b", "coordinates": { "lat": 0.0, "lon": 0.0 }, "createdAt": 2 },
                    { "id": "a", "coordinates": { "lat": 1.0, "lon": 1.0 }, "createdAt": 1 }
                ]
            }))
            .unwrap(),
        );
        host.update(AppEvent::ProjectReload);
        host.update(AppEvent::Play);
        assert_eq!(ids(&host), vec!["a", "b"]);
    }

    #[test]
    fn test_second_play_while_playing_is_ignored() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut host = offline_host(scheduler.clone());

        host.update(AppEvent::Play);
        scheduler.advance(Duration::from_millis(1000));
        host.update(AppEvent::Play);
        assert_eq!(host.ui.countdown(), Some(2));
    }

    #[test]
    fn test_stop_reveals_everything() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut host = offline_host(scheduler.clone());

        host.update(AppEvent::Play);
        scheduler.advance(Duration::from_millis(3000));
        host.update(AppEvent::Stop);
        scheduler.advance(Duration::from_millis(2000));

        assert!(host.ui.is_visible(ElementKind::Circle, &ElementId::from("c1")));
        assert!(host.notifier.last().is_none());
    }

    #[test]
    fn test_navigation_commands() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut host = offline_host(scheduler);

        host.update(AppEvent::Navigate(NavCommand::Start(
            NavElementKind::Circle,
            ElementId::from("missing"),
        )));
        assert!(!host.navigation().active);

        host.update(AppEvent::Navigate(NavCommand::Start(
            NavElementKind::Circle,
            ElementId::from("c1"),
        )));
        let north = host.cursor().unwrap();
        assert!((north.lat - 50.0 / 111.0).abs() < 1e-12);

        host.update(AppEvent::Navigate(NavCommand::Zoom(11.0)));
        host.update(AppEvent::Navigate(NavCommand::Step(StepDirection::Backward)));
        assert!(host.navigation().angle_position > 359.0);

        host.update(AppEvent::Navigate(NavCommand::Start(
            NavElementKind::LineSegment,
            ElementId::from("l1"),
        )));
        host.update(AppEvent::Navigate(NavCommand::Step(StepDirection::Forward)));
        assert!(host.navigation().progress > 0.0);

        host.update(AppEvent::Navigate(NavCommand::Exit));
        assert_eq!(host.cursor(), None);
    }

    #[test]
    fn test_reload_drops_navigation_on_removed_element() {
        let scheduler = Rc::new(ManualScheduler::new());
        let store = ProjectStore::new(project());
        let mut host = Host::new(&Config::default(), store.clone(), scheduler);

        host.update(AppEvent::Navigate(NavCommand::Start(
            NavElementKind::Circle,
            ElementId::from("c1"),
        )));
        store.replace(Project::default());
        host.update(AppEvent::ProjectReload);

        assert!(!host.navigation().active);
    }

    #[test]
    fn test_quit_stops_loop() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut host = offline_host(scheduler.clone());
        host.update(AppEvent::Play);

        assert!(!host.update(AppEvent::Quit));
        scheduler.advance(Duration::from_secs(30));
        assert!(host.notifier.last().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_flights_complete_playback() {
        tokio::task::LocalSet::new()
            .run_until(async {
                let mut host = Host::new(
                    &Config::default(),
                    ProjectStore::new(project()),
                    Rc::new(LocalScheduler),
                );
                host.update(AppEvent::Play);

                tokio::time::sleep(Duration::from_millis(4700)).await;
                let (center, zoom) = host.camera.position();
                assert_eq!(center, GeoPoint::new(0.0, 0.0));
                assert!(zoom <= 18.0 && zoom >= 6.0);
                assert!(host.ui.is_visible(ElementKind::LineSegment, &ElementId::from("l1")));

                tokio::time::sleep(Duration::from_secs(10)).await;
                assert!(!host.ui.is_playing());
                assert_eq!(host.notifier.last().map(|(_, s)| s), Some(Severity::Success));
            })
            .await;
    }
}
