use super::camera::camera_target;
use crate::collaborators::{
    ElementSource, ElementVisibility, FlyOptions, MapCamera, Notifier, Severity, SidePanel,
    UiState,
};
use crate::element::{AnimatableElement, animation_order};
use crate::scheduler::{Scheduler, TaskHandle};
use derive_more::Display;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use strum::IntoEnumIterator;

pub const COUNTDOWN_FROM: u8 = 3;
pub const COUNTDOWN_TICK: Duration = Duration::from_millis(1000);
pub const REVEAL_PAUSE: Duration = Duration::from_millis(2000);
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

pub const NOTHING_TO_ANIMATE: &str = "No elements to animate";
pub const ANIMATION_COMPLETE: &str = "Animation complete";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTiming {
    pub countdown_from: u8,
    pub countdown_tick: Duration,
    pub reveal_pause: Duration,
    pub settle_delay: Duration,
    pub flight: FlyOptions,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            countdown_from: COUNTDOWN_FROM,
            countdown_tick: COUNTDOWN_TICK,
            reveal_pause: REVEAL_PAUSE,
            settle_delay: SETTLE_DELAY,
            flight: FlyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Phase {
    #[default]
    #[display("idle")]
    Idle,
    #[display("countdown {_0}")]
    Countdown(u8),
    /// Index of the element being flown to or shown.
    #[display("revealing #{_0}")]
    Revealing(usize),
    #[display("complete")]
    Complete,
}

pub struct Collaborators {
    pub camera: Rc<dyn MapCamera>,
    pub ui: Rc<dyn UiState>,
    /// Drawing layer; kept in sync with the UI's visibility flags.
    pub drawing: Rc<dyn ElementVisibility>,
    pub elements: Rc<dyn ElementSource>,
    pub notifier: Rc<dyn Notifier>,
    pub scheduler: Rc<dyn Scheduler>,
}

#[derive(Default)]
struct Run {
    generation: u64,
    phase: Phase,
    elements: Vec<AnimatableElement>,
    index: usize,
    pending: Option<TaskHandle>,
}

struct Inner {
    deps: Collaborators,
    timing: PlaybackTiming,
    run: RefCell<Run>,
}

/// Stop requests (the UI's playing flag being cleared) are only observed
/// right before an element is revealed and right after the camera arrives.
pub struct Sequencer {
    inner: Rc<Inner>,
}

impl Sequencer {
    pub fn new(deps: Collaborators, timing: PlaybackTiming) -> Self {
        Self {
            inner: Rc::new(Inner {
                deps,
                timing,
                run: RefCell::new(Run::default()),
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        self.inner.run.borrow().phase
    }

    /// Elements of the current (or last) run, in reveal order.
    pub fn elements(&self) -> Vec<AnimatableElement> {
        self.inner.run.borrow().elements.clone()
    }

    /// Starts playback when the playing flag goes from false to true.
    pub fn playing_flag_changed(&self, was_playing: bool, is_playing: bool) {
        if !was_playing && is_playing {
            self.start_playback();
        }
    }

    /// Hides every element, closes the side panels and starts the countdown.
    /// Any run still in flight is abandoned.
    pub fn start_playback(&self) {
        let inner = &self.inner;
        let order = animation_order(inner.deps.elements.as_ref());
        log::info!("Starting playback of {} element(s)", order.len());

        for panel in SidePanel::iter() {
            inner.deps.ui.set_panel_open(panel, false);
        }
        for element in &order {
            inner.set_visible(element, false);
        }

        let generation = {
            let mut run = inner.run.borrow_mut();
            if let Some(handle) = run.pending.take() {
                handle.cancel();
            }
            run.generation += 1;
            run.elements = order;
            run.index = 0;
            run.generation
        };
        inner.deps.ui.set_current_step(0);

        inner.countdown(generation, inner.timing.countdown_from);
    }

    /// Drops any pending step without touching element visibility.
    pub fn cancel(&self) {
        let mut run = self.inner.run.borrow_mut();
        if let Some(handle) = run.pending.take() {
            handle.cancel();
        }
        run.generation += 1;
        run.phase = Phase::Idle;
    }
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.run.borrow().generation == generation
    }

    fn set_phase(&self, phase: Phase) {
        log::debug!("Playback phase: {}", phase);
        self.run.borrow_mut().phase = phase;
    }

    fn set_visible(&self, element: &AnimatableElement, visible: bool) {
        self.deps.ui.set_visibility(element.kind(), element.id(), visible);
        self.deps.drawing.set_visibility(element.kind(), element.id(), visible);
    }

    fn schedule(
        self: &Rc<Self>,
        generation: u64,
        delay: Duration,
        step: impl FnOnce(&Rc<Inner>) + 'static,
    ) {
        if !self.is_current(generation) {
            return;
        }
        let weak: Weak<Inner> = Rc::downgrade(self);
        let handle = self.deps.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    step(&inner);
                }
            }),
        );
        self.run.borrow_mut().pending = Some(handle);
    }

    fn countdown(self: &Rc<Self>, generation: u64, value: u8) {
        if !self.is_current(generation) {
            return;
        }
        self.set_phase(Phase::Countdown(value));
        self.deps.ui.set_countdown(Some(value));

        if value == 0 {
            self.deps.ui.set_countdown(None);
            self.reveal_next(generation);
            return;
        }

        self.schedule(generation, self.timing.countdown_tick, move |inner| {
            inner.countdown(generation, value - 1)
        });
    }

    fn reveal_next(self: &Rc<Self>, generation: u64) {
        if !self.is_current(generation) {
            return;
        }

        let (element, index, total) = {
            let run = self.run.borrow();
            (run.elements.get(run.index).cloned(), run.index, run.elements.len())
        };

        // Runs after the countdown, so an empty project still counts down first.
        if total == 0 {
            self.set_phase(Phase::Complete);
            self.deps.notifier.notify(NOTHING_TO_ANIMATE, Severity::Info);
            self.deps.ui.set_playing(false);
            return;
        }

        if !self.deps.ui.is_playing() {
            self.halt();
            return;
        }

        let Some(element) = element else {
            self.complete();
            return;
        };

        self.set_phase(Phase::Revealing(index));
        self.deps.ui.set_current_step(index);
        self.navigate_to(&element, generation, move |inner| inner.on_arrival(generation));
    }

    /// Flies the camera to `element` and runs `then` once it has settled.
    /// Without a camera or a target, `then` runs immediately.
    fn navigate_to(
        self: &Rc<Self>,
        element: &AnimatableElement,
        generation: u64,
        then: impl FnOnce(&Rc<Inner>) + 'static,
    ) {
        let camera = self.deps.camera.clone();
        if !camera.is_ready() {
            log::warn!("No map camera, revealing {} without a flight", element.id());
            then(self);
            return;
        }

        let Some(target) = camera_target(element) else {
            log::warn!("{} {} has no camera target", element.kind(), element.id());
            then(self);
            return;
        };

        let weak = Rc::downgrade(self);
        let settle = self.timing.settle_delay;
        camera.once_move_end(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.schedule(generation, settle, then);
            }
        }));

        log::debug!(
            "Flying to {} {} at ({:.5}, {:.5}) zoom {:.2}",
            element.kind(),
            element.id(),
            target.center.lat,
            target.center.lon,
            target.zoom
        );
        camera.fly_to(target.center, target.zoom, self.timing.flight);
    }

    fn on_arrival(self: &Rc<Self>, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        if !self.deps.ui.is_playing() {
            self.halt();
            return;
        }

        let element = {
            let run = self.run.borrow();
            run.elements.get(run.index).cloned()
        };
        if let Some(element) = element {
            log::debug!("Revealing {} {}", element.kind(), element.id());
            self.set_visible(&element, true);
        }

        self.schedule(generation, self.timing.reveal_pause, move |inner| {
            inner.run.borrow_mut().index += 1;
            inner.reveal_next(generation);
        });
    }

    /// Manual stop: everything becomes visible again.
    fn halt(&self) {
        log::info!("Playback stopped");
        let elements = {
            let mut run = self.run.borrow_mut();
            run.pending = None;
            run.phase = Phase::Idle;
            run.elements.clone()
        };
        for element in &elements {
            self.set_visible(element, true);
        }
    }

    fn complete(&self) {
        log::info!("Playback complete");
        self.set_phase(Phase::Complete);
        self.run.borrow_mut().pending = None;
        self.deps.notifier.notify(ANIMATION_COMPLETE, Severity::Success);
        self.deps.ui.set_playing(false);
    }
}
