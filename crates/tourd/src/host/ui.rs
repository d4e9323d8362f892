use mapnav::collaborators::{ElementVisibility, Notifier, Severity, SidePanel, UiState};
use mapnav::element::{ElementId, ElementKind};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// UI flags without a UI. Everything starts visible with both panels open.
pub struct HeadlessUi {
    playing: Cell<bool>,
    panels: RefCell<HashMap<SidePanel, bool>>,
    step: Cell<usize>,
    countdown: Cell<Option<u8>>,
    visibility: RefCell<HashMap<(ElementKind, ElementId), bool>>,
}

impl Default for HeadlessUi {
    fn default() -> Self {
        Self {
            playing: Cell::new(false),
            panels: RefCell::new(HashMap::from([
                (SidePanel::Elements, true),
                (SidePanel::Tools, true),
            ])),
            step: Cell::new(0),
            countdown: Cell::new(None),
            visibility: RefCell::new(HashMap::new()),
        }
    }
}

impl HeadlessUi {
    pub fn is_panel_open(&self, panel: SidePanel) -> bool {
        self.panels.borrow().get(&panel).copied().unwrap_or(false)
    }

    pub fn current_step(&self) -> usize {
        self.step.get()
    }

    pub fn countdown(&self) -> Option<u8> {
        self.countdown.get()
    }

    pub fn is_visible(&self, kind: ElementKind, id: &ElementId) -> bool {
        self.visibility
            .borrow()
            .get(&(kind, id.clone()))
            .copied()
            .unwrap_or(true)
    }
}

impl ElementVisibility for HeadlessUi {
    fn set_visibility(&self, kind: ElementKind, id: &ElementId, visible: bool) {
        log::debug!("{} {} visible={}", kind, id, visible);
        self.visibility.borrow_mut().insert((kind, id.clone()), visible);
    }
}

impl UiState for HeadlessUi {
    fn is_playing(&self) -> bool {
        self.playing.get()
    }

    fn set_playing(&self, playing: bool) {
        self.playing.set(playing);
    }

    fn set_panel_open(&self, panel: SidePanel, open: bool) {
        self.panels.borrow_mut().insert(panel, open);
    }

    fn set_current_step(&self, index: usize) {
        self.step.set(index);
    }

    fn set_countdown(&self, value: Option<u8>) {
        if let Some(n) = value {
            log::info!("{}...", n);
        }
        self.countdown.set(value);
    }
}

/// Routes notifications to the log and keeps the latest one.
#[derive(Default)]
pub struct LogNotifier {
    last: RefCell<Option<(String, Severity)>>,
}

impl LogNotifier {
    pub fn last(&self) -> Option<(String, Severity)> {
        self.last.borrow().clone()
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => log::error!("{}", message),
            Severity::Info | Severity::Success => log::info!("[{}] {}", severity, message),
        }
        *self.last.borrow_mut() = Some((message.to_string(), severity));
    }
}
