use mapnav::collaborators::{ElementVisibility, FlyOptions, MapCamera};
use mapnav::element::{ElementId, ElementKind};
use mapnav::geo::GeoPoint;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

type MoveEnd = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

pub struct SimulatedCamera {
    ready: bool,
    position: Cell<(GeoPoint, f64)>,
    flight: Rc<Cell<u64>>,
    move_end: MoveEnd,
}

impl SimulatedCamera {
    pub fn new(ready: bool, zoom: f64) -> Self {
        Self {
            ready,
            position: Cell::new((GeoPoint::default(), zoom)),
            flight: Rc::new(Cell::new(0)),
            move_end: Rc::new(RefCell::new(None)),
        }
    }

    /// Center and zoom the camera is at, or flying to.
    pub fn position(&self) -> (GeoPoint, f64) {
        self.position.get()
    }
}

impl MapCamera for SimulatedCamera {
    fn is_ready(&self) -> bool {
        self.ready
    }

    /// Lands after `options.duration`. A newer flight replaces an older one.
    fn fly_to(&self, target: GeoPoint, zoom: f64, options: FlyOptions) {
        log::info!(
            "Camera -> ({:.5}, {:.5}) zoom {:.2} over {:?}",
            target.lat,
            target.lon,
            zoom,
            options.duration
        );
        self.position.set((target, zoom));

        let id = self.flight.get() + 1;
        self.flight.set(id);
        let flight = self.flight.clone();
        let move_end = self.move_end.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(options.duration).await;
            if flight.get() != id {
                return;
            }
            let callback = move_end.borrow_mut().take();
            if let Some(cb) = callback {
                cb();
            }
        });
    }

    fn once_move_end(&self, callback: Box<dyn FnOnce()>) {
        *self.move_end.borrow_mut() = Some(callback);
    }
}

#[derive(Default)]
pub struct DrawingLayer {
    hidden: RefCell<HashSet<(ElementKind, ElementId)>>,
}

impl DrawingLayer {
    pub fn is_hidden(&self, kind: ElementKind, id: &ElementId) -> bool {
        self.hidden.borrow().contains(&(kind, id.clone()))
    }
}

impl ElementVisibility for DrawingLayer {
    fn set_visibility(&self, kind: ElementKind, id: &ElementId, visible: bool) {
        let key = (kind, id.clone());
        if visible {
            self.hidden.borrow_mut().remove(&key);
        } else {
            self.hidden.borrow_mut().insert(key);
        }
    }
}
