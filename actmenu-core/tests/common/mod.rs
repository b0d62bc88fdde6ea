//! Recording collaborators shared by the integration tests.
#![allow(dead_code)]

use actmenu_core::error::MenuError;
use actmenu_core::menu::{
    ActionProvider, ActionStripPresenter, DefaultRow, MenuCallback, MenuEntry, MenuPresenter,
    MenuSurface, SharedSurrogate, StripButton, StripRole, SubmenuController, SurrogateFactory,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Records every presenter call as a short string.
#[derive(Default)]
pub struct RecordingPresenter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingPresenter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }
}

impl MenuPresenter for RecordingPresenter {
    fn open(&self) {
        self.events.borrow_mut().push("open".into());
    }

    fn show(&self, surface: MenuSurface<'_>) {
        let titles: Vec<&str> = surface.menu.entries().iter().map(MenuEntry::title).collect();
        self.events
            .borrow_mut()
            .push(format!("show {}", titles.join(",")));
    }

    fn close(&self) {
        self.events.borrow_mut().push("close".into());
    }

    fn strip_attached(&self, role: StripRole) {
        self.events.borrow_mut().push(format!("attach {}", role));
    }

    fn strip_detached(&self, role: StripRole) {
        self.events.borrow_mut().push(format!("detach {}", role));
    }
}

/// Keeps typed handles on every surrogate it creates.
#[derive(Default)]
pub struct RecordingFactory {
    pub buttons: RefCell<Vec<Rc<RefCell<StripButton>>>>,
    pub rows: RefCell<Vec<Rc<RefCell<DefaultRow>>>>,
}

impl RecordingFactory {
    pub fn last_button(&self) -> Rc<RefCell<StripButton>> {
        self.buttons.borrow().last().cloned().expect("no strip button created")
    }
}

impl SurrogateFactory for RecordingFactory {
    fn create_row(&self, _entry: &MenuEntry) -> SharedSurrogate {
        let row = Rc::new(RefCell::new(DefaultRow::new()));
        self.rows.borrow_mut().push(row.clone());
        row
    }

    fn create_strip_surrogate(&self, _entry: &MenuEntry, role: StripRole) -> SharedSurrogate {
        let button = Rc::new(RefCell::new(StripButton::new(role)));
        self.buttons.borrow_mut().push(button.clone());
        button
    }
}

/// Host strip that accepts everything and fails every removal.
#[derive(Default)]
pub struct FailingStrip {
    pub held: Rc<Cell<usize>>,
}

impl ActionStripPresenter for FailingStrip {
    fn add_surrogate(&mut self, _surrogate: SharedSurrogate) -> bool {
        self.held.set(self.held.get() + 1);
        true
    }

    fn remove_surrogate(&mut self, _surrogate: &SharedSurrogate) -> Result<(), MenuError> {
        Err(MenuError::StripRemoval("toolbar is gone".into()))
    }
}

/// Provider filling its submenu with fixed titles and counting preparations.
pub struct CountingProvider {
    pub titles: Vec<&'static str>,
    pub prepared: Cell<usize>,
}

impl CountingProvider {
    pub fn new(titles: Vec<&'static str>) -> Rc<Self> {
        Rc::new(Self {
            titles,
            prepared: Cell::new(0),
        })
    }
}

impl ActionProvider for CountingProvider {
    fn on_prepare_submenu(&self, submenu: &mut SubmenuController) {
        self.prepared.set(self.prepared.get() + 1);
        for (index, title) in self.titles.iter().enumerate() {
            // Ids 100.. live only inside provider submenus.
            submenu
                .add_item(100 + index as i32, index as i32, *title)
                .expect("provider ids are unique");
        }
    }
}

/// Callback recording the ids it was handed.
pub fn recording_callback() -> (Rc<RefCell<Vec<i32>>>, Rc<dyn MenuCallback>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let callback: Rc<dyn MenuCallback> = Rc::new(move |entry: &MenuEntry| {
        log.borrow_mut().push(entry.id());
        true
    });
    (seen, callback)
}
