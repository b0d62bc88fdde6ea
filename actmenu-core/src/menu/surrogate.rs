//! Rendered counterparts of menu entries.
//!
//! The menu never draws anything itself. Each place an entry shows up in (a list
//! row, a strip button, a provider supplied view) is represented by a
//! [Surrogate] the host renders however it likes. The controller only talks to
//! the trait, and uses [SurrogateKind] instead of type checks.

use crate::menu::entry::{EntryKey, EntrySnapshot, MenuEntry};
use crate::menu::strip::StripRole;
use std::cell::RefCell;
use std::rc::Rc;

/// Tag identifying the surrogate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurrogateKind {
    /// A row in the scrollable list.
    Row,
    /// A button in one of the action strips.
    StripButton,
    /// A view supplied by an action provider.
    ProviderView,
}

/// Capability shared by every rendered counterpart of an entry.
pub trait Surrogate {
    /// Variant tag.
    fn kind(&self) -> SurrogateKind;

    /// Entry this surrogate is currently bound to.
    fn entry(&self) -> Option<EntryKey>;

    /// (Re)bind to an entry's display payload and re-render.
    fn bind(&mut self, entry: &EntrySnapshot);

    /// Show or hide the surrogate.
    fn set_visible(&mut self, visible: bool);

    /// Whether the surrogate is shown.
    fn is_visible(&self) -> bool;

    /// Show or hide the icon.
    fn set_show_icon(&mut self, show: bool);

    /// Relative layout weight inside a strip.
    fn weight(&self) -> f32 {
        1.0
    }
}

/// A surrogate shared between the controller, a strip and pending updates.
pub type SharedSurrogate = Rc<RefCell<dyn Surrogate>>;

/// Wrap a surrogate for sharing.
pub fn share<S: Surrogate + 'static>(surrogate: S) -> SharedSurrogate {
    Rc::new(RefCell::new(surrogate))
}

/// Whether two shared surrogates are the same object.
pub fn same_surrogate(a: &SharedSurrogate, b: &SharedSurrogate) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// State every built-in surrogate carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurrogateState {
    bound: Option<EntrySnapshot>,
    visible: bool,
    show_icon: bool,
    renders: usize,
}

impl SurrogateState {
    fn bind(&mut self, entry: &EntrySnapshot) {
        self.bound = Some(entry.clone());
        self.visible = entry.visible;
        self.renders += 1;
    }

    /// Payload the surrogate was last bound to.
    pub fn snapshot(&self) -> Option<&EntrySnapshot> {
        self.bound.as_ref()
    }

    /// Title currently shown.
    pub fn title(&self) -> Option<&str> {
        self.bound.as_ref().map(|entry| entry.title.as_str())
    }

    /// Icon currently shown, if icons are enabled.
    pub fn icon(&self) -> Option<&str> {
        if !self.show_icon {
            return None;
        }
        self.bound.as_ref().and_then(|entry| entry.icon.as_deref())
    }

    /// Whether the icon is shown.
    pub fn shows_icon(&self) -> bool {
        self.show_icon
    }

    /// Number of times the surrogate was (re)bound.
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

macro_rules! impl_surrogate_state {
    ($ty:ty, $kind:expr) => {
        impl $ty {
            /// Common surrogate state.
            pub fn state(&self) -> &SurrogateState {
                &self.state
            }
        }

        impl Surrogate for $ty {
            fn kind(&self) -> SurrogateKind {
                $kind
            }

            fn entry(&self) -> Option<EntryKey> {
                self.state.bound.as_ref().map(|entry| entry.key)
            }

            fn bind(&mut self, entry: &EntrySnapshot) {
                self.state.bind(entry);
            }

            fn set_visible(&mut self, visible: bool) {
                self.state.visible = visible;
            }

            fn is_visible(&self) -> bool {
                self.state.visible
            }

            fn set_show_icon(&mut self, show: bool) {
                self.state.show_icon = show;
            }

            fn weight(&self) -> f32 {
                self.layout_weight()
            }
        }
    };
}

/// Default list row: icon, title and a submenu indicator.
#[derive(Debug, Clone, Default)]
pub struct DefaultRow {
    state: SurrogateState,
}

impl DefaultRow {
    /// Create an unbound row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the row shows a submenu arrow.
    pub fn shows_submenu_indicator(&self) -> bool {
        self.state.bound.as_ref().is_some_and(|entry| entry.has_submenu)
    }

    fn layout_weight(&self) -> f32 {
        1.0
    }
}

impl_surrogate_state!(DefaultRow, SurrogateKind::Row);

/// Button inside an action strip.
///
/// Shows the icon when icons are on and the entry has one, the title otherwise.
#[derive(Debug, Clone)]
pub struct StripButton {
    state: SurrogateState,
    role: StripRole,
}

impl StripButton {
    /// Create an unbound button for a strip.
    pub fn new(role: StripRole) -> Self {
        Self {
            state: SurrogateState::default(),
            role,
        }
    }

    /// Strip this button was built for.
    pub fn role(&self) -> StripRole {
        self.role
    }

    /// Text label, shown whenever no icon is displayed.
    pub fn label(&self) -> Option<&str> {
        match self.state.icon() {
            Some(_) => None,
            None => self.state.title(),
        }
    }

    fn layout_weight(&self) -> f32 {
        1.0
    }
}

impl_surrogate_state!(StripButton, SurrogateKind::StripButton);

/// View supplied by an action provider, made of several clickable children
/// (for example a default action plus a chooser).
#[derive(Debug, Clone)]
pub struct ProviderView {
    state: SurrogateState,
    children: usize,
}

impl ProviderView {
    /// Create a provider view with the given number of child buttons.
    pub fn new(children: usize) -> Self {
        Self {
            state: SurrogateState::default(),
            children: children.max(1),
        }
    }

    /// Number of child buttons.
    pub fn child_count(&self) -> usize {
        self.children
    }

    /// Change the number of child buttons.
    pub fn set_child_count(&mut self, children: usize) {
        self.children = children.max(1);
    }

    fn layout_weight(&self) -> f32 {
        self.children as f32
    }
}

impl_surrogate_state!(ProviderView, SurrogateKind::ProviderView);

/// Builds surrogates for entries.
pub trait SurrogateFactory {
    /// A fresh list row.
    fn create_row(&self, entry: &MenuEntry) -> SharedSurrogate;

    /// A fresh strip button.
    fn create_strip_surrogate(&self, entry: &MenuEntry, role: StripRole) -> SharedSurrogate;
}

/// Factory producing [DefaultRow] and [StripButton].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSurrogateFactory;

impl SurrogateFactory for DefaultSurrogateFactory {
    fn create_row(&self, _entry: &MenuEntry) -> SharedSurrogate {
        share(DefaultRow::new())
    }

    fn create_strip_surrogate(&self, _entry: &MenuEntry, role: StripRole) -> SharedSurrogate {
        share(StripButton::new(role))
    }
}
