//! Contracts between the menu and the hosting screen.

use crate::menu::entry::{EntryKey, MenuEntry};
use crate::menu::strip::StripRole;
use crate::menu::submenu::SubmenuController;
use crate::menu::surrogate::SharedSurrogate;

/// Receives terminal (non-submenu) selections.
pub trait MenuCallback {
    /// Called once per terminal selection. Returns whether the selection was handled.
    fn on_entry_selected(&self, entry: &MenuEntry) -> bool;
}

impl<F> MenuCallback for F
where
    F: Fn(&MenuEntry) -> bool,
{
    fn on_entry_selected(&self, entry: &MenuEntry) -> bool {
        self(entry)
    }
}

/// A submenu handed to the presenter for display.
///
/// `parent` identifies the entry owning the submenu, so the host can reach it
/// again later through
/// [MenuController::submenu_mut](crate::menu::controller::MenuController::submenu_mut).
pub struct MenuSurface<'a> {
    /// Entry owning the submenu.
    pub parent: EntryKey,
    /// The submenu to show.
    pub menu: &'a SubmenuController,
}

/// Controls visibility of the menu and of opened submenus.
pub trait MenuPresenter {
    /// Open the menu.
    fn open(&self);

    /// Show a (sub)menu surface.
    fn show(&self, surface: MenuSurface<'_>);

    /// Close the menu.
    fn close(&self);

    /// A default strip container was attached as a header row over the list.
    fn strip_attached(&self, _role: StripRole) {}

    /// A default strip container was detached from the list.
    fn strip_detached(&self, _role: StripRole) {}
}

/// External collaborator that generates submenu content and custom surrogates
/// for a single entry.
pub trait ActionProvider {
    /// Fill a freshly created submenu right before it is shown.
    fn on_prepare_submenu(&self, submenu: &mut SubmenuController);

    /// Whether the provider generates a submenu at all.
    fn has_submenu(&self) -> bool {
        true
    }

    /// A custom surrogate for the owning entry, used both in the list and in strips.
    fn create_surrogate(&self, _entry: &MenuEntry) -> Option<SharedSurrogate> {
        None
    }
}
