//! Menus owned by an entry.

use crate::menu::controller::MenuController;
use crate::menu::entry::EntryKey;
use std::ops::{Deref, DerefMut};

/// A [MenuController] owned by a parent entry.
///
/// Submenus are only created by their parent menu, either through
/// [MenuController::add_submenu] or when an action provider regenerates one.
/// They share the root's callback, presenter and scheduler, and are dropped
/// together with their parent entry.
pub struct SubmenuController {
    parent: EntryKey,
    menu: MenuController,
}

impl SubmenuController {
    pub(crate) fn new(parent: EntryKey, menu: MenuController) -> Self {
        Self { parent, menu }
    }

    /// The entry owning this submenu.
    pub fn parent_entry(&self) -> EntryKey {
        self.parent
    }
}

impl Deref for SubmenuController {
    type Target = MenuController;

    fn deref(&self) -> &Self::Target {
        &self.menu
    }
}

impl DerefMut for SubmenuController {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.menu
    }
}
