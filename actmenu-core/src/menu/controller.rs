//! The menu itself: entry insertion, placement between the list and the
//! action strips, selection routing and submenu handling.

use crate::config::MenuConfig;
use crate::error::MenuError;
use crate::menu::changes::{ChangeInbox, EntryChangeSender};
use crate::menu::entry::{
    ClickHandler, DisplayMode, EntryKey, EntrySnapshot, ItemId, MenuEntry, Placement, NO_ID,
};
use crate::menu::host::{ActionProvider, MenuCallback, MenuPresenter, MenuSurface};
use crate::menu::ordered::OrderedEntryList;
use crate::menu::projection::{RowKind, VisibleEntryProjection};
use crate::menu::strip::{ActionStripPlacer, ActionStripPresenter, StripHost, StripRole};
use crate::menu::submenu::SubmenuController;
use crate::menu::surrogate::{
    DefaultSurrogateFactory, SharedSurrogate, Surrogate, SurrogateFactory, SurrogateKind,
};
use crate::tasks::{Scheduler, TaskQueue};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

/// Ids in use across one menu tree. Submenus share their root's registry;
/// provider-built submenus get their own.
type IdRegistry = Rc<RefCell<HashSet<ItemId>>>;

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// No such entry or row.
    NotFound,
    /// The entry is disabled.
    Ignored,
    /// The entry's own click handler consumed the selection and the menu closed.
    Invoked,
    /// The entry's submenu was shown.
    OpenedSubmenu,
    /// The menu closed and the selection went to the menu callback.
    Dispatched {
        /// What the callback returned.
        handled: bool,
    },
}

/// Header rows of one (sub)menu, seen through the [StripHost] contract.
struct HeaderSlot<'a> {
    rows: &'a mut Vec<StripRole>,
    presenter: Option<&'a Rc<dyn MenuPresenter>>,
}

impl StripHost for HeaderSlot<'_> {
    fn attach_strip(&mut self, role: StripRole) {
        if !self.rows.contains(&role) {
            self.rows.push(role);
        }
        if let Some(presenter) = self.presenter {
            presenter.strip_attached(role);
        }
    }

    fn detach_strip(&mut self, role: StripRole) {
        self.rows.retain(|row| *row != role);
        if let Some(presenter) = self.presenter {
            presenter.strip_detached(role);
        }
    }
}

macro_rules! header_slot {
    ($menu:ident) => {
        HeaderSlot {
            rows: &mut $menu.header_rows,
            presenter: $menu.presenter.as_ref(),
        }
    };
}

/// A menu of entries split between a scrollable list and two action strips.
///
/// Entries whose [DisplayMode] asks for a strip are promoted into it if the
/// strip accepts them, and fall back to the list otherwise. An entry is placed
/// in exactly one location at a time. Submenus have no strips and keep every
/// entry in the list.
///
/// The controller is confined to the thread that owns it. Other threads
/// reach it through [change_sender](Self::change_sender).
pub struct MenuController {
    config: MenuConfig,
    entries: OrderedEntryList,
    projection: VisibleEntryProjection,
    primary: ActionStripPlacer,
    secondary: ActionStripPlacer,
    header_rows: Vec<StripRole>,
    callback: Option<Rc<dyn MenuCallback>>,
    presenter: Option<Rc<dyn MenuPresenter>>,
    factory: Rc<dyn SurrogateFactory>,
    scheduler: Rc<dyn Scheduler>,
    show_icons: bool,
    parent: Option<EntryKey>,
    ids: IdRegistry,
    inbox: ChangeInbox,
}

impl MenuController {
    /// Create an empty menu with its own [TaskQueue] for deferred surrogate updates.
    pub fn new(config: MenuConfig) -> Self {
        Self::with_scheduler(config, Rc::new(TaskQueue::new()))
    }

    /// Create an empty menu posting deferred surrogate updates to `scheduler`.
    pub fn with_scheduler(config: MenuConfig, scheduler: Rc<dyn Scheduler>) -> Self {
        Self::build(
            config,
            Rc::new(DefaultSurrogateFactory),
            scheduler,
            None,
            IdRegistry::default(),
        )
    }

    /// Use another factory for rows and strip surrogates created from now on.
    pub fn with_surrogate_factory(mut self, factory: Rc<dyn SurrogateFactory>) -> Self {
        self.factory = factory;
        self
    }

    fn build(
        config: MenuConfig,
        factory: Rc<dyn SurrogateFactory>,
        scheduler: Rc<dyn Scheduler>,
        parent: Option<EntryKey>,
        ids: IdRegistry,
    ) -> Self {
        Self {
            primary: ActionStripPlacer::new(StripRole::Primary, &config),
            secondary: ActionStripPlacer::new(StripRole::Secondary, &config),
            show_icons: config.show_icons,
            config,
            entries: OrderedEntryList::new(),
            projection: VisibleEntryProjection::new(),
            header_rows: Vec::new(),
            callback: None,
            presenter: None,
            factory,
            scheduler,
            parent,
            ids,
            inbox: ChangeInbox::new(),
        }
    }

    /// An empty submenu for the entry `parent`, sharing this menu's collaborators.
    fn new_submenu(&self, parent: EntryKey, ids: IdRegistry) -> SubmenuController {
        let mut menu = Self::build(
            self.config.clone(),
            self.factory.clone(),
            self.scheduler.clone(),
            Some(parent),
            ids,
        );
        menu.callback = self.callback.clone();
        menu.presenter = self.presenter.clone();
        SubmenuController::new(parent, menu)
    }

    /// Configuration the menu was built with.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Entry owning this menu, `None` for a root menu.
    pub fn parent_key(&self) -> Option<EntryKey> {
        self.parent
    }

    // Insertion and removal

    /// Add an entry with no id and default order.
    pub fn add(&mut self, title: impl Into<String>) -> EntryKey {
        self.insert_entry(MenuEntry::titled(title))
    }

    /// Add an entry by id, order and title.
    pub fn add_item(
        &mut self,
        id: ItemId,
        order: i32,
        title: impl Into<String>,
    ) -> Result<EntryKey, MenuError> {
        self.add_entry(MenuEntry::new(id, order, title))
    }

    /// Add a prepared entry.
    ///
    /// Fails with [MenuError::DuplicateId] if the id is already used anywhere
    /// in the menu tree, parents and siblings of a submenu included.
    pub fn add_entry(&mut self, entry: MenuEntry) -> Result<EntryKey, MenuError> {
        if entry.id() != NO_ID && self.ids.borrow().contains(&entry.id()) {
            return Err(MenuError::DuplicateId(entry.id()));
        }
        Ok(self.insert_entry(entry))
    }

    /// Add an entry owning an empty submenu and return the submenu.
    pub fn add_submenu(
        &mut self,
        id: ItemId,
        order: i32,
        title: impl Into<String>,
    ) -> Result<&mut SubmenuController, MenuError> {
        let mut entry = MenuEntry::new(id, order, title);
        entry.submenu = Some(Box::new(self.new_submenu(entry.key(), self.ids.clone())));
        let key = self.add_entry(entry)?;
        self.entries
            .get_mut(key)
            .and_then(MenuEntry::submenu_mut)
            .ok_or(MenuError::UnknownEntry(key))
    }

    fn insert_entry(&mut self, mut entry: MenuEntry) -> EntryKey {
        let key = entry.key();
        let id = entry.id();
        entry.placement = Placement::List;
        if let Err(entry) = self.entries.insert(entry) {
            log::debug!("Entry {} is already in the menu", entry.key());
            return key;
        }
        if id != NO_ID {
            self.ids.borrow_mut().insert(id);
        }
        self.place(key);
        key
    }

    /// Remove the entry with `id`, searching submenus of entries without an
    /// action provider too. Returns the removed entry with its submenu.
    pub fn remove_by_id(&mut self, id: ItemId) -> Option<MenuEntry> {
        if id == NO_ID {
            return None;
        }
        if let Some(key) = self.entries.find_by_id(id).map(MenuEntry::key) {
            return self.remove_local(key);
        }
        self.entries
            .iter_mut()
            .filter(|entry| !entry.has_action_provider())
            .filter_map(MenuEntry::submenu_mut)
            .find_map(|submenu| submenu.remove_by_id(id))
    }

    /// Remove an entry wherever it lives in this menu tree.
    pub fn remove_entry(&mut self, key: EntryKey) -> Option<MenuEntry> {
        self.owner_of_mut(key)?.remove_local(key)
    }

    /// Groups are not tracked; removing one has no effect.
    pub fn remove_group(&mut self, _group: i32) {}

    fn remove_local(&mut self, key: EntryKey) -> Option<MenuEntry> {
        self.unplace(key);
        let entry = self.entries.remove(key)?;
        self.release_id(&entry);
        self.projection.invalidate();
        log::trace!("Removed entry {}", key);
        Some(entry)
    }

    /// Free the ids of an entry leaving the tree, and of its submenu.
    fn release_id(&self, entry: &MenuEntry) {
        self.ids.borrow_mut().remove(&entry.id());
        if let Some(submenu) = entry.submenu() {
            submenu.release_ids();
        }
    }

    fn release_ids(&self) {
        for entry in &self.entries {
            self.release_id(entry);
        }
    }

    /// Remove every entry.
    ///
    /// Submenus are emptied first. Both strips are then emptied and their
    /// header rows detached. The first failure of this menu's own strips is
    /// returned after everything is gone.
    pub fn clear(&mut self) -> Result<(), MenuError> {
        self.clear_entries();

        let mut host = header_slot!(self);
        let primary = self.primary.clear(&mut host);
        let secondary = self.secondary.clear(&mut host);
        primary.and(secondary)
    }

    /// Drop the entries of this menu and of its submenus. Submenus hold no
    /// strips, so nothing in here can fail.
    fn clear_entries(&mut self) {
        for submenu in self.entries.iter_mut().filter_map(MenuEntry::submenu_mut) {
            submenu.clear_entries();
        }
        self.release_ids();
        self.entries.clear();
        self.projection.invalidate();
    }

    // Lookup

    /// Entry with `id`, searching this menu first and then, depth-first, the
    /// submenus of entries without an action provider.
    pub fn find_by_id(&self, id: ItemId) -> Option<&MenuEntry> {
        if id == NO_ID {
            return None;
        }
        for entry in &self.entries {
            if entry.id() == id {
                return Some(entry);
            }
            if entry.has_action_provider() {
                continue;
            }
            if let Some(found) = entry.submenu().and_then(|submenu| submenu.find_by_id(id)) {
                return Some(found);
            }
        }
        None
    }

    /// Entry by key, anywhere in this menu tree.
    pub fn entry(&self, key: EntryKey) -> Option<&MenuEntry> {
        self.owner_of(key)?.entries.get(key)
    }

    /// Submenu of an entry anywhere in this menu tree.
    pub fn submenu(&self, key: EntryKey) -> Option<&SubmenuController> {
        self.entry(key)?.submenu()
    }

    /// Mutable submenu of an entry anywhere in this menu tree.
    pub fn submenu_mut(&mut self, key: EntryKey) -> Option<&mut SubmenuController> {
        self.owner_of_mut(key)?.entries.get_mut(key)?.submenu_mut()
    }

    /// Entries of this menu in priority order, whatever their placement.
    pub fn entries(&self) -> &OrderedEntryList {
        &self.entries
    }

    /// Number of entries in this menu, whatever their placement.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the menu has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at an index of the priority order.
    pub fn item_at(&self, index: usize) -> Option<&MenuEntry> {
        self.entries.at(index)
    }

    /// Whether some list-placed entry is visible. Strip-placed entries never count.
    pub fn has_visible_items(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.is_visible() && !entry.is_strip_placed())
    }

    fn owner_of(&self, key: EntryKey) -> Option<&MenuController> {
        if self.entries.contains(key) {
            return Some(self);
        }
        self.entries
            .iter()
            .filter_map(MenuEntry::submenu)
            .find_map(|submenu| submenu.owner_of(key))
    }

    fn owner_of_mut(&mut self, key: EntryKey) -> Option<&mut MenuController> {
        if self.entries.contains(key) {
            return Some(self);
        }
        self.entries
            .iter_mut()
            .filter_map(MenuEntry::submenu_mut)
            .find_map(|submenu| submenu.owner_of_mut(key))
    }

    // Placement

    fn place(&mut self, key: EntryKey) {
        let Some(mode) = self.entries.get(key).map(MenuEntry::display_mode) else {
            return;
        };

        let strip = mode.preferred_strip().filter(|_| self.parent.is_none());
        let placement = match strip {
            Some(role) if self.place_in_strip(key, role) => Placement::Strip(role),
            _ => Placement::List,
        };
        if let Some(entry) = self.entries.get_mut(key) {
            entry.placement = placement;
        }

        log::debug!("Entry {} placed in {:?}", key, placement);
        self.projection.invalidate();
    }

    fn place_in_strip(&mut self, key: EntryKey, role: StripRole) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };
        let surrogate = self.strip_surrogate_for(entry, role);

        let mut host = header_slot!(self);
        match role {
            StripRole::Primary => self.primary.place(key, surrogate, &mut host),
            StripRole::Secondary => self.secondary.place(key, surrogate, &mut host),
        }
    }

    fn strip_surrogate_for(&self, entry: &MenuEntry, role: StripRole) -> SharedSurrogate {
        let surrogate = entry
            .action_provider()
            .and_then(|provider| provider.create_surrogate(entry))
            .unwrap_or_else(|| self.factory.create_strip_surrogate(entry, role));

        if let Ok(mut view) = surrogate.try_borrow_mut() {
            view.set_show_icon(self.show_icons);
            view.bind(&entry.snapshot());
            view.set_visible(entry.is_visible());
        } else {
            log::warn!("Surrogate of entry {} is busy, leaving it unbound", entry.key());
        }
        surrogate
    }

    /// Take an entry out of its strip, if any. The entry is left list-placed.
    fn unplace(&mut self, key: EntryKey) {
        let Some(Placement::Strip(role)) = self.entries.get(key).map(MenuEntry::placement) else {
            return;
        };

        let mut host = header_slot!(self);
        let removed = match role {
            StripRole::Primary => self.primary.unplace(key, &mut host),
            StripRole::Secondary => self.secondary.unplace(key, &mut host),
        };
        if let Err(err) = removed {
            log::warn!("Failed to remove entry {} from the {} strip: {}", key, role, err);
        }

        if let Some(entry) = self.entries.get_mut(key) {
            entry.placement = Placement::List;
        }
    }

    /// Re-run placement after a display mode change.
    fn on_display_mode_changed(&mut self, key: EntryKey) {
        self.unplace(key);
        self.place(key);
    }

    /// Propagate a change of an entry of this menu to wherever it is shown.
    ///
    /// Strip surrogates are refreshed by a task posted to the scheduler; the
    /// task does nothing if the entry has left the strip by the time it runs.
    /// List rows are refreshed through the projection.
    pub fn on_item_changed(&mut self, key: EntryKey) {
        let Some(entry) = self.entries.get(key) else {
            return;
        };

        match entry.placement() {
            Placement::Strip(role) => {
                let placer = self.strip(role);
                let (Some(surrogate), Some(alive)) = (placer.surrogate(key), placer.liveness(key))
                else {
                    return;
                };
                let target = Rc::downgrade(surrogate);
                let snapshot = entry.snapshot();
                self.scheduler
                    .post(Box::new(move || refresh_surrogate(&alive, &target, snapshot)));
            },
            Placement::List => self.projection.invalidate(),
        }
    }

    // Mutation

    /// Mutate an entry anywhere in this menu tree, then re-place or refresh it.
    ///
    /// Returns `false` if the entry is unknown.
    pub fn update_entry<F>(&mut self, key: EntryKey, update: F) -> bool
    where
        F: FnOnce(&mut MenuEntry),
    {
        match self.owner_of_mut(key) {
            Some(owner) => {
                owner.update_local(key, update);
                true
            },
            None => false,
        }
    }

    fn update_local<F>(&mut self, key: EntryKey, update: F)
    where
        F: FnOnce(&mut MenuEntry),
    {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        let mode = entry.display_mode();
        update(entry);

        if entry.display_mode() != mode {
            self.on_display_mode_changed(key);
        } else {
            self.on_item_changed(key);
        }
    }

    /// Change where an entry prefers to be shown.
    pub fn set_display_mode(&mut self, key: EntryKey, mode: DisplayMode) -> bool {
        self.update_entry(key, |entry| entry.set_display_mode(mode))
    }

    /// Show or hide an entry.
    pub fn set_visible(&mut self, key: EntryKey, visible: bool) -> bool {
        self.update_entry(key, |entry| entry.set_visible(visible))
    }

    /// Enable or disable an entry.
    pub fn set_enabled(&mut self, key: EntryKey, enabled: bool) -> bool {
        self.update_entry(key, |entry| entry.set_enabled(enabled))
    }

    /// Check or uncheck a checkable entry.
    pub fn set_checked(&mut self, key: EntryKey, checked: bool) -> bool {
        self.update_entry(key, |entry| entry.set_checked(checked))
    }

    /// Rename an entry.
    pub fn set_title(&mut self, key: EntryKey, title: impl Into<String>) -> bool {
        let title = title.into();
        self.update_entry(key, |entry| entry.set_title(title))
    }

    /// Change or remove the icon of an entry.
    pub fn set_icon(&mut self, key: EntryKey, icon: Option<String>) -> bool {
        self.update_entry(key, |entry| entry.set_icon(icon))
    }

    /// Attach or detach an action provider.
    pub fn set_action_provider(
        &mut self,
        key: EntryKey,
        provider: Option<Rc<dyn ActionProvider>>,
    ) -> bool {
        self.update_entry(key, |entry| entry.set_action_provider(provider))
    }

    /// Replace the entry's own click handler.
    pub fn set_on_click(&mut self, key: EntryKey, handler: Option<ClickHandler>) -> bool {
        self.update_entry(key, |entry| entry.set_on_click(handler))
    }

    // Collaborators

    /// Set the receiver of terminal selections. Submenus share it.
    ///
    /// Ignored on submenus, which always use their root's callback.
    pub fn set_callback(&mut self, callback: Option<Rc<dyn MenuCallback>>) {
        if self.parent.is_some() {
            log::warn!("Ignoring callback set directly on a submenu");
            return;
        }
        self.propagate_callback(callback);
    }

    fn propagate_callback(&mut self, callback: Option<Rc<dyn MenuCallback>>) {
        for submenu in self.entries.iter_mut().filter_map(MenuEntry::submenu_mut) {
            submenu.propagate_callback(callback.clone());
        }
        self.callback = callback;
    }

    /// Current selection callback.
    pub fn callback(&self) -> Option<&Rc<dyn MenuCallback>> {
        self.callback.as_ref()
    }

    /// Set the presenter showing the menu and its submenus. Submenus share it.
    ///
    /// Ignored on submenus, which always use their root's presenter.
    pub fn set_presenter(&mut self, presenter: Option<Rc<dyn MenuPresenter>>) {
        if self.parent.is_some() {
            log::warn!("Ignoring presenter set directly on a submenu");
            return;
        }
        self.propagate_presenter(presenter);
    }

    fn propagate_presenter(&mut self, presenter: Option<Rc<dyn MenuPresenter>>) {
        for submenu in self.entries.iter_mut().filter_map(MenuEntry::submenu_mut) {
            submenu.propagate_presenter(presenter.clone());
        }
        self.presenter = presenter;
    }

    /// Current menu presenter.
    pub fn presenter(&self) -> Option<&Rc<dyn MenuPresenter>> {
        self.presenter.as_ref()
    }

    /// Replace the primary strip's presenter with one owned by the host.
    ///
    /// Entries currently in the primary strip move over to the new presenter;
    /// the header row of the built-in strip is detached and never attached
    /// again.
    pub fn set_primary_strip_presenter(&mut self, presenter: Box<dyn ActionStripPresenter>) {
        if self.parent.is_some() {
            log::warn!("Ignoring strip presenter set on a submenu");
            return;
        }
        let moved: Vec<EntryKey> = self.primary.keys().collect();
        for key in &moved {
            self.unplace(*key);
        }

        let mut host = header_slot!(self);
        self.primary.replace_presenter(presenter, true, &mut host);

        for key in moved {
            self.place(key);
        }
        self.projection.invalidate();
    }

    /// Whether surrogates show icons.
    pub fn show_icons(&self) -> bool {
        self.show_icons
    }

    /// Show or hide icons on all surrogates of this menu.
    pub fn set_show_icons(&mut self, show: bool) {
        if self.show_icons == show {
            return;
        }
        self.show_icons = show;

        for surrogate in self.primary.surrogates().chain(self.secondary.surrogates()) {
            if let Ok(mut view) = surrogate.try_borrow_mut() {
                view.set_show_icon(show);
            }
        }
        self.projection.invalidate();
    }

    /// Ask the presenter to open the menu.
    pub fn open(&self) {
        if let Some(presenter) = &self.presenter {
            presenter.open();
        }
    }

    /// Ask the presenter to close the menu.
    pub fn close(&self) {
        if let Some(presenter) = &self.presenter {
            presenter.close();
        }
    }

    // Selection

    /// Select an entry anywhere in this menu tree.
    ///
    /// Disabled entries are ignored. An entry's own click handler wins and
    /// closes the menu. Entries with a submenu open it; an action provider
    /// first regenerates the submenu from scratch. Everything else closes the
    /// menu and goes to the callback.
    pub fn select(&mut self, key: EntryKey) -> Selection {
        match self.owner_of_mut(key) {
            Some(owner) => owner.select_local(key),
            None => Selection::NotFound,
        }
    }

    /// Select the entry at a position of the list projection.
    pub fn select_at(&mut self, position: usize) -> Selection {
        match self.projection.key_at(&self.entries, position) {
            Some(key) => self.select_local(key),
            None => Selection::NotFound,
        }
    }

    /// Handle a click on a raw list row. Header rows come first and select nothing.
    pub fn on_row_activated(&mut self, row: usize) -> Selection {
        match row.checked_sub(self.header_rows.len()) {
            Some(position) => self.select_at(position),
            None => Selection::NotFound,
        }
    }

    /// Handle a click on a strip surrogate.
    pub fn on_surrogate_activated(&mut self, surrogate: &SharedSurrogate) -> Selection {
        let key = self
            .primary
            .entry_for(surrogate)
            .or_else(|| self.secondary.entry_for(surrogate));
        match key {
            Some(key) => self.select_local(key),
            None => Selection::NotFound,
        }
    }

    /// Select the entry with `id` as if it had been clicked.
    pub fn perform_identifier_action(&mut self, id: ItemId) -> Selection {
        match self.find_by_id(id).map(MenuEntry::key) {
            Some(key) => self.select(key),
            None => Selection::NotFound,
        }
    }

    fn select_local(&mut self, key: EntryKey) -> Selection {
        let Some(entry) = self.entries.get(key) else {
            return Selection::NotFound;
        };

        if !entry.is_enabled() {
            log::trace!("Ignoring selection of disabled entry {}", key);
            return Selection::Ignored;
        }

        if entry.invoke() {
            self.close();
            return Selection::Invoked;
        }

        if entry.has_submenu() {
            if let Some(provider) = entry.action_provider().cloned() {
                self.regenerate_submenu(key, provider.as_ref());
            }
            self.show_submenu(key);
            return Selection::OpenedSubmenu;
        }

        self.close();

        debug_assert!(
            self.callback.is_some(),
            "menu callback must be set before entries are selected"
        );
        let Some(callback) = &self.callback else {
            log::error!("Entry {} selected without a menu callback", key);
            return Selection::Dispatched { handled: false };
        };
        let handled = callback.on_entry_selected(entry);
        Selection::Dispatched { handled }
    }

    fn regenerate_submenu(&mut self, key: EntryKey, provider: &dyn ActionProvider) {
        let mut submenu = self.new_submenu(key, IdRegistry::default());
        submenu.set_show_icons(self.config.provider_submenu_icons);
        provider.on_prepare_submenu(&mut submenu);

        if let Some(entry) = self.entries.get_mut(key) {
            if let Some(old) = entry.submenu.replace(Box::new(submenu)) {
                old.release_ids();
            }
        }
        log::debug!("Regenerated submenu of entry {}", key);
    }

    fn show_submenu(&self, key: EntryKey) {
        let Some(presenter) = &self.presenter else {
            log::warn!("No presenter to show the submenu of entry {}", key);
            return;
        };
        if let Some(menu) = self.entries.get(key).and_then(MenuEntry::submenu) {
            presenter.show(MenuSurface { parent: key, menu });
        }
    }

    // Strips and rows

    /// The placer of a strip.
    pub fn strip(&self, role: StripRole) -> &ActionStripPlacer {
        match role {
            StripRole::Primary => &self.primary,
            StripRole::Secondary => &self.secondary,
        }
    }

    /// Strip surrogate of a strip-placed entry of this menu.
    pub fn strip_surrogate(&self, key: EntryKey) -> Option<&SharedSurrogate> {
        match self.entries.get(key)?.placement() {
            Placement::Strip(role) => self.strip(role).surrogate(key),
            Placement::List => None,
        }
    }

    /// Header rows currently attached over the list, in attach order.
    pub fn header_rows(&self) -> &[StripRole] {
        &self.header_rows
    }

    /// Number of header rows over the list.
    pub fn header_count(&self) -> usize {
        self.header_rows.len()
    }

    /// Number of rows of the list projection.
    pub fn visible_count(&self) -> usize {
        self.projection.count(&self.entries)
    }

    /// Entry at a list position.
    pub fn visible_entry_at(&self, position: usize) -> Option<&MenuEntry> {
        self.projection.entry_at(&self.entries, position)
    }

    /// List position of an entry, if it has a row.
    pub fn visible_position_of(&self, key: EntryKey) -> Option<usize> {
        self.projection.position_of(&self.entries, key)
    }

    /// Row kind at a list position.
    pub fn row_kind(&self, position: usize) -> Option<RowKind> {
        self.projection.row_kind(&self.entries, position)
    }

    /// Whether the row at a list position reacts to clicks.
    pub fn is_row_enabled(&self, position: usize) -> bool {
        self.projection.is_enabled(&self.entries, position)
    }

    /// Bumped whenever the list rows may have changed.
    pub fn projection_generation(&self) -> u64 {
        self.projection.generation()
    }

    /// Produce the surrogate of a list row.
    ///
    /// Plain rows reuse `recycled` if it is a plain row too. Action mode rows
    /// come from the entry's provider and are never recycled.
    pub fn render_row(
        &self,
        position: usize,
        recycled: Option<SharedSurrogate>,
    ) -> Option<SharedSurrogate> {
        let entry = self.projection.entry_at(&self.entries, position)?;

        let surrogate = match RowKind::of(entry) {
            RowKind::ActionMode => entry
                .action_provider()
                .and_then(|provider| provider.create_surrogate(entry))
                .unwrap_or_else(|| self.factory.create_row(entry)),
            RowKind::Default => recycled
                .filter(|view| {
                    view.try_borrow()
                        .is_ok_and(|view| view.kind() == SurrogateKind::Row)
                })
                .unwrap_or_else(|| self.factory.create_row(entry)),
        };

        if let Ok(mut view) = surrogate.try_borrow_mut() {
            view.set_show_icon(self.show_icons);
            view.set_visible(true);
            view.bind(&entry.snapshot());
        } else {
            log::warn!("Row surrogate of entry {} is busy", entry.key());
        }
        Some(surrogate)
    }

    // Deferred work

    /// Run deferred surrogate updates, if the scheduler is driven by the menu.
    pub fn run_deferred(&self) -> usize {
        self.scheduler.run_pending()
    }

    /// A sender other threads use to change entries of this menu tree.
    pub fn change_sender(&self) -> EntryChangeSender {
        self.inbox.sender()
    }

    /// Apply changes sent through [change_sender](Self::change_sender), in send
    /// order. Returns the number of changes received.
    pub fn apply_pending_changes(&mut self) -> usize {
        let changes = self.inbox.drain();
        let count = changes.len();
        for change in changes {
            let key = change.key;
            if !self.update_entry(key, |entry| change.apply(entry)) {
                log::trace!("Dropping change for unknown entry {}", key);
            }
        }
        count
    }
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new(MenuConfig::default())
    }
}

fn refresh_surrogate(
    alive: &Weak<()>,
    target: &Weak<RefCell<dyn Surrogate>>,
    snapshot: EntrySnapshot,
) {
    if alive.upgrade().is_none() {
        log::trace!("Entry {} left its strip, skipping refresh", snapshot.key);
        return;
    }
    let Some(shared) = target.upgrade() else {
        log::trace!("Surrogate of entry {} is gone, skipping refresh", snapshot.key);
        return;
    };
    let Ok(mut view) = shared.try_borrow_mut() else {
        log::warn!("Surrogate of entry {} is busy, skipping refresh", snapshot.key);
        return;
    };

    if snapshot.visible {
        view.set_visible(true);
        view.bind(&snapshot);
    } else {
        view.set_visible(false);
    }
}
