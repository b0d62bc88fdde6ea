//! Menu entry data model.
//!
//! A [MenuEntry] is one addressable menu item. Entries are owned by the
//! [MenuController](crate::menu::controller::MenuController) they were added to
//! and are mutated through it, so placement and redraw notifications are never
//! skipped.

use crate::menu::host::ActionProvider;
use crate::menu::ordered::Ordered;
use crate::menu::strip::StripRole;
use crate::menu::submenu::SubmenuController;
use bitflags::bitflags;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Integer identity of a menu entry, unique within one controller scope.
pub type ItemId = i32;

/// Sentinel id for entries that are not addressable by id. Matches nothing.
pub const NO_ID: ItemId = 0;

/// Handler run when an entry is invoked. Returns `true` if the click was consumed.
pub type ClickHandler = Rc<dyn Fn(&MenuEntry) -> bool>;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique reference identity of a menu entry.
///
/// Unlike [ItemId], keys are never shared: two entries added with [NO_ID] still
/// have distinct keys. Keys are `Send` so they can address entries from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

#[allow(clippy::new_without_default)]
impl EntryKey {
    /// Allocate a fresh key.
    pub fn new() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value of the key.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an entry would like to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Only ever rendered in the scrollable list.
    #[default]
    Never,
    /// Promoted into the secondary strip if it accepts the entry.
    IfRoom,
    /// Promoted into the primary strip if it accepts the entry.
    Always,
}

impl DisplayMode {
    /// The strip this mode prefers, if any.
    pub fn preferred_strip(self) -> Option<StripRole> {
        match self {
            DisplayMode::Never => None,
            DisplayMode::IfRoom => Some(StripRole::Secondary),
            DisplayMode::Always => Some(StripRole::Primary),
        }
    }
}

/// Where an entry is currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    /// In the scrollable list (if visible).
    #[default]
    List,
    /// In one of the two action strips.
    Strip(StripRole),
}

bitflags! {
    /// State flags of a menu entry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u8 {
        /// Entry is rendered at all.
        const VISIBLE = 0b0001;
        /// Entry reacts to selection.
        const ENABLED = 0b0010;
        /// Entry can carry a check mark.
        const CHECKABLE = 0b0100;
        /// Entry is checked.
        const CHECKED = 0b1000;
    }
}

impl Default for EntryFlags {
    fn default() -> Self {
        EntryFlags::VISIBLE | EntryFlags::ENABLED
    }
}

/// Display payload of an entry, detached from the entry itself.
///
/// This is what surrogates are bound to. It is cheap to clone and `Send`, so a
/// deferred update can carry it to the owning thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    /// Key of the entry.
    pub key: EntryKey,
    /// Id of the entry.
    pub id: ItemId,
    /// Title text.
    pub title: String,
    /// Icon name, if any.
    pub icon: Option<String>,
    /// Visible flag.
    pub visible: bool,
    /// Enabled flag.
    pub enabled: bool,
    /// Checked flag (only meaningful if checkable).
    pub checked: bool,
    /// Whether the entry leads to a submenu.
    pub has_submenu: bool,
}

/// One menu item.
pub struct MenuEntry {
    key: EntryKey,
    id: ItemId,
    order: i32,
    title: String,
    icon: Option<String>,
    flags: EntryFlags,
    display_mode: DisplayMode,
    pub(crate) placement: Placement,
    pub(crate) submenu: Option<Box<SubmenuController>>,
    action_provider: Option<Rc<dyn ActionProvider>>,
    on_click: Option<ClickHandler>,
}

impl MenuEntry {
    /// Create a new entry with an id, an ordering key and a title.
    pub fn new(id: ItemId, order: i32, title: impl Into<String>) -> Self {
        Self {
            key: EntryKey::new(),
            id,
            order,
            title: title.into(),
            icon: None,
            flags: EntryFlags::default(),
            display_mode: DisplayMode::Never,
            placement: Placement::List,
            submenu: None,
            action_provider: None,
            on_click: None,
        }
    }

    /// Create an entry without id and with the default order.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(NO_ID, 0, title)
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the display mode.
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    /// Set visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.set_visible(visible);
        self
    }

    /// Set enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.set_enabled(enabled);
        self
    }

    /// Make the entry checkable.
    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.set_checkable(checkable);
        self
    }

    /// Set the click handler used when the entry is invoked.
    pub fn with_on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MenuEntry) -> bool + 'static,
    {
        self.on_click = Some(Rc::new(handler));
        self
    }

    /// Bind an action provider.
    pub fn with_action_provider(mut self, provider: Rc<dyn ActionProvider>) -> Self {
        self.action_provider = Some(provider);
        self
    }

    /// Reference identity of this entry.
    pub fn key(&self) -> EntryKey {
        self.key
    }

    /// Integer id ([NO_ID] if none).
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Ordering key. Lower sorts earlier.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Icon name.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Current state flags.
    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    /// Whether the entry is rendered at all.
    pub fn is_visible(&self) -> bool {
        self.flags.contains(EntryFlags::VISIBLE)
    }

    /// Whether the entry reacts to selection.
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(EntryFlags::ENABLED)
    }

    /// Whether the entry can carry a check mark.
    pub fn is_checkable(&self) -> bool {
        self.flags.contains(EntryFlags::CHECKABLE)
    }

    /// Whether the entry is checked.
    pub fn is_checked(&self) -> bool {
        self.flags.contains(EntryFlags::CHECKED)
    }

    /// Requested display mode.
    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Where the entry is rendered right now.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Whether the entry currently lives in one of the strips.
    pub fn is_strip_placed(&self) -> bool {
        matches!(self.placement, Placement::Strip(_))
    }

    /// Whether the entry leads to a submenu, either attached or generated by its provider.
    pub fn has_submenu(&self) -> bool {
        self.submenu.is_some()
            || self
                .action_provider
                .as_ref()
                .is_some_and(|provider| provider.has_submenu())
    }

    /// The attached submenu, if one was created.
    pub fn submenu(&self) -> Option<&SubmenuController> {
        self.submenu.as_deref()
    }

    /// The attached submenu, mutably.
    pub fn submenu_mut(&mut self) -> Option<&mut SubmenuController> {
        self.submenu.as_deref_mut()
    }

    /// The bound action provider.
    pub fn action_provider(&self) -> Option<&Rc<dyn ActionProvider>> {
        self.action_provider.as_ref()
    }

    /// Whether an action provider is bound.
    pub fn has_action_provider(&self) -> bool {
        self.action_provider.is_some()
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set or clear the icon.
    pub fn set_icon(&mut self, icon: Option<String>) {
        self.icon = icon;
    }

    /// Set visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(EntryFlags::VISIBLE, visible);
    }

    /// Set enabled state.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(EntryFlags::ENABLED, enabled);
    }

    /// Set whether the entry can be checked. Clearing it also clears the check mark.
    pub fn set_checkable(&mut self, checkable: bool) {
        self.flags.set(EntryFlags::CHECKABLE, checkable);
        if !checkable {
            self.flags.remove(EntryFlags::CHECKED);
        }
    }

    /// Set the check mark. Ignored for entries that are not checkable.
    pub fn set_checked(&mut self, checked: bool) {
        if self.is_checkable() {
            self.flags.set(EntryFlags::CHECKED, checked);
        }
    }

    /// Change the requested display mode.
    ///
    /// Inside a controller this goes through
    /// [MenuController::set_display_mode](crate::menu::controller::MenuController::set_display_mode)
    /// (or `update_entry`) so that the entry is re-placed.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    /// Bind or unbind an action provider.
    pub fn set_action_provider(&mut self, provider: Option<Rc<dyn ActionProvider>>) {
        self.action_provider = provider;
    }

    /// Set or clear the click handler.
    pub fn set_on_click(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    /// Run the click handler. Returns `true` if it consumed the click.
    pub fn invoke(&self) -> bool {
        match &self.on_click {
            Some(handler) => handler(self),
            None => false,
        }
    }

    /// Capture the display payload.
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            key: self.key,
            id: self.id,
            title: self.title.clone(),
            icon: self.icon.clone(),
            visible: self.is_visible(),
            enabled: self.is_enabled(),
            checked: self.is_checked(),
            has_submenu: self.has_submenu(),
        }
    }
}

impl Ordered for MenuEntry {
    fn key(&self) -> EntryKey {
        self.key
    }

    fn id(&self) -> ItemId {
        self.id
    }

    fn order(&self) -> i32 {
        self.order
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("order", &self.order)
            .field("title", &self.title)
            .field("flags", &self.flags)
            .field("display_mode", &self.display_mode)
            .field("placement", &self.placement)
            .field("has_submenu", &self.has_submenu())
            .finish_non_exhaustive()
    }
}
