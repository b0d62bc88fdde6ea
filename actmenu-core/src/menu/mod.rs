//! Menu with action strips
//!
//! Entries live in one priority-ordered list. Entries asking to be shown as
//! actions are promoted into a primary or secondary strip when the strip
//! accepts them; all other visible entries are rows of the scrollable list.

pub mod changes;
pub mod controller;
pub mod entry;
pub mod host;
pub mod ordered;
pub mod projection;
pub mod strip;
pub mod submenu;
pub mod surrogate;

// Re-export core types
pub use changes::{ChangeKind, EntryChange, EntryChangeSender};
pub use controller::{MenuController, Selection};
pub use entry::{
    ClickHandler, DisplayMode, EntryFlags, EntryKey, EntrySnapshot, ItemId, MenuEntry, Placement,
    NO_ID,
};
pub use host::{ActionProvider, MenuCallback, MenuPresenter, MenuSurface};
pub use ordered::{Ordered, OrderedEntryList};
pub use projection::{RowKind, VisibleEntryProjection};
pub use strip::{
    ActionStripPlacer, ActionStripPresenter, DefaultActionStrip, StripHost, StripRole, StripSlot,
};
pub use submenu::SubmenuController;
pub use surrogate::{
    same_surrogate, share, DefaultRow, DefaultSurrogateFactory, ProviderView, SharedSurrogate,
    StripButton, Surrogate, SurrogateFactory, SurrogateKind, SurrogateState,
};
