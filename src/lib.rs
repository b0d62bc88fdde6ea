#![warn(missing_docs)]

//! Menus whose entries can be promoted out of the list into action strips.

pub use actmenu_core as core;

/// A "prelude" for users of actmenu.
///
/// Importing this module brings into scope the most common types
/// needed to build and drive a menu.
///
/// ```rust
/// use actmenu::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::config::MenuConfig;
    pub use crate::core::error::{ConfigError, MenuError};
    pub use crate::core::menu::{
        share, ActionProvider, ActionStripPresenter, ChangeKind, DisplayMode, EntryKey,
        MenuCallback, MenuController, MenuEntry, MenuPresenter, MenuSurface, Placement, RowKind,
        Selection, SharedSurrogate, StripRole, SubmenuController, Surrogate, SurrogateFactory,
    };
    pub use crate::core::tasks::{ImmediateScheduler, Scheduler, TaskQueue};
}
