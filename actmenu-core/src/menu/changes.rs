//! Entry changes sent from threads that do not own the menu.

use crate::menu::entry::{DisplayMode, EntryKey, MenuEntry};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// What changes on an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    /// New title.
    Title(String),
    /// New icon, or none.
    Icon(Option<String>),
    /// New visibility.
    Visible(bool),
    /// New enabled state.
    Enabled(bool),
    /// New check mark.
    Checked(bool),
    /// New display mode. Triggers re-placement.
    DisplayMode(DisplayMode),
}

/// A change addressed to one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryChange {
    /// Target entry.
    pub key: EntryKey,
    /// The change.
    pub kind: ChangeKind,
}

impl EntryChange {
    /// Apply the change to an entry.
    pub fn apply(self, entry: &mut MenuEntry) {
        match self.kind {
            ChangeKind::Title(title) => entry.set_title(title),
            ChangeKind::Icon(icon) => entry.set_icon(icon),
            ChangeKind::Visible(visible) => entry.set_visible(visible),
            ChangeKind::Enabled(enabled) => entry.set_enabled(enabled),
            ChangeKind::Checked(checked) => entry.set_checked(checked),
            ChangeKind::DisplayMode(mode) => entry.set_display_mode(mode),
        }
    }
}

/// Sending half handed to other threads. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EntryChangeSender {
    tx: UnboundedSender<EntryChange>,
}

impl EntryChangeSender {
    /// Queue a change. Returns `false` if the menu is gone.
    pub fn send(&self, key: EntryKey, kind: ChangeKind) -> bool {
        self.tx.send(EntryChange { key, kind }).is_ok()
    }
}

/// Receiving half kept by the controller.
#[derive(Debug)]
pub(crate) struct ChangeInbox {
    tx: UnboundedSender<EntryChange>,
    rx: UnboundedReceiver<EntryChange>,
}

impl ChangeInbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> EntryChangeSender {
        EntryChangeSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued so far, in send order.
    pub(crate) fn drain(&mut self) -> Vec<EntryChange> {
        let mut changes = Vec::new();
        while let Ok(change) = self.rx.try_recv() {
            changes.push(change);
        }
        changes
    }
}
