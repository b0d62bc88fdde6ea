//! The list-rendered view over an [OrderedEntryList].

use crate::menu::entry::{EntryKey, MenuEntry, Placement};
use crate::menu::ordered::OrderedEntryList;
use std::cell::OnceCell;

/// Kind of row a list position renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// A plain row built by the surrogate factory.
    Default,
    /// A row supplied by the entry's action provider.
    ActionMode,
}

impl RowKind {
    /// Row kind for an entry.
    pub fn of(entry: &MenuEntry) -> Self {
        if entry.has_action_provider() {
            RowKind::ActionMode
        } else {
            RowKind::Default
        }
    }
}

/// Entries shown in the scrollable list: list-placed and visible, in priority
/// order, with dense zero-based positions.
///
/// The row set is computed lazily on first access after [invalidate](Self::invalidate).
/// Every invalidation bumps [generation](Self::generation), which hosts poll as
/// their "data set changed" signal.
#[derive(Debug, Default)]
pub struct VisibleEntryProjection {
    rows: OnceCell<Vec<EntryKey>>,
    generation: u64,
}

impl VisibleEntryProjection {
    /// Create an empty, stale projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached rows. They are rebuilt on next access.
    pub fn invalidate(&mut self) {
        self.rows.take();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of invalidations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an entry qualifies for a list row.
    pub fn qualifies(entry: &MenuEntry) -> bool {
        entry.placement() == Placement::List && entry.is_visible()
    }

    fn rows(&self, entries: &OrderedEntryList) -> &[EntryKey] {
        self.rows.get_or_init(|| {
            entries
                .iter()
                .filter(|entry| Self::qualifies(entry))
                .map(MenuEntry::key)
                .collect()
        })
    }

    /// Number of list rows.
    pub fn count(&self, entries: &OrderedEntryList) -> usize {
        self.rows(entries).len()
    }

    /// Key of the entry at a list position.
    pub fn key_at(&self, entries: &OrderedEntryList, position: usize) -> Option<EntryKey> {
        self.rows(entries).get(position).copied()
    }

    /// Entry at a list position, `None` if out of range.
    pub fn entry_at<'a>(
        &self,
        entries: &'a OrderedEntryList,
        position: usize,
    ) -> Option<&'a MenuEntry> {
        let key = self.key_at(entries, position)?;
        entries.get(key)
    }

    /// List position of an entry, if it currently has a row.
    pub fn position_of(&self, entries: &OrderedEntryList, key: EntryKey) -> Option<usize> {
        self.rows(entries).iter().position(|row| *row == key)
    }

    /// Row kind at a list position.
    pub fn row_kind(&self, entries: &OrderedEntryList, position: usize) -> Option<RowKind> {
        self.entry_at(entries, position).map(RowKind::of)
    }

    /// Whether the row at a list position reacts to clicks.
    pub fn is_enabled(&self, entries: &OrderedEntryList, position: usize) -> bool {
        self.entry_at(entries, position)
            .is_some_and(MenuEntry::is_enabled)
    }
}
