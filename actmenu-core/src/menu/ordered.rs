//! Priority-ordered storage of menu entries.

use crate::menu::entry::{EntryKey, ItemId, MenuEntry, NO_ID};

/// Something that can be stored in an [OrderedEntryList].
pub trait Ordered {
    /// Reference identity.
    fn key(&self) -> EntryKey;

    /// Integer id, [NO_ID] if not addressable.
    fn id(&self) -> ItemId;

    /// Ordering key. Lower sorts earlier.
    fn order(&self) -> i32;
}

/// All entries of one menu, kept in `(order, insertion)` order regardless of
/// where they are rendered.
#[derive(Debug)]
pub struct OrderedEntryList<E = MenuEntry> {
    entries: Vec<E>,
}

impl<E> Default for OrderedEntryList<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Ordered> OrderedEntryList<E> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry before the first entry with a greater order.
    ///
    /// Entries with equal order keep their insertion order. If an entry with the
    /// same key is already present nothing changes and the entry is handed back.
    pub fn insert(&mut self, entry: E) -> Result<usize, E> {
        if self.contains(entry.key()) {
            return Err(entry);
        }

        let index = self
            .entries
            .iter()
            .position(|existing| existing.order() > entry.order())
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry);
        Ok(index)
    }

    /// Remove the entry with the given key.
    pub fn remove(&mut self, key: EntryKey) -> Option<E> {
        let index = self.position(key)?;
        Some(self.entries.remove(index))
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry with this key is present.
    pub fn contains(&self, key: EntryKey) -> bool {
        self.entries.iter().any(|entry| entry.key() == key)
    }

    /// Index of the entry with this key.
    pub fn position(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == key)
    }

    /// First entry with this id. [NO_ID] never matches.
    pub fn find_by_id(&self, id: ItemId) -> Option<&E> {
        if id == NO_ID {
            return None;
        }
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Entry with this key.
    pub fn get(&self, key: EntryKey) -> Option<&E> {
        self.entries.iter().find(|entry| entry.key() == key)
    }

    /// Entry with this key, mutably.
    pub fn get_mut(&mut self, key: EntryKey) -> Option<&mut E> {
        self.entries.iter_mut().find(|entry| entry.key() == key)
    }

    /// Entry at a raw index in priority order.
    pub fn at(&self, index: usize) -> Option<&E> {
        self.entries.get(index)
    }

    /// Iterate in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    /// Iterate mutably in priority order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, E> {
        self.entries.iter_mut()
    }

    /// Keys in priority order.
    pub fn keys(&self) -> impl Iterator<Item = EntryKey> + '_ {
        self.entries.iter().map(|entry| entry.key())
    }
}

impl<'a, E> IntoIterator for &'a OrderedEntryList<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
