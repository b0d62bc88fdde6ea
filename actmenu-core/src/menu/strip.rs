//! Action strips: containers outside the scrollable list that hold promoted entries.

use crate::config::MenuConfig;
use crate::error::MenuError;
use crate::menu::entry::EntryKey;
use crate::menu::surrogate::{same_surrogate, SharedSurrogate, SurrogateKind};
use indexmap::IndexMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// The two strips a menu can promote entries into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripRole {
    /// Always shown.
    Primary,
    /// Shown if there is room.
    Secondary,
}

impl fmt::Display for StripRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StripRole::Primary => write!(f, "primary"),
            StripRole::Secondary => write!(f, "secondary"),
        }
    }
}

/// Presents the surrogates of one strip.
///
/// The menu ships [DefaultActionStrip]; a host may substitute its own presenter
/// for the primary strip, e.g. to show action items in its own toolbar.
pub trait ActionStripPresenter {
    /// Try to add a surrogate. Returning `false` makes the entry fall back to the list.
    fn add_surrogate(&mut self, surrogate: SharedSurrogate) -> bool;

    /// Remove a surrogate previously accepted.
    fn remove_surrogate(&mut self, surrogate: &SharedSurrogate) -> Result<(), MenuError>;
}

/// Where default strip containers get attached, usually as header rows over the list.
pub trait StripHost {
    /// Attach the container of a strip.
    fn attach_strip(&mut self, role: StripRole);

    /// Detach the container of a strip.
    fn detach_strip(&mut self, role: StripRole);
}

/// Layout slot of one surrogate inside a [DefaultActionStrip].
#[derive(Clone)]
pub struct StripSlot {
    /// The surrogate.
    pub surrogate: SharedSurrogate,
    /// Fixed width; zero means the width comes from the weight.
    pub width: f64,
    /// Row height.
    pub height: f64,
    /// Share of the strip's width.
    pub weight: f32,
}

/// Built-in strip presenter: lays surrogates out in one row, proportionally to
/// their weight.
pub struct DefaultActionStrip {
    row_height: f64,
    capacity: Option<usize>,
    weight_sum: f32,
    slots: Vec<StripSlot>,
}

impl DefaultActionStrip {
    /// Create an empty strip. `capacity` limits how many surrogates it accepts.
    pub fn new(row_height: f64, capacity: Option<usize>) -> Self {
        Self {
            row_height,
            capacity,
            weight_sum: 0.0,
            slots: Vec::new(),
        }
    }

    /// Create the default strip for a role from the menu configuration.
    pub fn for_role(role: StripRole, config: &MenuConfig) -> Self {
        let capacity = match role {
            StripRole::Primary => config.primary_strip_capacity,
            StripRole::Secondary => config.secondary_strip_capacity,
        };
        Self::new(config.row_height, capacity)
    }

    /// Layout slots in insertion order.
    pub fn slots(&self) -> &[StripSlot] {
        &self.slots
    }

    /// Cumulative weight of all slots.
    pub fn weight_sum(&self) -> f32 {
        self.weight_sum
    }

    /// Number of surrogates.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the strip holds no surrogates.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl ActionStripPresenter for DefaultActionStrip {
    fn add_surrogate(&mut self, surrogate: SharedSurrogate) -> bool {
        if self.capacity.is_some_and(|capacity| self.slots.len() >= capacity) {
            return false;
        }

        // Provider views weigh as many buttons as they contain.
        let weight = match surrogate.try_borrow() {
            Ok(view) if view.kind() == SurrogateKind::ProviderView => view.weight(),
            _ => 1.0,
        };

        self.weight_sum += weight;
        self.slots.push(StripSlot {
            surrogate,
            width: 0.0,
            height: self.row_height,
            weight,
        });
        true
    }

    fn remove_surrogate(&mut self, surrogate: &SharedSurrogate) -> Result<(), MenuError> {
        if let Some(index) = self
            .slots
            .iter()
            .position(|slot| same_surrogate(&slot.surrogate, surrogate))
        {
            let slot = self.slots.remove(index);
            self.weight_sum -= slot.weight;
        }
        Ok(())
    }
}

struct Placed {
    surrogate: SharedSurrogate,
    alive: Rc<()>,
}

/// Owns the entry to surrogate mapping of one strip and brackets every
/// add/remove sequence with container attach/detach.
pub struct ActionStripPlacer {
    role: StripRole,
    presenter: Box<dyn ActionStripPresenter>,
    external: bool,
    attached: bool,
    placed: IndexMap<EntryKey, Placed>,
}

impl ActionStripPlacer {
    /// Create a placer backed by the built-in strip.
    pub fn new(role: StripRole, config: &MenuConfig) -> Self {
        Self {
            role,
            presenter: Box::new(DefaultActionStrip::for_role(role, config)),
            external: false,
            attached: false,
            placed: IndexMap::new(),
        }
    }

    /// Strip this placer manages.
    pub fn role(&self) -> StripRole {
        self.role
    }

    /// Whether the presenter was supplied by the host.
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Whether the container is currently attached to the host.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of placed entries.
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// Whether no entry is placed.
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Whether an entry is placed in this strip.
    pub fn contains(&self, key: EntryKey) -> bool {
        self.placed.contains_key(&key)
    }

    /// Placed entries in placement order.
    pub fn keys(&self) -> impl Iterator<Item = EntryKey> + '_ {
        self.placed.keys().copied()
    }

    /// Surrogate of a placed entry.
    pub fn surrogate(&self, key: EntryKey) -> Option<&SharedSurrogate> {
        self.placed.get(&key).map(|placed| &placed.surrogate)
    }

    /// All placed surrogates.
    pub fn surrogates(&self) -> impl Iterator<Item = &SharedSurrogate> + '_ {
        self.placed.values().map(|placed| &placed.surrogate)
    }

    /// Entry a surrogate of this strip stands for.
    pub fn entry_for(&self, surrogate: &SharedSurrogate) -> Option<EntryKey> {
        self.placed
            .iter()
            .find(|(_, placed)| same_surrogate(&placed.surrogate, surrogate))
            .map(|(key, _)| *key)
    }

    /// Token that dies as soon as the entry leaves this strip.
    pub(crate) fn liveness(&self, key: EntryKey) -> Option<Weak<()>> {
        self.placed.get(&key).map(|placed| Rc::downgrade(&placed.alive))
    }

    /// Try to place an entry's surrogate.
    ///
    /// Returns `false` if the presenter refused; the caller falls back to the list.
    pub fn place(
        &mut self,
        key: EntryKey,
        surrogate: SharedSurrogate,
        host: &mut dyn StripHost,
    ) -> bool {
        if self.placed.contains_key(&key) {
            log::debug!("Entry {} is already placed in the {} strip", key, self.role);
            return true;
        }

        if self.placed.is_empty() && !self.external && !self.attached {
            host.attach_strip(self.role);
            self.attached = true;
        }

        if !self.presenter.add_surrogate(surrogate.clone()) {
            log::debug!("The {} strip refused entry {}", self.role, key);
            self.detach_if_empty(host);
            return false;
        }

        self.placed.insert(
            key,
            Placed {
                surrogate,
                alive: Rc::new(()),
            },
        );
        true
    }

    /// Remove an entry from the strip.
    ///
    /// The mapping is cleared even if the presenter fails to remove the surrogate.
    pub fn unplace(
        &mut self,
        key: EntryKey,
        host: &mut dyn StripHost,
    ) -> Result<Option<SharedSurrogate>, MenuError> {
        let Some(placed) = self.placed.shift_remove(&key) else {
            return Ok(None);
        };

        let removed = self.presenter.remove_surrogate(&placed.surrogate);
        self.detach_if_empty(host);
        removed.map(|()| Some(placed.surrogate))
    }

    /// Remove every entry. Returns the first presenter failure, after removing everything.
    pub fn clear(&mut self, host: &mut dyn StripHost) -> Result<(), MenuError> {
        let mut first_error = None;
        for (key, placed) in self.placed.drain(..) {
            if let Err(err) = self.presenter.remove_surrogate(&placed.surrogate) {
                log::warn!("Failed to remove entry {} from the {} strip: {}", key, self.role, err);
                first_error.get_or_insert(err);
            }
        }
        self.detach_if_empty(host);

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Swap the presenter. Only valid while the strip is empty.
    pub(crate) fn replace_presenter(
        &mut self,
        presenter: Box<dyn ActionStripPresenter>,
        external: bool,
        host: &mut dyn StripHost,
    ) {
        debug_assert!(self.placed.is_empty(), "strip presenter swapped while in use");
        self.detach_if_empty(host);
        self.presenter = presenter;
        self.external = external;
    }

    fn detach_if_empty(&mut self, host: &mut dyn StripHost) {
        if self.placed.is_empty() && self.attached {
            host.detach_strip(self.role);
            self.attached = false;
        }
    }
}
