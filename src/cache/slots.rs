//! Tig cache implementation

use crate::tig::MultiAlign;

/// Store-owned cache of tigs for one class
#[derive(Debug, Default)]
pub struct TigCache {
    slots: Vec<Option<Box<MultiAlign>>>,
}

impl TigCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots (cached or not)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding an object
    pub fn cached_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Extend to `to_len` empty slots. Never shrinks.
    pub fn grow(&mut self, to_len: u32) {
        if to_len as usize > self.slots.len() {
            self.slots.resize_with(to_len as usize, || None);
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Borrow the cached object for `id`
    pub fn get(&self, id: u32) -> Option<&MultiAlign> {
        self.slots.get(id as usize)?.as_deref()
    }

    /// Mutably borrow the cached object for `id`
    pub fn get_mut(&mut self, id: u32) -> Option<&mut MultiAlign> {
        self.slots.get_mut(id as usize)?.as_deref_mut()
    }

    /// Take ownership of `tig` into slot `tig.id`, returning a borrow of it.
    /// Any object previously in the slot is dropped.
    pub fn put(&mut self, tig: MultiAlign) -> &mut MultiAlign {
        let id = tig.id;
        self.grow(id.saturating_add(1));
        self.slots[id as usize].insert(Box::new(tig)).as_mut()
    }

    /// Iterate over (slot id, cached object)
    ///
    /// The slot id is authoritative; a caller may have edited `tig.id`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &MultiAlign)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_deref().map(|tig| (id as u32, tig)))
    }

    /// Drop the cached object for `id`, if any
    pub fn evict(&mut self, id: u32) -> Option<Box<MultiAlign>> {
        self.slots.get_mut(id as usize)?.take()
    }

    /// Empty every slot, yielding (slot id, object) for each cached object
    pub fn drain(&mut self) -> impl Iterator<Item = (u32, Box<MultiAlign>)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(id, s)| s.take().map(|tig| (id as u32, tig)))
    }
}
