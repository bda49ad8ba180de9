//! Mutable borrow of a cached tig

use std::ops::{Deref, DerefMut};

use crate::tig::{MultiAlign, TigSummary};

/// A cached tig borrowed mutably from the store
///
/// On drop the tig's summary is copied into its metadata record, so summary
/// accessors see edits at once. The id is fixed by the slot: an edited
/// `id` is put back.
pub struct TigMut<'a> {
    id: u32,
    tig: &'a mut MultiAlign,
    record_summary: &'a mut TigSummary,
}

impl<'a> TigMut<'a> {
    pub(crate) fn new(id: u32, tig: &'a mut MultiAlign, record_summary: &'a mut TigSummary) -> Self {
        Self {
            id,
            tig,
            record_summary,
        }
    }

    /// Id of the slot this tig lives in
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Deref for TigMut<'_> {
    type Target = MultiAlign;

    fn deref(&self) -> &MultiAlign {
        &*self.tig
    }
}

impl DerefMut for TigMut<'_> {
    fn deref_mut(&mut self) -> &mut MultiAlign {
        &mut *self.tig
    }
}

impl Drop for TigMut<'_> {
    fn drop(&mut self) {
        if self.tig.id != self.id {
            tracing::warn!(
                "Cached tig {} was given id {}; keeping {}",
                self.id,
                self.tig.id,
                self.id
            );
            self.tig.id = self.id;
        }
        *self.record_summary = self.tig.summary;
    }
}
