//! Cache Module
//!
//! In-memory copies of loaded or inserted tigs, one slot per id, parallel
//! to the record tables.
//!
//! ## Responsibilities
//! - Own every cached `MultiAlign`; callers only ever borrow them
//! - Grow in step with the record table of its class
//! - Hand cached objects back for summary write-back on flush
//! - Keep record summaries in step with mutable borrows (`TigMut`)
//!
//! ## Data Structure Choice
//! `Vec<Option<Box<MultiAlign>>>`: ids are dense, lookups are O(1), and an
//! empty slot costs one pointer.

mod guard;
mod slots;

pub use guard::TigMut;
pub use slots::TigCache;
