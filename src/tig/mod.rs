//! Tig Module
//!
//! The objects held by the store. The store treats a `MultiAlign` as an
//! opaque serialized blob; only its id and its `TigSummary` are
//! interpreted.
//!
//! ## Responsibilities
//! - Name the two record classes (unitigs and contigs)
//! - Carry the summary duplicated into every metadata record
//! - Serialize with serde so payload files can hold them

mod multialign;
mod summary;

pub use multialign::{MultiAlign, Placement};
pub use summary::{ContigStatus, TigSummary, UnitigFur, UnitigStatus};

/// The two record classes managed by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TigClass {
    Unitig,
    Contig,
}

impl TigClass {
    /// Both classes, unitigs first
    pub const ALL: [TigClass; 2] = [TigClass::Unitig, TigClass::Contig];

    /// File extension of this class's record tables
    pub fn extension(self) -> &'static str {
        match self {
            TigClass::Unitig => "utg",
            TigClass::Contig => "ctg",
        }
    }

    /// One-byte tag stored in record table headers
    pub(crate) fn code(self) -> u8 {
        match self {
            TigClass::Unitig => b'U',
            TigClass::Contig => b'C',
        }
    }

    pub fn is_unitig(self) -> bool {
        self == TigClass::Unitig
    }
}

impl From<bool> for TigClass {
    /// `true` selects unitigs
    fn from(is_unitig: bool) -> Self {
        if is_unitig {
            TigClass::Unitig
        } else {
            TigClass::Contig
        }
    }
}

impl std::fmt::Display for TigClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TigClass::Unitig => f.write_str("unitig"),
            TigClass::Contig => f.write_str("contig"),
        }
    }
}
