//! Per-tig summary statistics
//!
//! Kept both inside the `MultiAlign` and inside its metadata record, so
//! summary accessors never need to read a payload file.

use serde::{Deserialize, Serialize};

/// Unitig classification assigned by the scaffolder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitigStatus {
    Unique,
    NotRez,
    Separable,
    #[default]
    Unassigned,
}

/// Forced uniqueness/repeat classification of a unitig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitigFur {
    #[default]
    ForcedNone,
    ForcedUnique,
    ForcedRepeat,
}

/// Contig placement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContigStatus {
    Placed,
    #[default]
    Unplaced,
}

impl UnitigStatus {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            UnitigStatus::Unique => b'U',
            UnitigStatus::NotRez => b'N',
            UnitigStatus::Separable => b'S',
            UnitigStatus::Unassigned => b'X',
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'U' => Some(UnitigStatus::Unique),
            b'N' => Some(UnitigStatus::NotRez),
            b'S' => Some(UnitigStatus::Separable),
            b'X' => Some(UnitigStatus::Unassigned),
            _ => None,
        }
    }
}

impl UnitigFur {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            UnitigFur::ForcedNone => b'X',
            UnitigFur::ForcedUnique => b'U',
            UnitigFur::ForcedRepeat => b'R',
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'X' => Some(UnitigFur::ForcedNone),
            b'U' => Some(UnitigFur::ForcedUnique),
            b'R' => Some(UnitigFur::ForcedRepeat),
            _ => None,
        }
    }
}

impl ContigStatus {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            ContigStatus::Placed => b'P',
            ContigStatus::Unplaced => b'U',
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'P' => Some(ContigStatus::Placed),
            b'U' => Some(ContigStatus::Unplaced),
            _ => None,
        }
    }
}

/// Summary statistics of one tig
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TigSummary {
    /// Arrival-rate statistic used to call unique unitigs
    pub coverage_stat: f64,
    /// Probability the unitig is a collapsed repeat with micro-heterogeneity
    pub microhet_prob: f64,
    pub unitig_status: UnitigStatus,
    pub unique_rept: UnitigFur,
    pub contig_status: ContigStatus,
    /// Fragments placed in the tig
    pub num_frags: u32,
    /// Unitigs placed in the tig (contigs only)
    pub num_unitigs: u32,
}
