//! MultiAlign - the assembly unit persisted by the store

use serde::{Deserialize, Serialize};

use super::TigSummary;

/// Placement of a fragment or unitig inside a multi-alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Fragment or unitig id
    pub ident: u32,
    /// Gapped begin position (greater than `end` when reverse complemented)
    pub begin: i32,
    /// Gapped end position
    pub end: i32,
}

/// A unitig or contig: consensus, its quality values and the placements
/// it was built from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiAlign {
    pub id: u32,
    pub summary: TigSummary,
    pub consensus: Vec<u8>,
    pub quality: Vec<u8>,
    pub fragments: Vec<Placement>,
    pub unitigs: Vec<Placement>,
}

impl MultiAlign {
    /// Create an empty multi-alignment
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Set the gapped consensus and its quality string
    pub fn with_consensus(mut self, consensus: &[u8], quality: &[u8]) -> Self {
        self.consensus = consensus.to_vec();
        self.quality = quality.to_vec();
        self
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: TigSummary) -> Self {
        self.summary = summary;
        self
    }

    /// Add a fragment placement, keeping `summary.num_frags` in step
    pub fn add_fragment(&mut self, placement: Placement) {
        self.fragments.push(placement);
        self.summary.num_frags = self.fragments.len() as u32;
    }

    /// Add a unitig placement, keeping `summary.num_unitigs` in step
    pub fn add_unitig(&mut self, placement: Placement) {
        self.unitigs.push(placement);
        self.summary.num_unitigs = self.unitigs.len() as u32;
    }

    /// Length of the gapped consensus
    pub fn gapped_length(&self) -> usize {
        self.consensus.len()
    }
}
