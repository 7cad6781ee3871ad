//! CommonTable maps a common contig id to the node number of the matching contig in each sample.
//!
//! A sample without entry for a common id is "not found", rendered as NF in tables.
//! There is no other representation of a missing match.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// textual rendering of a sample without match
pub const NOT_FOUND: &str = "NF";

/// Identifies a contig common to several samples. Displayed zero padded on 6 digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommonId(u64);

impl CommonId {
    pub fn new(id: u64) -> Self {
        CommonId(id)
    }

    pub fn get_value(&self) -> u64 {
        self.0
    }

    /// name of the record in consolidated fasta files written between passes
    pub fn node_name(&self) -> String {
        format!("NODE_{}", self)
    }

    /// name of the record in the final fasta
    pub fn report_name(&self) -> String {
        format!("CNODE_{}", self)
    }
} // end of impl CommonId

impl fmt::Display for CommonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// common id -> (sample -> node number in sample)
#[derive(Debug, Clone, Default)]
pub struct CommonTable {
    rows: BTreeMap<CommonId, HashMap<String, u64>>,
}

impl CommonTable {
    pub fn new() -> Self {
        CommonTable {
            rows: BTreeMap::new(),
        }
    }

    pub fn contains(&self, cid: CommonId) -> bool {
        self.rows.contains_key(&cid)
    }

    /// records node as the match of sample for cid, replacing a previous match. Creates the row if needed.
    /// Returns the previous node if any.
    pub fn set(&mut self, cid: CommonId, sample: &str, node: u64) -> Option<u64> {
        self.rows
            .entry(cid)
            .or_default()
            .insert(sample.to_string(), node)
    }

    /// node of sample for cid, None if not found
    pub fn get(&self, cid: CommonId, sample: &str) -> Option<u64> {
        self.rows.get(&cid).and_then(|row| row.get(sample).copied())
    }

    /// node number or NF
    pub fn get_display(&self, cid: CommonId, sample: &str) -> String {
        match self.get(cid, sample) {
            Some(node) => node.to_string(),
            None => String::from(NOT_FOUND),
        }
    }

    /// true if every sample has a match for cid. An unknown cid is not complete.
    pub fn is_complete<S: AsRef<str>>(&self, cid: CommonId, samples: &[S]) -> bool {
        match self.rows.get(&cid) {
            Some(row) => samples.iter().all(|s| row.contains_key(s.as_ref())),
            None => false,
        }
    }

    /// all common ids in increasing order
    pub fn ids(&self) -> impl Iterator<Item = CommonId> + '_ {
        self.rows.keys().copied()
    }

    /// common ids matched in every sample, in increasing order
    pub fn complete_ids<'a, S: AsRef<str>>(&'a self, samples: &'a [S]) -> impl Iterator<Item = CommonId> + 'a {
        self.ids().filter(move |cid| self.is_complete(*cid, samples))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
} // end of impl CommonTable
