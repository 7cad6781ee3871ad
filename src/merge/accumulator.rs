//! Accumulation of alignment passes into the common table and the consolidated sequences.
//!
//! The first pass aligns the first query on the target : each hit creates a new common id
//! whose target entry is the target node. Next passes align a query on the consolidated
//! sequences of the previous pass, whose node numbers are common ids, so hits just add the query entry.
//!
//! In a pass a query contig is used only once, by its first hit in alignment order.
//! For each hit used the consolidated sequence is the longer of query and reference contigs
//! (lengths as reported by the aligner, ties keep the reference).
//! After a pass the consolidated set contains only the common ids hit in this pass.

use std::collections::{BTreeMap, HashSet};

use crate::align::{AlignmentHit, Strand};
use crate::contigs::{reverse_complement, ContigSet};
use crate::errors::{ContigMatchError, Result};

use super::table::{CommonId, CommonTable};

/// what happened during a pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// pass number, starting at 1
    pub pass : usize,
    /// hits received
    pub nb_hits : usize,
    /// hits used to update the table
    pub nb_used : usize,
    /// hits discarded as their query contig was already used in the pass
    pub nb_duplicates : usize,
    /// hits with query gaps, ignored
    pub nb_gapped : usize,
    /// common ids created (first pass only)
    pub nb_new_ids : usize,
    /// size of consolidated set after the pass
    pub nb_sequences : usize,
}

/// State carried from pass to pass
#[derive(Debug, Clone)]
pub struct MergeAccumulator {
    /// target sample name
    target : String,
    table : CommonTable,
    /// consolidated sequences of last pass
    consolidated : BTreeMap<CommonId, Vec<u8>>,
    /// next common id to allocate
    next_id : u64,
    /// nb passes done
    nb_pass : usize,
    /// reverse complement query sequences kept from minus strand hits
    revcomp_minus : bool,
}

impl MergeAccumulator {
    pub fn new(target: &str, revcomp_minus: bool) -> Self {
        MergeAccumulator {
            target: target.to_string(),
            table: CommonTable::new(),
            consolidated: BTreeMap::new(),
            next_id: 1,
            nb_pass: 0,
            revcomp_minus,
        }
    }

    pub fn get_target(&self) -> &str {
        &self.target
    }

    pub fn get_table(&self) -> &CommonTable {
        &self.table
    }

    pub fn get_nb_pass(&self) -> usize {
        self.nb_pass
    }

    /// consolidated sequence of a common id, as left by the last pass
    pub fn get_sequence(&self, cid: CommonId) -> Option<&[u8]> {
        self.consolidated.get(&cid).map(|s| s.as_slice())
    }

    /// consolidated sequences, by increasing common id
    pub fn consolidated(&self) -> impl Iterator<Item = (CommonId, &[u8])> + '_ {
        self.consolidated.iter().map(|(cid, seq)| (*cid, seq.as_slice()))
    }

    fn mint_id(&mut self) -> CommonId {
        let cid = CommonId::new(self.next_id);
        self.next_id += 1;
        cid
    }

    /// Merges the hits of query_sample against the current reference.
    /// reference holds the target contigs on first pass, the consolidated contigs of previous pass after.
    pub fn merge_pass(
        &mut self,
        query_sample: &str,
        hits: &[AlignmentHit],
        reference: &ContigSet,
        query: &ContigSet,
    ) -> Result<PassSummary> {
        let first_pass = self.nb_pass == 0;
        let pass = self.nb_pass + 1;
        let mut summary = PassSummary {
            pass,
            nb_hits: hits.len(),
            ..Default::default()
        };
        log::debug!(
            "merge_pass {}, query : {}, nb hits : {}, first pass : {}",
            pass,
            query_sample,
            hits.len(),
            first_pass
        );
        //
        let mut used_queries = HashSet::<u64>::new();
        let mut new_consolidated = BTreeMap::<CommonId, Vec<u8>>::new();
        //
        for hit in hits {
            if !hit.is_gapless() {
                summary.nb_gapped += 1;
                continue;
            }
            if !used_queries.insert(hit.query_node) {
                log::trace!("query node {} already used in pass {}", hit.query_node, pass);
                summary.nb_duplicates += 1;
                continue;
            }
            let cid = if first_pass {
                let cid = self.mint_id();
                self.table.set(cid, &self.target, hit.target_node);
                summary.nb_new_ids += 1;
                cid
            } else {
                let cid = CommonId::new(hit.target_node);
                if !self.table.contains(cid) {
                    return Err(ContigMatchError::UnknownCommonId {
                        pass,
                        node: hit.target_node,
                    });
                }
                cid
            };
            self.table.set(cid, query_sample, hit.query_node);
            //
            let seq = if hit.query_len > hit.target_len {
                let qseq = query.get(hit.query_node).ok_or_else(|| ContigMatchError::MissingContig {
                    sample: query_sample.to_string(),
                    node: hit.query_node,
                })?;
                if self.revcomp_minus && hit.strand == Strand::Reverse {
                    reverse_complement(qseq)
                } else {
                    qseq.to_vec()
                }
            } else {
                // after first pass the reference is the consolidated file, we name it by its path
                let label = if first_pass {
                    self.target.clone()
                } else {
                    reference.get_path().display().to_string()
                };
                reference
                    .get(hit.target_node)
                    .ok_or(ContigMatchError::MissingContig {
                        sample: label,
                        node: hit.target_node,
                    })?
                    .to_vec()
            };
            new_consolidated.insert(cid, seq);
            summary.nb_used += 1;
        } // end of for on hits
        //
        let nb_dropped = self
            .consolidated
            .keys()
            .filter(|cid| !new_consolidated.contains_key(*cid))
            .count();
        if nb_dropped > 0 {
            log::info!("pass {} : {} common contigs not hit by {} leave consolidated set", pass, nb_dropped, query_sample);
        }
        self.consolidated = new_consolidated;
        self.nb_pass = pass;
        summary.nb_sequences = self.consolidated.len();
        //
        Ok(summary)
    } // end of merge_pass
} // end of impl MergeAccumulator
