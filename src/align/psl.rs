//! Decoding of psl files as written by blat.
//!
//! A psl file begins with a 5 lines header, then one tab separated record per alignment.
//! Columns used (0-based) :
//! - 4  : qNumInsert, number of gaps in query
//! - 8  : strand
//! - 9, 10 : query name and size
//! - 13, 14 : target name and size
//!
//! Only gapless (on query side) alignments are kept.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::contigs::parse_node_id;
use crate::errors::{ContigMatchError, Result};

/// number of header lines of a psl file
pub const PSL_HEADER_LINES: usize = 5;

/// minimum number of columns we need in a record
pub const PSL_MIN_COLUMNS: usize = 15;

const COL_QUERY_GAPS: usize = 4;
const COL_STRAND: usize = 8;
const COL_QUERY_NAME: usize = 9;
const COL_QUERY_SIZE: usize = 10;
const COL_TARGET_NAME: usize = 13;
const COL_TARGET_SIZE: usize = 14;

/// The direction of the alignment of the query on target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

impl Strand {
    /// decodes psl strand field. For translated alignments (2 characters) the first one is the query strand.
    fn from_field(field: &str) -> Option<Self> {
        match field.chars().next() {
            Some('+') => Some(Strand::Forward),
            Some('-') => Some(Strand::Reverse),
            _ => None,
        }
    }
} // end of impl Strand

/// What we keep of a psl record.
/// Lengths are the contig sizes as reported by the aligner, not alignment lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentHit {
    /// node number of query contig
    pub query_node: u64,
    /// query contig size
    pub query_len: usize,
    /// node number of target contig (a common contig id after first pass)
    pub target_node: u64,
    /// target contig size
    pub target_len: usize,
    pub strand: Strand,
    /// number of gaps in query
    pub query_gaps: u64,
}

impl AlignmentHit {
    pub fn new(query_node: u64, query_len: usize, target_node: u64, target_len: usize, strand: Strand) -> Self {
        AlignmentHit {
            query_node,
            query_len,
            target_node,
            target_len,
            strand,
            query_gaps: 0,
        }
    }

    pub fn is_gapless(&self) -> bool {
        self.query_gaps == 0
    }

    /// decodes the tab splitted fields of a record
    fn from_splits(splits: &[&str]) -> std::result::Result<Self, String> {
        if splits.len() < PSL_MIN_COLUMNS {
            return Err(format!(
                "expected at least {} columns, got {}",
                PSL_MIN_COLUMNS,
                splits.len()
            ));
        }
        let number = |col: usize| -> std::result::Result<u64, String> {
            splits[col]
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("column {} is not a number : {:?}", col, splits[col]))
        };
        let node = |col: usize| -> std::result::Result<u64, String> {
            parse_node_id(splits[col])
                .ok_or_else(|| format!("column {} has no node number : {:?}", col, splits[col]))
        };
        let query_gaps = number(COL_QUERY_GAPS)?;
        let strand = Strand::from_field(splits[COL_STRAND])
            .ok_or_else(|| format!("unknown strand {:?}", splits[COL_STRAND]))?;
        Ok(AlignmentHit {
            query_node: node(COL_QUERY_NAME)?,
            query_len: number(COL_QUERY_SIZE)? as usize,
            target_node: node(COL_TARGET_NAME)?,
            target_len: number(COL_TARGET_SIZE)? as usize,
            strand,
            query_gaps,
        })
    } // end of from_splits
} // end of impl AlignmentHit

/// Decodes psl records from a reader, skipping the header.
/// path is used for error messages. Only gapless hits are returned, in file order.
pub fn parse_psl<R: BufRead>(path: &Path, reader: R) -> Result<Vec<AlignmentHit>> {
    let mut hits = Vec::<AlignmentHit>::new();
    let mut nb_gapped = 0;
    //
    for (num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ContigMatchError::io(path, e))?;
        if num < PSL_HEADER_LINES || line.trim().is_empty() {
            continue;
        }
        let splits: Vec<&str> = line.split('\t').collect();
        let hit = AlignmentHit::from_splits(&splits).map_err(|reason| ContigMatchError::MalformedRow {
            path: path.to_path_buf(),
            line: num + 1,
            reason,
        })?;
        if hit.is_gapless() {
            hits.push(hit);
        } else {
            nb_gapped += 1;
        }
    }
    log::debug!(
        "psl file {:?}, nb gapless hits : {}, nb gapped discarded : {}",
        path,
        hits.len(),
        nb_gapped
    );
    Ok(hits)
} // end of parse_psl

/// opens and decodes a psl file
pub fn read_psl_hits(path: &Path) -> Result<Vec<AlignmentHit>> {
    if !path.exists() {
        return Err(ContigMatchError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| ContigMatchError::io(path, e))?;
    parse_psl(path, BufReader::new(file))
} // end of read_psl_hits

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contigs::ContigSet;
    use crate::merge::{CommonId, MergeAccumulator};

    const HEADER: &str = "psLayout version 3\n\nmatch\tmis-\trep.\tN's\tQ gap\tQ gap\tT gap\tT gap\tstrand\tQ\tQ\tQ\tQ\tT\tT\tT\tT\tblock\tblockSizes\tqStarts\ttStarts\n     \tmatch\tmatch\t   \tcount\tbases\tcount\tbases\t      \tname\tsize\tstart\tend\tname\tsize\tstart\tend\tcount\n---------------------------------------------------------------------------------------------------------------------------------------------------------------\n";

    fn row(qname: &str, qsize: usize, tname: &str, tsize: usize, strand: &str, qgaps: u64) -> String {
        format!(
            "{m}\t0\t0\t0\t{g}\t0\t0\t0\t{s}\t{qn}\t{qs}\t0\t{m}\t{tn}\t{ts}\t0\t{m}\t1\t{m},\t0,\t0,\n",
            m = qsize.min(tsize),
            g = qgaps,
            s = strand,
            qn = qname,
            qs = qsize,
            tn = tname,
            ts = tsize
        )
    }

    #[test]
    fn header_skipped_gapped_filtered() {
        let mut text = String::from(HEADER);
        text.push_str(&row("NODE_5_length_120_cov_3.0", 120, "NODE_1_length_100_cov_2.0", 100, "+", 0));
        text.push_str(&row("NODE_6_length_80_cov_3.0", 80, "NODE_2_length_90_cov_2.0", 90, "-", 2));
        text.push_str(&row("NODE_7_length_70_cov_3.0", 70, "NODE_2_length_90_cov_2.0", 90, "-", 0));
        let hits = parse_psl(Path::new("mem.psl"), text.as_bytes()).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], AlignmentHit::new(5, 120, 1, 100, Strand::Forward));
        assert_eq!(hits[1].query_node, 7);
        assert_eq!(hits[1].strand, Strand::Reverse);
    }

    // same psl, same hits, and merging them from scratch gives the same consolidated state
    #[test]
    fn reparsing_is_stable() {
        let mut text = String::from(HEADER);
        text.push_str(&row("NODE_5", 120, "NODE_1", 100, "+", 0));
        text.push_str(&row("NODE_5", 120, "NODE_2", 100, "+", 0));
        text.push_str(&row("NODE_6", 80, "NODE_2", 100, "-", 0));
        let first = parse_psl(Path::new("mem.psl"), text.as_bytes()).unwrap();
        let second = parse_psl(Path::new("mem.psl"), text.as_bytes()).unwrap();
        assert_eq!(first, second);
        //
        let mut target = ContigSet::new(Path::new("A"));
        target.insert(1, vec![b'A'; 100]);
        target.insert(2, vec![b'C'; 100]);
        let mut query = ContigSet::new(Path::new("B"));
        query.insert(5, vec![b'G'; 120]);
        query.insert(6, vec![b'T'; 80]);
        let merge = |hits: &[AlignmentHit]| {
            let mut acc = MergeAccumulator::new("A", false);
            let summary = acc.merge_pass("B", hits, &target, &query).unwrap();
            let state: Vec<(CommonId, Option<u64>, Option<u64>, Vec<u8>)> = acc
                .consolidated()
                .map(|(cid, seq)| (cid, acc.get_table().get(cid, "A"), acc.get_table().get(cid, "B"), seq.to_vec()))
                .collect();
            (summary, state)
        };
        let (summary_1, state_1) = merge(first.as_slice());
        let (summary_2, state_2) = merge(second.as_slice());
        assert_eq!(summary_1, summary_2);
        assert_eq!(state_1, state_2);
        assert_eq!(state_1.len(), 2);
        assert_eq!(summary_1.nb_duplicates, 1);
    }

    #[test]
    fn short_row_is_malformed() {
        let mut text = String::from(HEADER);
        text.push_str("100\t0\t0\t0\t0\t0\t0\t0\t+\tNODE_1\n");
        match parse_psl(Path::new("mem.psl"), text.as_bytes()) {
            Err(ContigMatchError::MalformedRow { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_size_is_malformed() {
        let mut text = String::from(HEADER);
        text.push_str(&row("NODE_5", 120, "NODE_1", 100, "+", 0).replace("\t120\t", "\tabc\t"));
        let res = parse_psl(Path::new("mem.psl"), text.as_bytes());
        assert!(matches!(res, Err(ContigMatchError::MalformedRow { .. })));
    }

    #[test]
    fn header_only_or_truncated() {
        let hits = parse_psl(Path::new("mem.psl"), HEADER.as_bytes()).unwrap();
        assert!(hits.is_empty());
        let hits = parse_psl(Path::new("mem.psl"), "psLayout version 3\n".as_bytes()).unwrap();
        assert!(hits.is_empty());
    }
}
