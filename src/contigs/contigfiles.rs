//! Contig fasta files produced by the assembler are records named NODE_nnn_length_lll_cov_ccc.
//! We identify a contig by its node number. Consolidated files written between passes
//! use NODE_cccccc where cccccc is the zero padded common contig id, so the same parsing applies.
//!
//! Parsing is done with needletail, so multi line records and gzipped files are accepted.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use needletail::errors::{ParseError, ParseErrorKind};
use needletail::parser::{write_fasta, FastxReader, LineEnding};

use crate::errors::{ContigMatchError, Result};
use crate::utils::files::write_atomically;

/// prefix preceding the node number in contig names
pub const NODE_PREFIX: &str = "NODE_";

// the digits opening rest, as a node number
fn leading_node_number(rest: &str) -> Option<u64> {
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// extracts the node number following the first NODE_ in a contig name, wherever it is.
/// Used for aligner output names. NODE_12_length_300_cov_8.5 gives 12, NODE_000012 gives 12.
pub fn parse_node_id(name: &str) -> Option<u64> {
    let start = name.find(NODE_PREFIX)? + NODE_PREFIX.len();
    leading_node_number(&name[start..])
} // end of parse_node_id

/// node number of a fasta header, which must begin with NODE_
pub fn parse_header_node_id(header: &str) -> Option<u64> {
    leading_node_number(header.strip_prefix(NODE_PREFIX)?)
}

fn to_parse_error(path: &Path, e: ParseError) -> ContigMatchError {
    ContigMatchError::FastaParse {
        path: path.to_path_buf(),
        msg: e.to_string(),
    }
}

/// Sequences of a contig file indexed by node number
#[derive(Clone, Debug, Default)]
pub struct ContigSet {
    /// file the sequences come from
    path: PathBuf,
    seqs: HashMap<u64, Vec<u8>>,
}

impl ContigSet {
    pub fn new(path: &Path) -> Self {
        ContigSet {
            path: path.to_path_buf(),
            seqs: HashMap::new(),
        }
    }

    /// inserts a sequence, returns true if node was already present (the new sequence replaces the old one)
    pub fn insert(&mut self, node: u64, seq: Vec<u8>) -> bool {
        self.seqs.insert(node, seq).is_some()
    }

    pub fn get(&self, node: u64) -> Option<&[u8]> {
        self.seqs.get(&node).map(|s| s.as_slice())
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    /// loads all records of a contig fasta file. An empty file gives an empty set.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ContigMatchError::MissingInput(path.to_path_buf()));
        }
        log::debug!("loading contigs from {:?}", path);
        match needletail::parse_fastx_file(path) {
            Ok(reader) => Self::from_fastx(path, reader),
            Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => {
                log::warn!("contig file {:?} is empty", path);
                Ok(ContigSet::new(path))
            }
            Err(e) => Err(to_parse_error(path, e)),
        }
    } // end of from_file

    /// loads records from any reader, path is used for error reporting only
    pub fn from_reader<R>(path: &Path, input: R) -> Result<Self>
    where
        R: std::io::Read + Send,
    {
        match needletail::parse_fastx_reader(input) {
            Ok(reader) => Self::from_fastx(path, reader),
            Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => Ok(ContigSet::new(path)),
            Err(e) => Err(to_parse_error(path, e)),
        }
    }

    fn from_fastx(path: &Path, mut reader: Box<dyn FastxReader + '_>) -> Result<Self> {
        let mut contigs = ContigSet::new(path);
        let mut nb_record = 0;
        while let Some(record) = reader.next() {
            let seqrec = record.map_err(|e| to_parse_error(path, e))?;
            nb_record += 1;
            let header = String::from_utf8_lossy(seqrec.id()).to_string();
            let node = parse_header_node_id(&header).ok_or_else(|| ContigMatchError::BadHeader {
                path: path.to_path_buf(),
                header: header.clone(),
            })?;
            if contigs.insert(node, seqrec.seq().into_owned()) {
                log::warn!("node {} appears twice in {:?}, keeping last record", node, path);
            }
        }
        log::debug!("file {:?}, nb record : {}, nb contigs : {}", path, nb_record, contigs.len());
        Ok(contigs)
    } // end of from_fastx
} // end of impl ContigSet

/// (re)writes a fasta file, one line of sequence per record.
/// The file is written through a temporary file and renamed at the end.
pub fn write_fasta_records<'a, I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = (String, &'a [u8])>,
{
    let mut nb_written = 0;
    write_atomically(path, |out| {
        for (header, seq) in records {
            write_fasta(header.as_bytes(), seq, out, LineEnding::Unix)
                .map_err(|e| to_parse_error(path, e))?;
            nb_written += 1;
        }
        Ok(())
    })?;
    log::debug!("wrote {} records in {:?}", nb_written, path);
    Ok(nb_written)
} // end of write_fasta_records

//=====================================================================================

/// counts of a flattening
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlattenSummary {
    pub nb_read: usize,
    pub nb_written: usize,
    /// records shorter than minimum size
    pub nb_filtered: usize,
}

/// Rewrites each record of a fasta file with its sequence on one line, dropping
/// sequences shorter than min_size. Headers are kept untouched.
pub fn flatten_fasta(input: &Path, out: &mut dyn Write, min_size: usize) -> Result<FlattenSummary> {
    if !input.exists() {
        return Err(ContigMatchError::MissingInput(input.to_path_buf()));
    }
    let mut summary = FlattenSummary::default();
    let mut reader = match needletail::parse_fastx_file(input) {
        Ok(reader) => reader,
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => return Ok(summary),
        Err(e) => return Err(to_parse_error(input, e)),
    };
    while let Some(record) = reader.next() {
        let seqrec = record.map_err(|e| to_parse_error(input, e))?;
        summary.nb_read += 1;
        let seq = seqrec.seq();
        if seq.len() < min_size {
            log::trace!("dropping {}, length {}", String::from_utf8_lossy(seqrec.id()), seq.len());
            summary.nb_filtered += 1;
            continue;
        }
        write_fasta(seqrec.id(), &seq, out, LineEnding::Unix).map_err(|e| to_parse_error(input, e))?;
        summary.nb_written += 1;
    }
    out.flush().map_err(|e| ContigMatchError::io(input, e))?;
    Ok(summary)
} // end of flatten_fasta
