//! errors returned by the library. Every error aborts a run, as each pass depends on the output of the previous one.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ContigMatchError {
    /// an input file (contig fasta, alignment output, config) does not exist
    #[error("input file not found : {0:?}")]
    MissingInput(PathBuf),
    /// any read/write failure
    #[error("i/o error on {path:?} : {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// fasta file could not be parsed by needletail
    #[error("fasta parse error in {path:?} : {msg}")]
    FastaParse { path: PathBuf, msg: String },
    /// fasta header without a NODE_nnn node number
    #[error("fasta header without node number in {path:?} : {header}")]
    BadHeader { path: PathBuf, header: String },
    /// aligner executable could not be launched
    #[error("could not launch aligner {command} : {source}")]
    AlignerSpawn {
        command: String,
        source: std::io::Error,
    },
    /// aligner exited with a failure status
    #[error("aligner {command} failed, {status}")]
    AlignerFailed { command: String, status: String },
    /// a row of alignment output could not be decoded
    #[error("malformed alignment row at line {line} of {path:?} : {reason}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("at least 2 samples are necessary (one target, one query), got {0}")]
    TooFewSamples(usize),
    #[error("sample {0} appears more than once")]
    DuplicateSample(String),
    /// a reference node of a consolidated pass is not a known common id
    #[error("pass {pass} : reference node {node} is not a known common contig id")]
    UnknownCommonId { pass: usize, node: u64 },
    /// a hit refers to a contig absent from the loaded fasta
    #[error("contig NODE_{node} not found in sequences of {sample}")]
    MissingContig { sample: String, node: u64 },
    #[error("table write error on {path:?} : {source}")]
    Table { path: PathBuf, source: csv::Error },
    #[error("configuration error : {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ContigMatchError>;

impl ContigMatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContigMatchError::Io {
            path: path.into(),
            source,
        }
    }
} // end of impl ContigMatchError
