//! alignment of a query contig file against a reference contig file.
//!
//! The [Aligner] trait isolates the merge from the external program, [BlatAligner] runs blat
//! and decodes its psl output with [psl::read_psl_hits].

pub mod aligner;
pub mod psl;

pub use aligner::*;
pub use psl::*;
