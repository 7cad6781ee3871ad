//! contigmatch : detection of contigs common to a group of separately assembled samples.
//!
//! Each sample of a group has been assembled (velvet like assembler) into a contig fasta file
//! whose records are named NODE_nnn. The first sample is the target, the others are queries.
//! Each query is screened with blat against the current reference set of contigs, the first reference
//! being the target contigs and the next ones being the consolidated common contigs built by the previous pass.
//!
//! At the end we dump a table giving for each common contig the node number in every sample
//! and a fasta file with the longest sequence seen for each common contig.
//!
//! - [samples] : ordered sample list, target and queries
//! - [align] : blat invocation and psl parsing
//! - [merge] : the common table and the accumulator of passes
//! - [report] : final table and fasta
//! - [pipeline] : glue, one pass per query sample

pub mod errors;
pub mod utils;
pub mod contigs;
pub mod samples;
pub mod align;
pub mod merge;
pub mod report;
pub mod pipeline;

pub use errors::{ContigMatchError, Result};
