//! contig fasta files : node numbering, reading, writing and flattening

pub mod contigfiles;
pub mod nucleotides;

pub use contigfiles::*;
pub use nucleotides::*;
