//! The common contig table and the accumulation of passes.

pub mod accumulator;
pub mod table;

pub use accumulator::*;
pub use table::*;
