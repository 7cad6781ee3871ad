//! contains utils used to lay out files and parameters of a run

pub mod files;
pub mod parameters;

pub use files::*;
pub use parameters::*;
