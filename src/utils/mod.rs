//! Utility modules shared by the pipeline phases.

pub mod date;
pub mod fs;
