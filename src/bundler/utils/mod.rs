//! Shared filesystem and process helpers.

pub mod fs;
pub mod process;
