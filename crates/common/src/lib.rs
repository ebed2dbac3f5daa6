//! Ambient helpers shared by the workspace binaries and crates.

pub mod utils;
