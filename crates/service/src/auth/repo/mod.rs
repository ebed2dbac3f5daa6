//! Concrete `UserRepo` adapters.

pub mod json_file;
