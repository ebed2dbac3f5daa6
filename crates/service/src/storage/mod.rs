//! Storage helpers for the service layer
//!
//! File-backed stores used where a database would be overkill.

pub mod json_map_store;
