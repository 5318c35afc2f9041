//! Shared utilities.

pub mod date;
pub mod path;
pub mod xml;
