//! Decoded statement results.
//!
//! - `row`: column descriptors and the name-addressable [`Row`]
//! - `result_set`: the per-statement [`ResultSet`] summary

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::{Column, Row};
