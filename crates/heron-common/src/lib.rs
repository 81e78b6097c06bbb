//! Shared infrastructure for the heron crates.
//!
//! - **Warning log** - deduplicated diagnostics routed through the `log` facade
//! - **Positions** - line/column locations in parser input

pub mod position;
pub mod warning;

pub use position::Position;
pub use warning::{clear_warnings, warn_once};
