//! Shared types for the lead tracking system
//!
//! Contains the lead data model exchanged between the lead sources, the
//! tracking engine and the presentation layer, plus the logging setup every
//! binary in the workspace uses.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
