//! ui
//!
//! Output utilities for Quartermaster.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware console output

pub mod output;
