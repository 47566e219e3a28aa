//! core
//!
//! Core domain types, schemas, and policy for Quartermaster.
//!
//! # Modules
//!
//! - [`types`] - Desired-state model: ProjectSpec, PackageTypeSpec, ApplicationSpec
//! - [`naming`] - Deterministic repository naming
//! - [`policy`] - Package-type policy: canonical type, layout, structural variant
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - The desired-state model is constructed once from configuration and is
//!   read-only during reconciliation
//! - Naming is pure and case-normalizing; re-runs resolve to the same
//!   remote resources regardless of input casing
//! - The policy table is the single source of truth for which repositories
//!   exist for a given package type

pub mod config;
pub mod naming;
pub mod policy;
pub mod types;
