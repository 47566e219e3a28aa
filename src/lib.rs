//! Quartermaster - A CLI for provisioning package-platform resources
//!
//! Quartermaster converges a remote package-management platform toward a
//! declarative description of projects: lifecycle stages, the project itself,
//! its package repositories (local/remote/virtual), and its applications.
//! `qm apply` provisions, `qm destroy` tears down; both are idempotent and
//! safe to re-run.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - The reconciler: dependency-ordered create-or-skip and
//!   delete-or-skip against the remote platform
//! - [`core`] - Domain types, configuration schema, naming, package-type policy
//! - [`platform`] - Abstraction for the remote platform API (REST v1)
//! - [`ui`] - Output formatting utilities
//!
//! # Correctness Invariants
//!
//! Quartermaster maintains the following invariants:
//!
//! 1. Every mutation is preceded by an existence probe; already-satisfied
//!    state is a success, never an error
//! 2. A project is confirmed to exist before any repository or application
//!    referencing it is created
//! 3. Repository names are deterministic and case-normalized, so re-runs
//!    always resolve to the same remote resource
//! 4. Teardown never deletes lifecycle stages (stages are shared/global)

pub mod cli;
pub mod core;
pub mod engine;
pub mod platform;
pub mod ui;
