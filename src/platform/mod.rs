//! platform
//!
//! Abstraction for the remote package-management platform.
//!
//! # Architecture
//!
//! The `Platform` trait defines the interface the reconciler uses to probe
//! and mutate remote state. The engine never issues HTTP requests directly;
//! it only sees the trait, so tests substitute [`mock::MockPlatform`] for
//! the real [`rest::RestPlatform`].
//!
//! - Probes (`*_exists`) never mutate: 2xx means present, 404 means absent,
//!   anything else is an error
//! - Mutations map a remote conflict to [`PlatformError::Conflict`] so the
//!   engine can treat it as already-satisfied
//!
//! # Modules
//!
//! - `traits`: Core `Platform` trait, request types, and `PlatformError`
//! - [`rest`]: REST implementation backed by `reqwest`
//! - [`mock`]: Mock implementation for deterministic testing

pub mod mock;
pub mod rest;
mod traits;

pub use traits::*;
