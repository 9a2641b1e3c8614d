//! Prescription-resolution and progression engine.
//!
//! Composes the `liftcycle_db` repositories with the pure rules in
//! `liftcycle_core`. Handlers stay thin and call into these modules.
//!
//! - [`max_cache`] -- per-request cache of current maxes.
//! - [`workout`] -- prescription, batch, and workout resolution.
//! - [`progression`] -- manual and event-driven progression application.
//! - [`enrollment`] -- enrollment lifecycle and advancement.
//! - [`session`] -- workout sessions, logged sets, variable-scheme next sets.

pub mod enrollment;
pub mod max_cache;
pub mod progression;
pub mod session;
pub mod workout;
