//! Flavor access registry.
//!
//! Tracks, per flavor, whether it is public and which tenants hold explicit
//! grants, and decides whether a tenant may use a flavor.
//!
//! # Module Organization
//!
//! * [`core`] - Registry struct, per-flavor locking, storage call plumbing
//! * [`config`] - [`RegistryConfig`] and [`RegistryBuilder`]
//! * [`operations`] - Flavor directory, grant mutation, listing and eligibility
//! * `tests` - Unit tests with a fault-injecting storage double

pub mod config;
pub mod core;
pub mod operations;


pub use config::{DEFAULT_STORAGE_TIMEOUT, RegistryBuilder, RegistryConfig};
pub use core::FlavorAccessRegistry;
