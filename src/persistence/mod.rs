//! Persisted player data
//!
//! The profile survives across runs through a [`KeyValueStore`]. Storage
//! failures never reach the engine: loads fall back to defaults and saves
//! log a warning.
//!
//! [`KeyValueStore`]: crate::platform::KeyValueStore

pub mod profile;

pub use profile::{PROFILE_VERSION, Profile};
