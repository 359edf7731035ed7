//! Configuration management for Scout.
//!
//! Provides XDG-compliant settings lookup.

mod settings;

pub use settings::{AppSettings, Paths};
