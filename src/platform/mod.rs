//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input device detection and event names

pub mod input;

pub use input::InputScheme;
