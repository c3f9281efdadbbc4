//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, pointer, touch) folded into per-frame intents
//! - Focus loss releasing held input

pub mod input;

pub use input::{InputAdapter, KeyAction, classify_key};
