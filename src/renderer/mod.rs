//! Rendering module
//!
//! `scene` builds a backend-agnostic draw list from the render state;
//! `pipeline` draws it with a WebGPU sprite batcher.

pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use pipeline::GpuRenderer;
pub use scene::{DrawCommand, build};
