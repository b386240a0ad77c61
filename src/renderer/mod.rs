//! WebGPU rendering module
//!
//! Draws platforms and the player as flat-shaded boxes seen through a
//! narrow perspective camera.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{BoxRenderer, RenderError, view_proj};
