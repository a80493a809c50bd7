//! WebGPU rendering module
//!
//! The pond is painted on the CPU into a pixel-space triangle list
//! (`scene` via `paint`), then uploaded and drawn in one pass (`pipeline`).

pub mod paint;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use paint::{Fill, Gradient, Painter};
pub use pipeline::RenderState;
pub use scene::{Frame, PaintOptions, paint_frame};
pub use vertex::{Color, Vertex};
