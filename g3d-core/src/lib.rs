//! g3d core library: a real-time software 3D transform pipeline.
//!
//! Takes triangle meshes in object space and, once per frame, applies the
//! world, culling, view, projection, perspective-divide, screen-centering,
//! and shading stages, emitting colored screen-space triangles ready for a
//! rasterizer. Rasterization, windowing, and input handling belong to the
//! host; see the `g3d-terminal` crate for one such host.

pub mod engine;
pub mod geometry;
pub mod obj;
pub mod pipeline;
pub mod registry;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use engine::{Engine, Fov, RenderOptions};
pub use geometry::{ScreenTriangle, Shape, Triangle};
pub use obj::LoadError;
pub use pipeline::{CameraSnapshot, Pipeline, PipelineError, Stage};
pub use registry::ShapeRegistry;
pub use vector::Vector;
