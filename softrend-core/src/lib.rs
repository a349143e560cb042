/// Softrend Core Library - CPU rasterization pipeline
///
/// This library provides the full software rendering path: generic
/// vector and matrix math, the camera/projection/viewport transform
/// chain, pluggable vertex/fragment shaders, and a depth-buffered
/// triangle rasterizer, plus the OBJ loader and RGBA canvas that feed
/// and drain it.

pub mod canvas;
pub mod geometry;
pub mod matrix;
pub mod model;
pub mod raster;
pub mod shader;
pub mod transform;

// Re-export commonly used types
pub use canvas::{Canvas, CanvasError};
pub use image::Rgba;
pub use geometry::{Vec2f, Vec2i, Vec3f, Vec3i, Vec4f};
pub use matrix::Matrix;
pub use model::{Model, ModelError};
pub use raster::{render, triangle, DepthBuffer};
pub use shader::{CubeFrameShader, PhongShader, Shader};
pub use transform::{projection, viewport, Camera, Transforms};
