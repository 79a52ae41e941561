mod buffers;
mod context;
mod render;

pub use buffers::SceneBuffers;
pub use context::GpuContext;
pub use render::{draw_scene, ChartPipeline, ParticlePipeline, Viewport};
