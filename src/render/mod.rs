//! Drawing surfaces and the per-layer canvas renderer.

pub mod composite;
pub mod cpu;
pub mod recording;
pub mod renderer;
pub mod surface;

pub use cpu::{PixmapSurface, PixmapSurfaceFactory};
pub use recording::{DrawCommand, RecordingLog, RecordingSurface, RecordingSurfaceFactory};
pub use renderer::{CanvasRenderer, RendererSetup, RendererState};
pub use surface::{DrawSurface, FrameRGBA, NoSurfaceFactory, SurfaceFactory};
