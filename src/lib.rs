//! Scene runtime for the CuriousLabs landing page.
//!
//! The crate sequences a scroll-driven intro (`Initial -> HeroIntro -> PlanetReveal ->
//! TextReveal -> Interactive`), probes device capability once, and drives decorative
//! canvas layers (starfield, grid, particle trails, comets) frame by frame.
//!
//! # Architecture
//!
//! 1. **Schedule**: every wait is a callback on a host [`Scheduler`]; nothing blocks.
//! 2. **Provide**: [`SceneProvider`] owns the [`PhaseController`], the capability record
//!    and the mounted [`CanvasRenderer`]s, and hands descendants a [`SceneContext`].
//! 3. **Render**: each renderer owns one [`DrawSurface`] and one [`Layer`], redrawing the
//!    whole surface each frame from elapsed time.
//! 4. **Broadcast**: subsystems talk through a typed [`EventBus`] rather than references.
//!
//! Everything runs on one thread. Handles are cancellable and owners cancel theirs on
//! teardown, so an unmounted scene never draws or fires again.
#![forbid(unsafe_code)]

pub mod animation;
pub mod bus;
pub mod capability;
pub mod choreo;
pub mod config;
pub mod foundation;
pub mod layers;
pub mod mission;
pub mod phase;
pub mod provider;
pub mod render;
pub mod schedule;

pub use animation::{
    ease::Ease,
    keyframes::{Keyframe, Keyframes},
};
pub use bus::{Channel, EventBus, Subscription, SubscriptionId};
pub use capability::{
    ArithmeticBenchmark, Benchmark, CapabilityProber, DeviceCapability, HostEnvironment,
    PerformanceTier, ProbeSettings, StaticEnvironment, WebglSupport,
};
pub use config::{LayerOptions, SceneConfig};
pub use foundation::{
    core::{Rgba8, Rng64, Viewport},
    error::{SceneError, SceneResult},
};
pub use layers::{Layer, LayerKind, LayerStyle};
pub use mission::{FileStore, KeyValueStore, MemoryStore, MissionTask, MissionTracker};
pub use phase::{Phase, PhaseController, PlaybackPhase, ScenePhase, ScrollGate, ScrollInput};
pub use provider::{LayerId, ProviderSettings, SceneContext, SceneProvider};
pub use render::{
    CanvasRenderer, DrawSurface, FrameRGBA, PixmapSurfaceFactory, RendererState,
    SurfaceFactory,
};
pub use schedule::{ManualScheduler, Scheduler};
