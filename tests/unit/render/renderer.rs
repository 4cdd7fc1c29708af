use super::*;
use crate::{
    capability::PerformanceTier,
    foundation::error::SceneError,
    render::{NoSurfaceFactory, RecordingSurfaceFactory},
    schedule::ManualScheduler,
};

struct Harness {
    sched: Rc<ManualScheduler>,
    factory: RecordingSurfaceFactory,
    bus: Rc<EventBus>,
}

impl Harness {
    fn new() -> Self {
        Self {
            sched: Rc::new(ManualScheduler::new()),
            factory: RecordingSurfaceFactory::new(),
            bus: Rc::new(EventBus::new()),
        }
    }

    fn setup(&self, style: LayerStyle) -> RendererSetup<'_> {
        RendererSetup {
            factory: &self.factory,
            scheduler: self.sched.clone(),
            bus: Some(Rc::clone(&self.bus)),
            viewport: Viewport::new(640.0, 360.0, 1.0),
            style,
            seed: 7,
        }
    }
}

/// Layer whose update fails from the given frame on.
struct Flaky {
    fail_from: u64,
    updates: u64,
}

impl Layer for Flaky {
    fn kind(&self) -> LayerKind {
        LayerKind::Starfield
    }

    fn reseed(&mut self, _: &Viewport, _: &LayerStyle, _: &mut Rng64) {}

    fn update(&mut self, _: FrameTime, _: &LayerStyle) -> SceneResult<()> {
        self.updates += 1;
        if self.updates >= self.fail_from {
            return Err(SceneError::render("boom"));
        }
        Ok(())
    }

    fn draw(&self, _: &mut dyn DrawSurface, _: &LayerStyle) -> SceneResult<()> {
        Ok(())
    }

    fn entity_count(&self) -> usize {
        0
    }
}

#[test]
fn runs_one_frame_request_at_a_time() {
    let h = Harness::new();
    let r = CanvasRenderer::mount_kind(LayerKind::Starfield, h.setup(LayerStyle::default()));
    assert_eq!(r.state(), RendererState::Running);
    assert_eq!(h.sched.pending_frames(), 1);

    h.sched.run_frames(5, 16.0);
    assert_eq!(r.frames_drawn(), 5);
    assert_eq!(h.sched.pending_frames(), 1);
    assert_eq!(h.factory.log().borrow().presents, 5);
}

#[test]
fn unmount_cancels_frames_and_stops_drawing() {
    let h = Harness::new();
    let mut r = CanvasRenderer::mount_kind(LayerKind::Starfield, h.setup(LayerStyle::default()));
    h.sched.run_frames(3, 16.0);
    r.unmount();
    assert_eq!(r.state(), RendererState::TornDown);
    assert_eq!(h.sched.pending_frames(), 0);
    assert_eq!(h.bus.total_subscribers(), 0);

    let draws = h.factory.log().borrow().draw_calls;
    h.sched.run_frames(10, 16.0);
    assert_eq!(h.factory.log().borrow().draw_calls, draws);

    r.unmount();
    assert_eq!(r.state(), RendererState::TornDown);
}

#[test]
fn dropping_the_renderer_tears_it_down() {
    let h = Harness::new();
    {
        let _r =
            CanvasRenderer::mount_kind(LayerKind::ParticleTrail, h.setup(LayerStyle::default()));
        assert_eq!(h.bus.total_subscribers(), 2);
    }
    assert_eq!(h.sched.pending_frames(), 0);
    assert_eq!(h.bus.total_subscribers(), 0);
    assert_eq!(h.sched.run_frame(16.0), 0);
}

#[test]
fn resize_keeps_a_single_request_and_rederives_dims() {
    let h = Harness::new();
    let r = CanvasRenderer::mount_kind(LayerKind::Starfield, h.setup(LayerStyle::default()));
    let before = r.entity_count();

    h.bus.publish(VIEWPORT_RESIZE, &Viewport::new(1920.0, 1080.0, 3.0));
    h.bus.publish(VIEWPORT_RESIZE, &Viewport::new(1920.0, 1080.0, 3.0));
    assert_eq!(h.sched.pending_frames(), 1);
    assert_eq!(r.surface_dims(), Some((3840, 2160)));
    assert_eq!(r.entity_count(), 345);
    assert!(r.entity_count() > before);
    assert_eq!(h.factory.log().borrow().pixel_ratio, 2.0);

    h.sched.run_frame(16.0);
    assert_eq!(r.frames_drawn(), 1);
}

#[test]
fn reduced_motion_paints_once_without_a_loop() {
    let h = Harness::new();
    let style = LayerStyle {
        reduced_motion: true,
        ..LayerStyle::default()
    };
    let r = CanvasRenderer::mount_kind(LayerKind::Grid, h.setup(style));
    assert_eq!(r.state(), RendererState::Static);
    assert_eq!(r.frames_drawn(), 1);
    assert_eq!(h.sched.pending_frames(), 0);

    r.resize(Viewport::new(800.0, 600.0, 1.0));
    assert_eq!(r.frames_drawn(), 2);
    assert_eq!(h.sched.pending_frames(), 0);
}

#[test]
fn missing_context_yields_placeholder() {
    let sched = Rc::new(ManualScheduler::new());
    let bus = Rc::new(EventBus::new());
    let r = CanvasRenderer::mount_kind(
        LayerKind::Starfield,
        RendererSetup {
            factory: &NoSurfaceFactory,
            scheduler: sched.clone(),
            bus: Some(Rc::clone(&bus)),
            viewport: Viewport::new(640.0, 360.0, 1.0),
            style: LayerStyle::default(),
            seed: 1,
        },
    );
    assert!(r.is_placeholder());
    assert_eq!(sched.pending_frames(), 0);
    assert_eq!(bus.total_subscribers(), 0);
    assert_eq!(r.surface_dims(), None);
}

#[test]
fn low_tier_throttles_drawing() {
    let h = Harness::new();
    let style = LayerStyle {
        performance_tier: PerformanceTier::Low,
        ..LayerStyle::default()
    };
    let r = CanvasRenderer::mount_kind(LayerKind::Starfield, h.setup(style));
    h.sched.run_frames(30, 10.0);
    // 30 host frames at 100 Hz, drawn at most every 33.3 ms.
    assert!(r.frames_drawn() <= 10, "{}", r.frames_drawn());
    assert!(r.frames_drawn() >= 7, "{}", r.frames_drawn());
    assert_eq!(h.sched.pending_frames(), 1);
}

#[test]
fn hidden_renderer_pauses_and_resumes() {
    let h = Harness::new();
    let r = CanvasRenderer::mount_kind(LayerKind::Comet, h.setup(LayerStyle::default()));
    h.sched.run_frames(2, 16.0);
    r.set_visible(false);
    assert_eq!(r.state(), RendererState::Paused);
    assert_eq!(h.sched.pending_frames(), 0);
    h.sched.run_frames(5, 16.0);
    assert_eq!(r.frames_drawn(), 2);

    r.set_visible(true);
    r.set_visible(true);
    assert_eq!(h.sched.pending_frames(), 1);
    h.sched.run_frame(16.0);
    assert_eq!(r.frames_drawn(), 3);
}

#[test]
fn frame_error_stops_the_loop() {
    let h = Harness::new();
    let layer = Box::new(Flaky {
        fail_from: 3,
        updates: 0,
    });
    let r = CanvasRenderer::mount(layer, h.setup(LayerStyle::default()));
    h.sched.run_frames(10, 16.0);
    assert_eq!(r.state(), RendererState::Failed);
    assert_eq!(r.frames_drawn(), 2);
    assert_eq!(h.sched.pending_frames(), 0);
}
