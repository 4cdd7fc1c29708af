use super::*;
use crate::{
    bus::channels::{PHASE_CHANGED, PhaseChange},
    capability::{PerformanceTier, ProbeSettings, StaticEnvironment, WebglSupport},
    foundation::error::SceneError,
    layers::LayerKind,
    phase::{Phase, ScrollInput, ScrollOutcome},
    render::{RecordingSurfaceFactory, RendererState},
    schedule::ManualScheduler,
};

struct InstantBench;

impl Benchmark for InstantBench {
    fn run(&self, _: u32) -> SceneResult<f64> {
        Ok(1.0)
    }
}

struct BrokenBench;

impl Benchmark for BrokenBench {
    fn run(&self, _: u32) -> SceneResult<f64> {
        Err(SceneError::capability("timer unavailable"))
    }
}

fn desktop(sched: &Rc<ManualScheduler>) -> SceneProvider {
    let env = StaticEnvironment::desktop();
    SceneProvider::mount(ProviderSettings {
        scheduler: sched.clone(),
        viewport: Viewport::new(1920.0, 1080.0, 1.0),
        environment: &env,
        benchmark: &InstantBench,
        prober: CapabilityProber::new(ProbeSettings::default()),
        gate: ScrollGate::default(),
        seed: 3,
    })
}

fn forward() -> ScrollInput {
    ScrollInput {
        delta_y: 40.0,
        scroll_y: 400.0,
    }
}

#[test]
fn mount_probes_once_and_exposes_the_context() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let ctx = provider.context();
    let cap = ctx.device_capabilities();
    assert_eq!(cap.performance_tier, PerformanceTier::High);
    assert_eq!(cap.webgl_support_tier, WebglSupport::WebGl2);
    assert_eq!(ctx.phase(), ScenePhase::Initial);
    assert!(ctx.is_scroll_locked());
}

#[test]
fn failed_probes_degrade_to_the_conservative_record() {
    let sched = Rc::new(ManualScheduler::new());
    let env = StaticEnvironment::default();
    let provider = SceneProvider::mount(ProviderSettings {
        scheduler: sched.clone(),
        viewport: Viewport::new(800.0, 600.0, 1.0),
        environment: &env,
        benchmark: &BrokenBench,
        prober: CapabilityProber::new(ProbeSettings::default()),
        gate: ScrollGate::default(),
        seed: 0,
    });
    assert_eq!(provider.capability(), DeviceCapability::conservative());
    // Reduced motion settles straight at the end of the sequence.
    assert_eq!(provider.context().phase(), ScenePhase::Interactive);
    assert!(!provider.context().is_scroll_locked());

    // No 2D context: layers mount as placeholders.
    let id = provider
        .mount_layer(&RecordingSurfaceFactory::new(), &LayerOptions::new(LayerKind::Starfield))
        .unwrap();
    assert!(provider.renderer(id).unwrap().is_placeholder());
    assert_eq!(sched.pending_frames(), 0);
}

#[test]
fn scrolling_walks_the_phases_through_the_context() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let ctx = provider.context();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    ctx.bus().subscribe(PHASE_CHANGED, move |e: &PhaseChange| {
        sink.borrow_mut().push(e.to);
    });

    for phase in &ScenePhase::SEQUENCE[1..] {
        assert_eq!(ctx.on_scroll(forward()), ScrollOutcome::Advanced);
        // Debounced while the transition runs.
        assert_eq!(ctx.on_scroll(forward()), ScrollOutcome::Ignored);
        assert_eq!(ctx.phase(), *phase);
        sched.advance(phase.transition_ms() as f64);
    }
    assert!(!ctx.is_scroll_locked());
    assert_eq!(
        *changes.borrow(),
        vec!["hero-intro", "planet-reveal", "text-reveal", "interactive"]
    );

    assert!(ctx.reset_scene());
    assert_eq!(ctx.phase(), ScenePhase::Initial);
}

#[test]
fn resize_rederives_ratio_and_reaches_every_layer() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let factory = RecordingSurfaceFactory::new();
    let a = provider
        .mount_layer(&factory, &LayerOptions::new(LayerKind::Starfield))
        .unwrap();
    let b = provider
        .mount_layer(&factory, &LayerOptions::new(LayerKind::Comet))
        .unwrap();
    assert_eq!(sched.pending_frames(), 2);

    provider.handle_resize(Viewport::new(1000.0, 500.0, 1.5));
    assert_eq!(provider.capability().device_pixel_ratio, 1.5);
    for id in [a, b] {
        assert_eq!(provider.renderer(id).unwrap().surface_dims(), Some((1500, 750)));
    }
    assert_eq!(sched.pending_frames(), 2);

    provider.handle_resize(Viewport::new(1000.0, 500.0, f64::NAN));
    assert_eq!(provider.capability().device_pixel_ratio, 1.0);
    assert_eq!(provider.renderer(a).unwrap().surface_dims(), Some((1000, 500)));
}

#[test]
fn layers_get_distinct_seeds() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let (fa, fb) = (RecordingSurfaceFactory::new(), RecordingSurfaceFactory::new());
    let opts = LayerOptions::new(LayerKind::Starfield);
    provider.mount_layer(&fa, &opts).unwrap();
    provider.mount_layer(&fb, &opts).unwrap();
    sched.run_frame(16.0);

    let a = fa.log().borrow().last_frame.clone();
    let b = fb.log().borrow().last_frame.clone();
    assert_eq!(a.len(), b.len());
    assert_ne!(a, b);
}

#[test]
fn invalid_layer_options_are_rejected() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let mut opts = LayerOptions::new(LayerKind::Grid);
    opts.color = Some("not-a-color".to_owned());
    assert!(
        provider
            .mount_layer(&RecordingSurfaceFactory::new(), &opts)
            .is_err()
    );
    assert_eq!(provider.layer_count(), 0);
}

#[test]
fn unmount_tears_everything_down() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let baseline = provider.bus().total_subscribers();
    let factory = RecordingSurfaceFactory::new();
    for kind in [LayerKind::Starfield, LayerKind::ParticleTrail, LayerKind::Grid] {
        provider.mount_layer(&factory, &LayerOptions::new(kind)).unwrap();
    }
    let ctx = provider.context();
    ctx.advance_phase();
    assert_eq!(sched.pending_timers(), 1);
    sched.run_frames(3, 16.0);

    provider.unmount();
    provider.unmount();
    assert_eq!(sched.pending_frames(), 0);
    assert_eq!(sched.pending_timers(), 0);
    assert_eq!(provider.bus().total_subscribers(), baseline);
    assert_eq!(provider.layer_count(), 0);

    let draws = factory.log().borrow().draw_calls;
    sched.run_frames(5, 16.0);
    sched.advance(5_000.0);
    assert_eq!(factory.log().borrow().draw_calls, draws);
    assert!(!ctx.advance_phase());
}

#[test]
fn single_layer_can_be_unmounted() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let factory = RecordingSurfaceFactory::new();
    let a = provider
        .mount_layer(&factory, &LayerOptions::new(LayerKind::Starfield))
        .unwrap();
    let _b = provider
        .mount_layer(&factory, &LayerOptions::new(LayerKind::Grid))
        .unwrap();
    assert!(provider.unmount_layer(a));
    assert!(!provider.unmount_layer(a));
    assert!(provider.renderer(a).is_none());
    assert_eq!(provider.layer_count(), 1);
    assert_eq!(sched.pending_frames(), 1);
}

#[test]
fn hidden_page_pauses_renderers() {
    let sched = Rc::new(ManualScheduler::new());
    let provider = desktop(&sched);
    let id = provider
        .mount_layer(
            &RecordingSurfaceFactory::new(),
            &LayerOptions::new(LayerKind::Starfield),
        )
        .unwrap();
    provider.set_visible(false);
    assert_eq!(provider.renderer(id).unwrap().state(), RendererState::Paused);
    assert_eq!(sched.pending_frames(), 0);
    provider.set_visible(true);
    assert_eq!(sched.pending_frames(), 1);
}
