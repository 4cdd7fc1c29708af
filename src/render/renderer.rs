use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    bus::{EventBus, Subscription, channels::VIEWPORT_RESIZE},
    foundation::{
        core::{Rgba8, Rng64, Viewport},
        error::SceneResult,
    },
    layers::{FrameTime, Layer, LayerKind, LayerStyle},
    render::surface::{DrawSurface, FrameRGBA, SurfaceFactory},
    schedule::{FrameHandle, Scheduler},
};

/// Lifecycle of a [`CanvasRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererState {
    /// No 2D context could be acquired; the host shows a static placeholder.
    Placeholder,
    /// Per-frame loop active.
    Running,
    /// Reduced motion: painted once, no frame loop.
    Static,
    /// Hidden by the host; the loop resumes on `set_visible(true)`.
    Paused,
    /// A frame failed; the loop stopped and the last good frame stays on screen.
    Failed,
    TornDown,
}

/// Everything a renderer needs at mount time.
pub struct RendererSetup<'a> {
    pub factory: &'a dyn SurfaceFactory,
    pub scheduler: Rc<dyn Scheduler>,
    /// When present the renderer follows `viewportResize` events.
    pub bus: Option<Rc<EventBus>>,
    pub viewport: Viewport,
    pub style: LayerStyle,
    pub seed: u64,
}

struct Inner {
    state: RendererState,
    layer: Box<dyn Layer>,
    surface: Option<Box<dyn DrawSurface>>,
    scheduler: Rc<dyn Scheduler>,
    style: LayerStyle,
    viewport: Viewport,
    seed: u64,
    pending: Option<FrameHandle>,
    started_ms: Option<f64>,
    last_draw_ms: Option<f64>,
    frames_drawn: u64,
}

impl Inner {
    fn reseed(&mut self) {
        let mut rng = Rng64::new(self.seed);
        self.layer.reseed(&self.viewport, &self.style, &mut rng);
    }

    fn draw(&mut self, time: FrameTime) -> SceneResult<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface.clear(Rgba8::TRANSPARENT);
        self.layer.update(time, &self.style)?;
        self.layer.draw(surface.as_mut(), &self.style)?;
        surface.present()?;
        self.frames_drawn += 1;
        Ok(())
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn fail(&mut self, err: &dyn std::fmt::Display) {
        tracing::warn!(layer = self.layer.kind().as_str(), %err, "layer frame failed; stopping");
        self.cancel_pending();
        self.state = RendererState::Failed;
    }
}

/// Drives one [`Layer`] on its own drawing surface.
///
/// At most one frame request is outstanding at any time, and none once the renderer is
/// unmounted. Scheduled callbacks hold only a weak reference, so a dropped renderer is
/// never touched by a late frame.
pub struct CanvasRenderer {
    inner: Rc<RefCell<Inner>>,
    resize_sub: Option<Subscription>,
}

impl CanvasRenderer {
    /// Build a layer of `kind` and mount it.
    pub fn mount_kind(kind: LayerKind, setup: RendererSetup<'_>) -> Self {
        let layer = kind.build(setup.bus.as_ref());
        Self::mount(layer, setup)
    }

    #[tracing::instrument(skip_all, fields(layer = layer.kind().as_str()))]
    pub fn mount(layer: Box<dyn Layer>, setup: RendererSetup<'_>) -> Self {
        let RendererSetup {
            factory,
            scheduler,
            bus,
            viewport,
            style,
            seed,
        } = setup;
        let (w, h) = viewport.surface_dims();
        let surface = factory.acquire_2d(w, h);
        let placeholder = surface.is_none();

        let inner = Rc::new(RefCell::new(Inner {
            state: RendererState::Placeholder,
            layer,
            surface,
            scheduler,
            style,
            viewport,
            seed,
            pending: None,
            started_ms: None,
            last_draw_ms: None,
            frames_drawn: 0,
        }));
        let mut renderer = Self {
            inner,
            resize_sub: None,
        };

        if placeholder {
            tracing::warn!(width = w, height = h, "no 2d surface available; showing placeholder");
            return renderer;
        }

        {
            let mut inner = renderer.inner.borrow_mut();
            let ratio = viewport.effective_pixel_ratio();
            if let Some(surface) = inner.surface.as_mut() {
                surface.set_pixel_ratio(ratio);
            }
            inner.reseed();
            if style.reduced_motion {
                inner.state = RendererState::Static;
                if let Err(err) = inner.draw(FrameTime::ZERO) {
                    inner.fail(&err);
                }
            } else {
                inner.state = RendererState::Running;
            }
        }
        if renderer.state() == RendererState::Running {
            schedule(&renderer.inner);
        }

        if let Some(bus) = bus {
            let weak = Rc::downgrade(&renderer.inner);
            renderer.resize_sub = bus.subscribe_guarded(VIEWPORT_RESIZE, move |vp: &Viewport| {
                if let Some(inner) = weak.upgrade() {
                    resize(&inner, *vp);
                }
            });
        }
        tracing::debug!(state = ?renderer.state(), "renderer mounted");
        renderer
    }

    pub fn state(&self) -> RendererState {
        self.inner.borrow().state
    }

    pub fn is_placeholder(&self) -> bool {
        self.state() == RendererState::Placeholder
    }

    pub fn layer_kind(&self) -> LayerKind {
        self.inner.borrow().layer.kind()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.inner.borrow().frames_drawn
    }

    pub fn entity_count(&self) -> usize {
        self.inner.borrow().layer.entity_count()
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    pub fn has_pending_frame(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Backing-store size, `None` without a surface.
    pub fn surface_dims(&self) -> Option<(u32, u32)> {
        self.inner.borrow().surface.as_ref().map(|s| s.size())
    }

    /// Pixels of the last presented frame, when the surface has any.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.inner.borrow().surface.as_ref().and_then(|s| s.readback())
    }

    /// Resize directly, without going through the event bus.
    pub fn resize(&self, viewport: Viewport) {
        resize(&self.inner, viewport);
    }

    /// Pause while hidden, resume when visible again.
    pub fn set_visible(&self, visible: bool) {
        let resume = {
            let mut inner = self.inner.borrow_mut();
            match (inner.state, visible) {
                (RendererState::Running, false) => {
                    inner.cancel_pending();
                    inner.state = RendererState::Paused;
                    false
                }
                (RendererState::Paused, true) => {
                    inner.state = RendererState::Running;
                    true
                }
                _ => false,
            }
        };
        if resume {
            schedule(&self.inner);
        }
    }

    /// Cancel the frame loop, stop listening for resizes and release the surface.
    /// Safe to call any number of times.
    pub fn unmount(&mut self) {
        if let Some(mut sub) = self.resize_sub.take() {
            sub.cancel();
        }
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            return;
        };
        if inner.state == RendererState::TornDown {
            return;
        }
        inner.cancel_pending();
        inner.layer.detach();
        inner.surface = None;
        inner.state = RendererState::TornDown;
        tracing::debug!(layer = inner.layer.kind().as_str(), "renderer unmounted");
    }
}

impl Drop for CanvasRenderer {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn schedule(inner: &Rc<RefCell<Inner>>) {
    let weak: Weak<RefCell<Inner>> = Rc::downgrade(inner);
    let mut guard = inner.borrow_mut();
    guard.cancel_pending();
    let handle = guard.scheduler.request_frame(Box::new(move |now_ms| {
        if let Some(inner) = weak.upgrade() {
            on_frame(&inner, now_ms);
        }
    }));
    guard.pending = Some(handle);
}

fn on_frame(inner: &Rc<RefCell<Inner>>, now_ms: f64) {
    {
        let mut guard = inner.borrow_mut();
        guard.pending = None;
        if guard.state != RendererState::Running {
            return;
        }
        let started = *guard.started_ms.get_or_insert(now_ms);
        let min_interval = guard.style.performance_tier.min_frame_interval_ms();
        let due = guard
            .last_draw_ms
            .is_none_or(|last| now_ms - last >= min_interval);
        if due {
            let time = FrameTime {
                elapsed_ms: now_ms - started,
                delta_ms: guard.last_draw_ms.map_or(0.0, |last| now_ms - last),
            };
            if let Err(err) = guard.draw(time) {
                guard.fail(&err);
                return;
            }
            guard.last_draw_ms = Some(now_ms);
        }
    }
    schedule(inner);
}

fn resize(inner: &Rc<RefCell<Inner>>, viewport: Viewport) {
    let reschedule = {
        let mut guard = inner.borrow_mut();
        if matches!(
            guard.state,
            RendererState::Placeholder | RendererState::Failed | RendererState::TornDown
        ) {
            return;
        }
        let (w, h) = viewport.surface_dims();
        let ratio = viewport.effective_pixel_ratio();
        let resized = match guard.surface.as_mut() {
            Some(surface) => surface.resize(w, h).map(|()| surface.set_pixel_ratio(ratio)),
            None => Ok(()),
        };
        if let Err(err) = resized {
            guard.fail(&err);
            return;
        }
        guard.viewport = viewport;
        guard.reseed();
        tracing::debug!(width = w, height = h, "renderer resized");
        match guard.state {
            RendererState::Static => {
                if let Err(err) = guard.draw(FrameTime::ZERO) {
                    guard.fail(&err);
                }
                false
            }
            RendererState::Running => true,
            _ => false,
        }
    };
    if reschedule {
        schedule(inner);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
