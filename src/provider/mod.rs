//! Scene provider: probes capability once, owns the phase controller and the mounted
//! canvas renderers, and hands descendants a read-only [`SceneContext`].

mod context;

pub use context::SceneContext;

use std::{
    cell::{Cell, Ref, RefCell},
    rc::Rc,
};

use crate::{
    bus::{EventBus, channels::VIEWPORT_RESIZE},
    capability::{Benchmark, CapabilityProber, DeviceCapability, HostEnvironment},
    config::LayerOptions,
    foundation::{
        core::{Rng64, Viewport, sanitize_pixel_ratio},
        error::SceneResult,
    },
    phase::{PhaseController, ScenePhase, ScrollGate},
    render::{CanvasRenderer, NoSurfaceFactory, RendererSetup, SurfaceFactory},
    schedule::Scheduler,
};

/// Inputs of [`SceneProvider::mount`].
pub struct ProviderSettings<'a> {
    pub scheduler: Rc<dyn Scheduler>,
    pub viewport: Viewport,
    pub environment: &'a dyn HostEnvironment,
    pub benchmark: &'a dyn Benchmark,
    pub prober: CapabilityProber,
    pub gate: ScrollGate,
    /// Root seed; each mounted layer draws its own seed from it.
    pub seed: u64,
}

/// Index of a renderer mounted through [`SceneProvider::mount_layer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

pub struct SceneProvider {
    scheduler: Rc<dyn Scheduler>,
    bus: Rc<EventBus>,
    capability: Rc<Cell<DeviceCapability>>,
    phase: Rc<PhaseController<ScenePhase>>,
    viewport: Cell<Viewport>,
    seeds: RefCell<Rng64>,
    layers: RefCell<Vec<Option<CanvasRenderer>>>,
    mounted: Cell<bool>,
}

impl SceneProvider {
    /// Probe the device once and assemble the scene.
    #[tracing::instrument(skip_all)]
    pub fn mount(settings: ProviderSettings<'_>) -> Self {
        let capability = settings
            .prober
            .probe(settings.environment, settings.benchmark);
        Self::with_capability(
            capability,
            settings.scheduler,
            settings.viewport,
            settings.gate,
            settings.seed,
        )
    }

    /// Assemble around an already known capability record.
    ///
    /// Reduced motion settles the phase sequence at its terminal phase right away.
    pub fn with_capability(
        capability: DeviceCapability,
        scheduler: Rc<dyn Scheduler>,
        viewport: Viewport,
        gate: ScrollGate,
        seed: u64,
    ) -> Self {
        let bus = Rc::new(EventBus::new());
        let phase = Rc::new(PhaseController::with_gate(
            Rc::clone(&scheduler),
            Some(Rc::clone(&bus)),
            gate,
        ));
        if capability.prefers_reduced_motion {
            phase.skip_to_end();
        }
        let viewport = Viewport {
            device_pixel_ratio: capability.device_pixel_ratio,
            ..viewport
        };
        tracing::debug!(
            tier = capability.performance_tier.as_str(),
            reduced_motion = capability.prefers_reduced_motion,
            "scene provider mounted"
        );
        Self {
            scheduler,
            bus,
            capability: Rc::new(Cell::new(capability)),
            phase,
            viewport: Cell::new(viewport),
            seeds: RefCell::new(Rng64::new(seed)),
            layers: RefCell::new(Vec::new()),
            mounted: Cell::new(true),
        }
    }

    pub fn context(&self) -> SceneContext {
        SceneContext::new(
            Rc::clone(&self.phase),
            Rc::clone(&self.capability),
            Rc::clone(&self.bus),
        )
    }

    pub fn capability(&self) -> DeviceCapability {
        self.capability.get()
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Mount a canvas renderer for `options`, sharing this provider's scheduler, bus and
    /// capability. Devices without a 2D context get a placeholder renderer.
    pub fn mount_layer(
        &self,
        factory: &dyn SurfaceFactory,
        options: &LayerOptions,
    ) -> SceneResult<LayerId> {
        let capability = self.capability.get();
        let style = options.resolve(&capability)?;
        let factory: &dyn SurfaceFactory = if self.mounted.get() && capability.canvas2d_supported
        {
            factory
        } else {
            &NoSurfaceFactory
        };
        let seed = self.seeds.borrow_mut().next_u64();
        let renderer = CanvasRenderer::mount_kind(
            options.kind,
            RendererSetup {
                factory,
                scheduler: Rc::clone(&self.scheduler),
                bus: Some(Rc::clone(&self.bus)),
                viewport: self.viewport.get(),
                style,
                seed,
            },
        );
        let mut layers = self.layers.borrow_mut();
        layers.push(Some(renderer));
        Ok(LayerId(layers.len() - 1))
    }

    pub fn renderer(&self, id: LayerId) -> Option<Ref<'_, CanvasRenderer>> {
        Ref::filter_map(self.layers.borrow(), |v| v.get(id.0).and_then(Option::as_ref)).ok()
    }

    /// Number of renderers still mounted.
    pub fn layer_count(&self) -> usize {
        self.layers.borrow().iter().flatten().count()
    }

    pub fn unmount_layer(&self, id: LayerId) -> bool {
        let taken = self
            .layers
            .borrow_mut()
            .get_mut(id.0)
            .and_then(Option::take);
        match taken {
            Some(mut renderer) => {
                renderer.unmount();
                true
            }
            None => false,
        }
    }

    /// Re-derive the pixel ratio and tell every renderer about the new viewport.
    pub fn handle_resize(&self, viewport: Viewport) {
        if !self.mounted.get() {
            return;
        }
        let ratio = sanitize_pixel_ratio(viewport.device_pixel_ratio);
        let viewport = Viewport {
            device_pixel_ratio: ratio,
            ..viewport
        };
        self.capability
            .set(self.capability.get().with_pixel_ratio(ratio));
        self.viewport.set(viewport);
        self.bus.publish(VIEWPORT_RESIZE, &viewport);
    }

    /// Pause or resume every renderer (page hidden / shown).
    pub fn set_visible(&self, visible: bool) {
        for renderer in self.layers.borrow().iter().flatten() {
            renderer.set_visible(visible);
        }
    }

    /// Tear down every renderer and the phase controller. Idempotent; also run on drop.
    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        let renderers: Vec<CanvasRenderer> =
            self.layers.borrow_mut().iter_mut().filter_map(Option::take).collect();
        for mut renderer in renderers {
            renderer.unmount();
        }
        self.phase.teardown();
        tracing::debug!("scene provider unmounted");
    }
}

impl Drop for SceneProvider {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/provider/provider.rs"]
mod tests;
