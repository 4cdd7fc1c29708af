use std::{cell::Cell, fmt, rc::Rc};

use crate::{
    bus::EventBus,
    capability::DeviceCapability,
    phase::{PhaseController, ScenePhase, ScrollInput, ScrollOutcome},
};

/// What descendants of a scene provider see: the current phase, the capability record,
/// and the two phase operations. Cheap to clone.
#[derive(Clone)]
pub struct SceneContext {
    phase: Rc<PhaseController<ScenePhase>>,
    capability: Rc<Cell<DeviceCapability>>,
    bus: Rc<EventBus>,
}

impl SceneContext {
    pub(crate) fn new(
        phase: Rc<PhaseController<ScenePhase>>,
        capability: Rc<Cell<DeviceCapability>>,
        bus: Rc<EventBus>,
    ) -> Self {
        Self {
            phase,
            capability,
            bus,
        }
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase.phase()
    }

    /// Progress of the transition into the current phase.
    pub fn phase_progress(&self) -> f64 {
        self.phase.progress()
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase.is_transitioning()
    }

    pub fn device_capabilities(&self) -> DeviceCapability {
        self.capability.get()
    }

    pub fn advance_phase(&self) -> bool {
        self.phase.advance()
    }

    pub fn reset_scene(&self) -> bool {
        self.phase.reset()
    }

    pub fn on_scroll(&self, input: ScrollInput) -> ScrollOutcome {
        self.phase.on_scroll(input)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.phase.is_scroll_locked()
    }

    pub fn on_phase_settled(&self, listener: impl Fn(ScenePhase) + 'static) {
        self.phase.on_settled(listener);
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }
}

impl fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneContext")
            .field("phase", &self.phase())
            .field("capability", &self.device_capabilities())
            .finish()
    }
}
