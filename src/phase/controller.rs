use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    bus::{
        EventBus,
        channels::{PHASE_CHANGED, PHASE_SETTLED, PhaseChange},
    },
    phase::Phase,
    schedule::{Scheduler, TimerHandle},
};

/// One wheel/touch scroll sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollInput {
    /// Positive when scrolling down (forward).
    pub delta_y: f64,
    /// Document scroll offset after the event.
    pub scroll_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollOutcome {
    Advanced,
    Reset,
    Ignored,
}

/// Scroll-direction thresholds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollGate {
    /// Deltas smaller than this (in either direction) are jitter.
    pub min_delta: f64,
    /// Reverse scrolling resets the scene only once the document is at or above this offset.
    pub reset_threshold: f64,
}

impl Default for ScrollGate {
    fn default() -> Self {
        Self {
            min_delta: 4.0,
            reset_threshold: 50.0,
        }
    }
}

type SettledListener<P> = Rc<dyn Fn(P)>;

struct PhaseState<P> {
    phase: P,
    transitioning: bool,
    timer: Option<TimerHandle>,
    transition_started_ms: f64,
    transition_ms: u64,
    listeners: Vec<SettledListener<P>>,
    torn_down: bool,
}

struct Core<P: Phase> {
    state: RefCell<PhaseState<P>>,
    scheduler: Rc<dyn Scheduler>,
    bus: Option<Rc<EventBus>>,
}

/// Owns the current phase; the only writer of phase state.
///
/// `advance` is debounced by an in-flight transition timer: calls made while a transition
/// is pending are no-ops. The timer is cancelled on `reset`, `skip_to_end`, `teardown`
/// and drop, so no callback ever lands on a dead controller.
pub struct PhaseController<P: Phase> {
    core: Rc<Core<P>>,
    gate: ScrollGate,
}

impl<P: Phase> PhaseController<P> {
    pub fn new(scheduler: Rc<dyn Scheduler>, bus: Option<Rc<EventBus>>) -> Self {
        Self::with_gate(scheduler, bus, ScrollGate::default())
    }

    pub fn with_gate(
        scheduler: Rc<dyn Scheduler>,
        bus: Option<Rc<EventBus>>,
        gate: ScrollGate,
    ) -> Self {
        Self {
            core: Rc::new(Core {
                state: RefCell::new(PhaseState {
                    phase: P::initial(),
                    transitioning: false,
                    timer: None,
                    transition_started_ms: 0.0,
                    transition_ms: 0,
                    listeners: Vec::new(),
                    torn_down: false,
                }),
                scheduler,
                bus,
            }),
            gate,
        }
    }

    pub fn phase(&self) -> P {
        self.core.state.borrow().phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.core.state.borrow().transitioning
    }

    pub fn is_torn_down(&self) -> bool {
        self.core.state.borrow().torn_down
    }

    /// Scroll input is captured by the sequence until it reaches its terminal phase.
    pub fn is_scroll_locked(&self) -> bool {
        let st = self.core.state.borrow();
        !st.torn_down && !st.phase.is_terminal()
    }

    /// Progress of the active transition in `[0, 1]`; `1.0` once settled.
    pub fn progress(&self) -> f64 {
        let st = self.core.state.borrow();
        if !st.transitioning || st.transition_ms == 0 {
            return 1.0;
        }
        let elapsed = self.core.scheduler.now_ms() - st.transition_started_ms;
        (elapsed / st.transition_ms as f64).clamp(0.0, 1.0)
    }

    /// Move to the next phase. Returns `false` (and changes nothing) when terminal,
    /// torn down, or while a transition is still pending.
    pub fn advance(&self) -> bool {
        Core::advance(&self.core)
    }

    /// Force the initial phase and drop any pending transition.
    pub fn reset(&self) -> bool {
        self.core.force(P::initial(), false)
    }

    /// Degraded path: jump to the terminal phase and settle immediately.
    pub fn skip_to_end(&self) -> bool {
        self.core.force(P::terminal(), true)
    }

    /// Register a listener fired each time a transition settles.
    pub fn on_settled(&self, listener: impl Fn(P) + 'static) {
        let mut st = self.core.state.borrow_mut();
        if !st.torn_down {
            st.listeners.push(Rc::new(listener));
        }
    }

    pub fn on_scroll(&self, input: ScrollInput) -> ScrollOutcome {
        if self.is_torn_down() || !input.delta_y.is_finite() {
            return ScrollOutcome::Ignored;
        }
        if input.delta_y >= self.gate.min_delta {
            if self.advance() {
                return ScrollOutcome::Advanced;
            }
        } else if input.delta_y <= -self.gate.min_delta
            && input.scroll_y <= self.gate.reset_threshold
            && self.reset()
        {
            return ScrollOutcome::Reset;
        }
        ScrollOutcome::Ignored
    }

    /// Cancel the pending timer and stop reacting to input. Idempotent.
    pub fn teardown(&self) {
        let timer = {
            let mut st = self.core.state.borrow_mut();
            if st.torn_down {
                return;
            }
            st.torn_down = true;
            st.transitioning = false;
            st.listeners.clear();
            st.timer.take()
        };
        if let Some(handle) = timer {
            self.core.scheduler.clear_timeout(handle);
        }
        tracing::debug!("phase controller torn down");
    }
}

impl<P: Phase> Drop for PhaseController<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<P: Phase> Core<P> {
    fn advance(this: &Rc<Self>) -> bool {
        let (from, to) = {
            let mut st = this.state.borrow_mut();
            if st.torn_down || st.transitioning {
                return false;
            }
            let Some(next) = st.phase.next() else {
                return false;
            };
            let from = st.phase;
            st.phase = next;
            st.transitioning = true;
            st.transition_started_ms = this.scheduler.now_ms();
            st.transition_ms = next.transition_ms();
            (from, next)
        };
        tracing::debug!(from = from.name(), to = to.name(), "phase advanced");

        // Armed before subscribers run; a re-entrant reset or teardown must see it.
        let duration = to.transition_ms();
        if duration > 0 {
            let weak: Weak<Self> = Rc::downgrade(this);
            let handle = this.scheduler.set_timeout(
                duration,
                Box::new(move || {
                    if let Some(core) = weak.upgrade() {
                        Self::settle(&core);
                    }
                }),
            );
            this.state.borrow_mut().timer = Some(handle);
        }
        this.publish_changed(from, to);

        if duration == 0 {
            let still_ours = {
                let st = this.state.borrow();
                !st.torn_down && st.transitioning && st.phase == to
            };
            if still_ours {
                Self::settle(this);
            }
        }
        true
    }

    fn settle(this: &Rc<Self>) {
        let (phase, listeners) = {
            let mut st = this.state.borrow_mut();
            if st.torn_down {
                return;
            }
            st.transitioning = false;
            st.timer = None;
            (st.phase, st.listeners.clone())
        };
        tracing::debug!(phase = phase.name(), "phase settled");
        if let Some(bus) = &this.bus {
            bus.publish(
                PHASE_SETTLED,
                &PhaseChange {
                    from: phase.name(),
                    to: phase.name(),
                    index: phase.index(),
                },
            );
        }
        for listener in listeners {
            listener(phase);
        }
        if phase.auto_advances() {
            Self::advance(this);
        }
    }

    fn force(&self, target: P, settled_event: bool) -> bool {
        let (from, timer, was_transitioning, listeners) = {
            let mut st = self.state.borrow_mut();
            if st.torn_down {
                return false;
            }
            let from = st.phase;
            let was_transitioning = st.transitioning;
            st.phase = target;
            st.transitioning = false;
            let listeners = if settled_event {
                st.listeners.clone()
            } else {
                Vec::new()
            };
            (from, st.timer.take(), was_transitioning, listeners)
        };
        if let Some(handle) = timer {
            self.scheduler.clear_timeout(handle);
        }
        if from == target && !was_transitioning {
            return false;
        }
        tracing::debug!(from = from.name(), to = target.name(), "phase forced");
        if from != target {
            self.publish_changed(from, target);
        }
        if settled_event {
            if let Some(bus) = &self.bus {
                bus.publish(
                    PHASE_SETTLED,
                    &PhaseChange {
                        from: target.name(),
                        to: target.name(),
                        index: target.index(),
                    },
                );
            }
            for listener in listeners {
                listener(target);
            }
        }
        true
    }

    fn publish_changed(&self, from: P, to: P) {
        if let Some(bus) = &self.bus {
            bus.publish(
                PHASE_CHANGED,
                &PhaseChange {
                    from: from.name(),
                    to: to.name(),
                    index: to.index(),
                },
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/phase/controller.rs"]
mod tests;
