use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    bus::{
        EventBus,
        channels::{MessageState, MessageStateChange, STELLAR_MESSAGE_STATE},
    },
    choreo::lifecycle::{Lifecycle, LifecycleOp, LifecycleState},
    schedule::{Scheduler, TimerHandle},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageTiming {
    /// Typewriter delay per character.
    pub char_ms: u64,
    pub hold_ms: u64,
    pub fade_ms: u64,
}

impl Default for MessageTiming {
    fn default() -> Self {
        Self {
            char_ms: 45,
            hold_ms: 2500,
            fade_ms: 800,
        }
    }
}

impl MessageTiming {
    pub fn reveal_ms(&self, message: &str) -> u64 {
        self.char_ms.saturating_mul(message.chars().count() as u64)
    }
}

struct Inner {
    scheduler: Rc<dyn Scheduler>,
    bus: Option<Rc<EventBus>>,
    timing: MessageTiming,
    lifecycle: LifecycleState,
    message: String,
    state: MessageState,
    stage_started_ms: f64,
    timer: Option<TimerHandle>,
}

impl Inner {
    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.clear_timeout(handle);
        }
    }

    fn stage_ms(&self, state: MessageState) -> Option<u64> {
        match state {
            MessageState::Revealing => Some(self.timing.reveal_ms(&self.message)),
            MessageState::Holding => Some(self.timing.hold_ms),
            MessageState::Fading => Some(self.timing.fade_ms),
            MessageState::Hidden | MessageState::Done => None,
        }
    }
}

fn following(state: MessageState) -> MessageState {
    match state {
        MessageState::Hidden => MessageState::Hidden,
        MessageState::Revealing => MessageState::Holding,
        MessageState::Holding => MessageState::Fading,
        MessageState::Fading | MessageState::Done => MessageState::Done,
    }
}

/// Typewriter message: reveal one character at a time, hold, fade out.
///
/// Stage changes are driven by scheduler timers and announced on `stellarMessageState`.
/// At most one timer is pending; deactivate, destroy and drop cancel it.
pub struct StellarMessage {
    inner: Rc<RefCell<Inner>>,
}

impl StellarMessage {
    pub fn new(scheduler: Rc<dyn Scheduler>, bus: Option<Rc<EventBus>>) -> Self {
        Self::with_timing(scheduler, bus, MessageTiming::default())
    }

    pub fn with_timing(
        scheduler: Rc<dyn Scheduler>,
        bus: Option<Rc<EventBus>>,
        timing: MessageTiming,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                scheduler,
                bus,
                timing,
                lifecycle: LifecycleState::Uninitialized,
                message: String::new(),
                state: MessageState::Hidden,
                stage_started_ms: 0.0,
                timer: None,
            })),
        }
    }

    pub fn message_state(&self) -> MessageState {
        self.inner.borrow().state
    }

    pub fn message(&self) -> String {
        self.inner.borrow().message.clone()
    }

    pub fn has_pending_timer(&self) -> bool {
        self.inner.borrow().timer.is_some()
    }

    /// Start revealing `message`, replacing whatever is showing. Only while active.
    pub fn show(&self, message: impl Into<String>) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.lifecycle.is_active() {
                return false;
            }
            inner.cancel_timer();
            inner.message = message.into();
        }
        enter(&self.inner, MessageState::Revealing);
        true
    }

    /// Drop the message immediately.
    pub fn hide(&self) {
        self.inner.borrow_mut().cancel_timer();
        enter(&self.inner, MessageState::Hidden);
    }

    /// Characters visible at host time `now_ms`.
    pub fn visible_text(&self, now_ms: f64) -> String {
        let inner = self.inner.borrow();
        match inner.state {
            MessageState::Hidden => String::new(),
            MessageState::Revealing => {
                let elapsed = (now_ms - inner.stage_started_ms).max(0.0);
                let shown = if inner.timing.char_ms == 0 {
                    usize::MAX
                } else {
                    (elapsed / inner.timing.char_ms as f64).floor() as usize
                };
                inner.message.chars().take(shown).collect()
            }
            MessageState::Holding | MessageState::Fading | MessageState::Done => {
                inner.message.clone()
            }
        }
    }

    /// Opacity at host time `now_ms`.
    pub fn opacity(&self, now_ms: f64) -> f64 {
        let inner = self.inner.borrow();
        match inner.state {
            MessageState::Hidden | MessageState::Done => 0.0,
            MessageState::Revealing | MessageState::Holding => 1.0,
            MessageState::Fading => {
                if inner.timing.fade_ms == 0 {
                    return 0.0;
                }
                let t = (now_ms - inner.stage_started_ms) / inner.timing.fade_ms as f64;
                (1.0 - t).clamp(0.0, 1.0)
            }
        }
    }

    fn step(&self, op: LifecycleOp) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.lifecycle.apply(op) {
            Some(next) => {
                inner.lifecycle = next;
                true
            }
            None => false,
        }
    }
}

fn enter(inner: &Rc<RefCell<Inner>>, state: MessageState) {
    let announce = {
        let mut guard = inner.borrow_mut();
        // A restarted reveal carries a new message, so it is always announced.
        let changed = guard.state != state || state == MessageState::Revealing;
        guard.state = state;
        guard.stage_started_ms = guard.scheduler.now_ms();
        if let Some(ms) = guard.stage_ms(state) {
            let weak: Weak<RefCell<Inner>> = Rc::downgrade(inner);
            let handle = guard.scheduler.set_timeout(
                ms,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.borrow_mut().timer = None;
                        enter(&inner, following(state));
                    }
                }),
            );
            guard.timer = Some(handle);
        }
        changed.then(|| {
            (
                guard.bus.clone(),
                MessageStateChange {
                    state,
                    message: guard.message.clone(),
                },
            )
        })
    };
    if let Some((Some(bus), change)) = announce {
        tracing::debug!(state = ?change.state, "stellar message stage");
        bus.publish(STELLAR_MESSAGE_STATE, &change);
    }
}

impl Lifecycle for StellarMessage {
    fn state(&self) -> LifecycleState {
        self.inner.borrow().lifecycle
    }

    fn init(&mut self) -> bool {
        self.step(LifecycleOp::Init)
    }

    fn activate(&mut self) -> bool {
        self.step(LifecycleOp::Activate)
    }

    fn deactivate(&mut self) -> bool {
        let changed = self.step(LifecycleOp::Deactivate);
        if changed {
            self.hide();
        }
        changed
    }

    fn destroy(&mut self) -> bool {
        let changed = self.step(LifecycleOp::Destroy);
        if changed {
            self.inner.borrow_mut().cancel_timer();
            self.inner.borrow_mut().state = MessageState::Hidden;
        }
        changed
    }
}

impl Drop for StellarMessage {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.cancel_timer();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/stellar_message.rs"]
mod tests;
