use std::{cell::RefCell, collections::BTreeMap};

use super::{FrameCallback, FrameHandle, Scheduler, TimerCallback, TimerHandle};

// Upper bound on timers fired by a single `advance` call; guards self-rescheduling
// zero-delay timers.
const MAX_TIMERS_PER_ADVANCE: usize = 100_000;

/// Deterministic host scheduler driven by an explicit virtual clock.
///
/// Used headless (CLI frame dumps) and as the mock scheduler in tests: it records how
/// many callbacks are pending and how many cancellations were requested.
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<State>,
}

#[derive(Default)]
struct State {
    now_ms: f64,
    next_id: u64,
    frames: BTreeMap<u64, FrameCallback>,
    timers: BTreeMap<u64, PendingTimer>,
    frames_run: u64,
    timers_fired: u64,
    frame_cancellations: u64,
    timer_cancellations: u64,
}

struct PendingTimer {
    due_ms: f64,
    cb: TimerCallback,
}

impl State {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn earliest_due(&self, limit_ms: f64) -> Option<u64> {
        self.timers
            .iter()
            .filter(|(_, t)| t.due_ms <= limit_ms)
            .min_by(|(ia, a), (ib, b)| a.due_ms.total_cmp(&b.due_ms).then(ia.cmp(ib)))
            .map(|(id, _)| *id)
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `dt_ms`, firing due timers, then run every frame callback
    /// that was pending before this call. Returns how many frame callbacks ran.
    pub fn run_frame(&self, dt_ms: f64) -> usize {
        self.advance(dt_ms);

        let (now, batch): (f64, Vec<u64>) = {
            let st = self.state.borrow();
            (st.now_ms, st.frames.keys().copied().collect())
        };

        let mut ran = 0usize;
        for id in batch {
            let cb = self.state.borrow_mut().frames.remove(&id);
            if let Some(cb) = cb {
                self.state.borrow_mut().frames_run += 1;
                cb(now);
                ran += 1;
            }
        }
        ran
    }

    /// Run `n` frames spaced `dt_ms` apart; returns the total callbacks run.
    pub fn run_frames(&self, n: usize, dt_ms: f64) -> usize {
        (0..n).map(|_| self.run_frame(dt_ms)).sum()
    }

    /// Advance the clock by `ms`, firing due timers in `(due, id)` order.
    pub fn advance(&self, ms: f64) {
        let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        let target = self.state.borrow().now_ms + ms;

        let mut fired = 0usize;
        while fired < MAX_TIMERS_PER_ADVANCE {
            let next = {
                let mut st = self.state.borrow_mut();
                match st.earliest_due(target) {
                    Some(id) => st.timers.remove(&id),
                    None => None,
                }
            };
            let Some(timer) = next else {
                break;
            };
            {
                let mut st = self.state.borrow_mut();
                st.now_ms = st.now_ms.max(timer.due_ms);
                st.timers_fired += 1;
            }
            (timer.cb)();
            fired += 1;
        }
        if fired == MAX_TIMERS_PER_ADVANCE {
            tracing::warn!(fired, "timer budget exhausted during advance");
        }

        let mut st = self.state.borrow_mut();
        st.now_ms = st.now_ms.max(target);
    }

    pub fn frames_run(&self) -> u64 {
        self.state.borrow().frames_run
    }

    pub fn timers_fired(&self) -> u64 {
        self.state.borrow().timers_fired
    }

    pub fn frame_cancellations(&self) -> u64 {
        self.state.borrow().frame_cancellations
    }

    pub fn timer_cancellations(&self) -> u64 {
        self.state.borrow().timer_cancellations
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.state.borrow().now_ms
    }

    fn request_frame(&self, cb: FrameCallback) -> FrameHandle {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        st.frames.insert(id, cb);
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) -> bool {
        let mut st = self.state.borrow_mut();
        st.frame_cancellations += 1;
        st.frames.remove(&handle.0).is_some()
    }

    fn set_timeout(&self, delay_ms: u64, cb: TimerCallback) -> TimerHandle {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        let due_ms = st.now_ms + delay_ms as f64;
        st.timers.insert(id, PendingTimer { due_ms, cb });
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) -> bool {
        let mut st = self.state.borrow_mut();
        st.timer_cancellations += 1;
        st.timers.remove(&handle.0).is_some()
    }

    fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/manual.rs"]
mod tests;
