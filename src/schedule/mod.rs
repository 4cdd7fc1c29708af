//! Host scheduling seam.
//!
//! Everything in this crate runs on one thread, cooperatively, driven by the host's
//! per-frame callback and timer callbacks. "Waiting" is always a scheduled callback;
//! callers return immediately. Every handle returned here can be cancelled, and owners
//! (phase controller, renderers, message controllers) cancel theirs on teardown.

mod manual;

pub use manual::ManualScheduler;

/// Callback run on the next frame with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Callback run once when a timer elapses.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Handle for a pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Handle for a pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Per-frame and timer scheduler provided by the host.
///
/// Implementations use interior mutability; callbacks must never run re-entrantly from
/// inside `request_frame` / `set_timeout`.
pub trait Scheduler {
    /// Current host time in milliseconds.
    fn now_ms(&self) -> f64;

    fn request_frame(&self, cb: FrameCallback) -> FrameHandle;

    /// Returns `false` when the handle was unknown or already ran.
    fn cancel_frame(&self, handle: FrameHandle) -> bool;

    fn set_timeout(&self, delay_ms: u64, cb: TimerCallback) -> TimerHandle;

    /// Returns `false` when the handle was unknown or already fired.
    fn clear_timeout(&self, handle: TimerHandle) -> bool;

    fn pending_frames(&self) -> usize;

    fn pending_timers(&self) -> usize;
}
