/// Lifecycle state shared by the animation controllers in [`crate::choreo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    Uninitialized,
    Ready,
    Active,
    Inactive,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleOp {
    Init,
    Activate,
    Deactivate,
    Destroy,
}

impl LifecycleState {
    /// State after applying `op`, or `None` when `op` is not legal from here.
    ///
    /// Everything is a no-op once destroyed.
    pub fn apply(self, op: LifecycleOp) -> Option<Self> {
        use LifecycleOp::*;
        use LifecycleState::*;
        match (self, op) {
            (Destroyed, _) => None,
            (Uninitialized, Init) => Some(Ready),
            (Ready | Inactive, Activate) => Some(Active),
            (Active, Deactivate) => Some(Inactive),
            (_, Destroy) => Some(Destroyed),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Explicit `init / activate / deactivate / destroy` lifecycle for controllers owned by
/// the component tree. Each method returns whether the state changed.
pub trait Lifecycle {
    fn state(&self) -> LifecycleState;

    fn init(&mut self) -> bool;

    fn activate(&mut self) -> bool;

    /// Stop reacting to input and cancel anything scheduled; `activate` may follow.
    fn deactivate(&mut self) -> bool;

    /// Final teardown; every later call is a no-op.
    fn destroy(&mut self) -> bool;
}
