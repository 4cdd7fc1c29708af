use std::rc::Rc;

use crate::{
    bus::{
        EventBus,
        channels::{THOUGHT_TRAIL_HOVER, TrailHover},
    },
    choreo::lifecycle::{Lifecycle, LifecycleOp, LifecycleState},
    foundation::core::{Point, Rect, Rgba8},
};

/// Hoverable region that lights up one particle trail.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrailAnchor {
    pub id: u32,
    pub bounds: Rect,
    pub color: Rgba8,
}

/// Turns pointer movement over anchors into `thoughtTrailsHover` enter/leave events.
pub struct ThoughtTrails {
    bus: Rc<EventBus>,
    anchors: Vec<TrailAnchor>,
    hovered: Option<TrailAnchor>,
    state: LifecycleState,
}

impl ThoughtTrails {
    pub fn new(bus: Rc<EventBus>, anchors: Vec<TrailAnchor>) -> Self {
        Self {
            bus,
            anchors,
            hovered: None,
            state: LifecycleState::Uninitialized,
        }
    }

    pub fn anchors(&self) -> &[TrailAnchor] {
        &self.anchors
    }

    pub fn hovered(&self) -> Option<u32> {
        self.hovered.map(|a| a.id)
    }

    /// Replace the anchor set (e.g. after layout); a hovered anchor that vanished is left.
    pub fn set_anchors(&mut self, anchors: Vec<TrailAnchor>) {
        self.anchors = anchors;
        if let Some(h) = self.hovered
            && !self.anchors.iter().any(|a| a.id == h.id)
        {
            self.leave();
        }
    }

    /// Hit-test `point`; publishes only when the hovered anchor changes.
    pub fn pointer_move(&mut self, point: Point) -> Option<u32> {
        if !self.state.is_active() {
            return None;
        }
        let hit = self.anchors.iter().find(|a| a.bounds.contains(point)).copied();
        if hit.map(|a| a.id) != self.hovered() {
            self.leave();
            if let Some(anchor) = hit {
                self.hovered = Some(anchor);
                self.publish(anchor, true);
            }
        }
        self.hovered()
    }

    pub fn pointer_leave(&mut self) {
        self.leave();
    }

    fn leave(&mut self) {
        if let Some(anchor) = self.hovered.take() {
            self.publish(anchor, false);
        }
    }

    fn publish(&self, anchor: TrailAnchor, active: bool) {
        self.bus.publish(
            THOUGHT_TRAIL_HOVER,
            &TrailHover {
                id: anchor.id,
                bounds: anchor.bounds,
                color: anchor.color,
                active,
            },
        );
    }

    fn step(&mut self, op: LifecycleOp) -> bool {
        match self.state.apply(op) {
            Some(next) => {
                tracing::debug!(from = ?self.state, to = ?next, "thought trails lifecycle");
                self.state = next;
                true
            }
            None => false,
        }
    }
}

impl Lifecycle for ThoughtTrails {
    fn state(&self) -> LifecycleState {
        self.state
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
            self.leave();
        }
        changed
    }

    fn destroy(&mut self) -> bool {
        self.leave();
        let changed = self.step(LifecycleOp::Destroy);
        if changed {
            self.anchors.clear();
        }
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/thought_trails.rs"]
mod tests;
