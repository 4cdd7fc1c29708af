//! Channel catalogue shared by publishers and subscribers.

use crate::{
    bus::Channel,
    foundation::core::{Rect, Rgba8, Viewport},
};

/// Pointer entered (`active: true`) or left (`active: false`) a thought-trail anchor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrailHover {
    pub id: u32,
    pub bounds: Rect,
    pub color: Rgba8,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageChange {
    pub index: usize,
    pub previous: usize,
    pub total: usize,
}

/// Phase names are carried as strings so one channel serves every phase sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PhaseChange {
    pub from: &'static str,
    pub to: &'static str,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageState {
    Hidden,
    Revealing,
    Holding,
    Fading,
    Done,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageStateChange {
    pub state: MessageState,
    pub message: String,
}

pub const THOUGHT_TRAIL_HOVER: Channel<TrailHover> = Channel::new("thoughtTrailsHover");
pub const HORIZONTAL_PAGE_CHANGE: Channel<PageChange> = Channel::new("horizontalPageChange");
pub const PHASE_CHANGED: Channel<PhaseChange> = Channel::new("scenePhaseChange");
pub const PHASE_SETTLED: Channel<PhaseChange> = Channel::new("scenePhaseSettled");
pub const VIEWPORT_RESIZE: Channel<Viewport> = Channel::new("viewportResize");
pub const STELLAR_MESSAGE_STATE: Channel<MessageStateChange> =
    Channel::new("stellarMessageState");
