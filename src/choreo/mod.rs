//! Animation controllers owned by the component tree, plus pure style functions.

pub mod lifecycle;
pub mod pager;
pub mod stellar_message;
pub mod style;
pub mod thought_trails;

pub use lifecycle::{Lifecycle, LifecycleOp, LifecycleState};
pub use pager::HorizontalPager;
pub use stellar_message::{MessageTiming, StellarMessage};
pub use style::{StyleRecord, headline_style, hero_style, planet_style};
pub use thought_trails::{ThoughtTrails, TrailAnchor};
