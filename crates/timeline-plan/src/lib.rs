//! Timeline planning library for Clipbook
//!
//! Computes how a user-ordered run of clips is concatenated into one video:
//! the common render frame, each clip's start time and orientation/fit
//! transform, and the date stamp overlay schedule. Rendering itself is left to
//! a `CompositionRenderer`.

pub mod composer;
pub mod duration;
pub mod error;
pub mod overlay;
pub mod render;

pub use composer::{
    compose_plan, CompositionPlan, DateStamp, TimelineComposer, TimelineSegment,
    DEFAULT_DATE_STAMP_FORMAT,
};
pub use duration::format_duration;
pub use error::CompositionError;
pub use overlay::{Overlay, OverlayTiming};
pub use render::CompositionRenderer;
