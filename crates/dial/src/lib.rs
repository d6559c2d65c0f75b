//! Toolkit-independent core of a circular slider control.
//!
//! The value lives in [`SliderState`]; [`Slider`] adds pointer tracking over a
//! ring [`Layout`] and animated display transitions. Hosts feed pointer events
//! and clock readings in, and deliver the returned [`ValueChanged`]
//! notifications to their [`Listeners`].

pub mod geometry;
pub mod listeners;
pub mod range;
pub mod slider;
pub mod state;
pub mod transition;

pub use geometry::{Hit, Layout, Metrics, Point};
pub use listeners::{ListenerId, Listeners};
pub use range::ValueRange;
pub use slider::{PointerAction, Slider};
pub use state::{ChangeSource, SliderState, Tracking, ValueChanged};
pub use transition::{AnimationConfig, Animator, Easing, Transition};
