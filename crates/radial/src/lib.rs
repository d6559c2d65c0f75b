pub mod config;
pub mod events;
pub mod gui;
pub mod sys;

pub use gui::slider::{Appearance, RadialSlider};
