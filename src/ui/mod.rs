//! Terminal rendition of the Control Surface.
mod lifecycle;
mod model;
mod render;


pub use lifecycle::run_control_ui;
pub use model::{ControlApp, Focus, KeyOutcome};
pub use render::draw_control;
