mod frame;
mod terminal;
mod theme;

pub use frame::draw_control;
pub(super) use terminal::{TerminalGuard, setup_terminal};
