//! Simulated watch page used by `serve`, `demo` and the tests.
mod page;
mod player;
mod video;


pub use page::SimPage;
pub use player::{SimPlayerConfig, SimVideoSpec, spawn_sim_player};
pub use video::{SimVideo, TickOutcome};
