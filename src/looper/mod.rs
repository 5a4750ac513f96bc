//! The page-context state machine that keeps a video looping.
//!
//! [`Looper`] is a pure state machine: it consumes [`LooperEvent`]s and
//! requests, mutates its [`LoopState`] and returns [`LooperEffect`]s. The
//! runtime owns one instance on a single task and carries the effects out
//! (timers, storage, resume), feeding their outcomes back as events.
mod autoplay;
mod event;
mod machine;
mod runtime;
mod state;
mod timing;


pub use autoplay::suppress_autoplay;
pub use event::{LooperEffect, LooperEvent, LooperTimer};
pub use machine::Looper;
pub use runtime::{LooperHandle, spawn_looper};
pub use state::{LoopState, LooperPhase};
pub use timing::LooperTiming;

pub const LOOP_DISABLED_NOTICE: &str = "Loop disabled";
