//! Core library for the `ytloop` CLI.
//!
//! The Looper state machine keeps a video restarting at a chosen timestamp
//! on a single-page video site. Around it sit the command protocol, loop
//! persistence, a simulated watch page, a TCP bridge standing in for the
//! browser's message broker and a terminal control surface. The primary
//! user-facing interface is the `ytloop` command-line application; library
//! APIs may evolve as the CLI grows.
pub mod args;
pub mod bridge;
pub mod config;
pub mod control;
pub mod entry;
pub mod error;
pub mod host;
pub mod looper;
pub mod protocol;
pub mod retry;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod storage;
mod system;
pub mod ui;
pub mod video;

#[cfg(test)]
mod test_support;
