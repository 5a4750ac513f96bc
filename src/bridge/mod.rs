//! Message broker between the Control Surface and the page context.
//!
//! [`MessageChannel`] is what the Control Surface talks to. Two
//! implementations exist: [`LocalChannel`] calls a Looper in the same
//! process, [`WireChannel`] speaks line-delimited JSON over TCP to a
//! [`run_bridge_server`] hosting the page.
mod channel;
mod client;
mod io;
mod local;
mod server;
mod wire;

#[cfg(test)]
mod tests;

pub use channel::MessageChannel;
pub use client::WireChannel;
pub use local::LocalChannel;
pub use server::run_bridge_server;
pub use wire::WireMessage;
