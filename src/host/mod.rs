//! Interfaces to the page the Looper runs in.
//!
//! The Looper only talks to the page through [`HostPage`] and
//! [`VideoElement`]. `sim` provides a native stand-in with a ticking video
//! clock and autoplay-driven navigation.
mod page;
pub mod sim;
mod video;

pub use page::{HostPage, ToggleState};
pub use video::VideoElement;
