//! Hardware abstraction traits
//!
//! These traits define the interface between the refresh loop and the
//! board-specific panel and network implementations.

pub mod display;
pub mod network;

pub use display::{Color, EpdDriver, Panel, Rotation};
pub use network::HttpSession;
