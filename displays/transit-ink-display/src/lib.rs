//! Framebuffer and text rendering for the transit-ink e-paper panel
//!
//! This crate provides:
//! - `TriColor` pixel color for `embedded-graphics`
//! - `FrameBuffer`: the two packed bit planes of a 128x296 tri-color panel,
//!   with rotation and clipping
//! - Scaled 5x8 bitmap text
//! - `EpdPanel`: a [`Panel`](transit_ink_core::traits::Panel) that draws into
//!   a `FrameBuffer` and pushes it through any
//!   [`EpdDriver`](transit_ink_core::traits::EpdDriver)
//!
//! # Architecture
//!
//! Drawing never touches the bus. Only [`EpdPanel`]'s `display()` hands the
//! planes to the controller driver, so everything here is testable on the
//! host.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod color;
pub mod panel;
pub mod text;

// Re-export key types
pub use buffer::{FrameBuffer, NATIVE_HEIGHT, NATIVE_WIDTH, PLANE_LEN};
pub use color::TriColor;
pub use panel::EpdPanel;
pub use text::draw_text;
