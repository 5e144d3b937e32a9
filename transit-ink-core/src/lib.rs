//! Board-agnostic core logic for the transit-ink e-paper board
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (panel, panel driver, HTTP session)
//! - Settings parsing
//! - Line layout
//! - The refresh loop

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod layout;
pub mod refresh;
pub mod traits;

pub use refresh::{CycleError, RefreshConfig, RefreshStats, Refresher};
