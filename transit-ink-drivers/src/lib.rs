//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in transit-ink-core for the board's hardware:
//!
//! - E-paper controllers (IL0373 tri-color)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod epd;
