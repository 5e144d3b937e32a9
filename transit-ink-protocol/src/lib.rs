//! Departure board endpoint protocol
//!
//! This crate defines the contract between the e-paper board and the HTTP
//! endpoint that feeds it. The contract is deliberately small:
//!
//! ```text
//! board                                   endpoint
//!   │  GET <TRANSIT_ENDPOINT>                 │
//!   │ ──────────────────────────────────────▶ │
//!   │  200 OK                                 │
//!   │  ["Richmond", "3 min, 18 min", ...]     │
//!   │ ◀────────────────────────────────────── │
//! ```
//!
//! The body is a JSON array of UTF-8 strings, one per display line, in
//! top-to-bottom order. Any other status code or body shape is reported as a
//! [`ProtocolError`]; the board makes no distinction between them.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod error;
pub mod lines;
pub mod method;
pub mod response;

pub use error::{JsonErrorKind, ProtocolError};
pub use lines::{decode_lines, Lines};
pub use method::Method;
pub use response::{Response, STATUS_OK};
