//! Board configuration
//!
//! Settings are plain text embedded in the firmware image and parsed once at
//! startup.

pub mod parser;
pub mod settings;

pub use settings::*;
