//! Configuration module for dad-notes
//!
//! This module handles user preferences (asset limits, default content,
//! export naming), including serialization to/from JSON and persistent
//! storage in platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
