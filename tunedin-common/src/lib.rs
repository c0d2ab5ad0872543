//! # TunedIn Common Library
//!
//! Shared code for the TunedIn crates:
//! - Configuration loading (TOML + environment)
//! - Common error type
//! - Timestamp and identifier helpers

pub mod config;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
