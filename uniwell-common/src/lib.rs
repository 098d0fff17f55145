//! # UniWell Common Library
//!
//! Shared code for the UniWell services including:
//! - Error taxonomy (`Error` enum)
//! - Configuration loading (CLI > env > TOML > default)
//! - SQLite pool initialization

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
