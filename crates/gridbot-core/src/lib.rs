//! Core types and utilities shared across the gridbot engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::BoardConfig;
pub use error::{Error, Result};
pub use types::*;
