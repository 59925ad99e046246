//! Shared application service layer for thermocycle.
//!
//! This crate gives front ends one entry point: an explicitly constructed
//! [`CycleEngine`] session that owns the calculation caches, plus helpers for
//! loading cycle input files.

pub mod engine;
pub mod error;
pub mod input_service;

pub use engine::{CycleEngine, EngineCacheStats, EngineOptions};
pub use error::{AppError, AppResult};
pub use input_service::{InputFormat, load_config, load_input, parse_input};
