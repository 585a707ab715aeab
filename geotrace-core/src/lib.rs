//! # geotrace-core
//!
//! Core library for geotrace - a background location-telemetry agent.
//!
//! This library provides:
//! - The sampling/gating/upload pipeline behind a tracking session
//! - Domain types for fixes, cell records, and telemetry records
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! A running session is a pipeline per delivered fix:
//! - **Location Source:** consumes batched fixes from the platform feed
//! - **Admission gate:** drops the fix when the battery is below threshold
//! - **Cell Collector:** normalizes the radio's first reported cell, if any
//! - **Assembler:** combines fix, battery, and cell into one record
//! - **Uploader:** fire-and-forget dispatch to the remote collector
//!
//! ## Example
//!
//! ```rust,no_run
//! use geotrace_core::Config;
//!
//! // Load configuration and validate it before starting the agent;
//! // the pipeline itself assumes a valid session config.
//! let config = Config::load().expect("failed to load config");
//! config.agent.validate().expect("invalid agent config");
//! ```

// Re-export commonly used items at the crate root
pub use agent::{Agent, AgentState};
pub use config::{AgentConfig, Config};
pub use error::{Error, Result};
pub use types::{CellRecord, Fix, TelemetryRecord};

// Public modules
pub mod agent;
pub mod cell;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod platform;
pub mod power;
pub mod sample;
pub mod types;
pub mod upload;
