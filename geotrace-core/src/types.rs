//! Core domain types for geotrace
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Fix** | One position observation delivered by the location provider |
//! | **CellRecord** | Normalized radio-cell metadata, one shape across technologies |
//! | **TelemetryRecord** | The combined, uploaded representation of a fix |
//! | **Session** | The interval between `start` and the following `stop` |
//!
//! A `TelemetryRecord` is transient: it is assembled per accepted fix,
//! handed to the uploader, and never persisted on the device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single position observation from the location provider.
///
/// `altitude` and `speed` are `None` when the provider genuinely omitted the
/// measurement, which is not the same thing as reporting zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Estimated horizontal accuracy in meters
    pub accuracy: f64,
    /// Altitude in meters, if the provider measured it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Ground speed in meters per second, if the provider measured it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// When the observation was made
    pub timestamp: DateTime<Utc>,
}

/// Normalized radio-cell metadata.
///
/// Identifiers are strings on the wire regardless of how the radio reports
/// them; signal strength stays an integer dBm value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Cell identifier
    pub cell_id: String,
    /// Location-area code (tracking area for LTE)
    pub lac: String,
    /// Mobile country code
    pub mcc: String,
    /// Mobile network code
    pub mnc: String,
    /// Signal strength in dBm
    pub signal_strength: i32,
}

/// The record dispatched to the collector for one accepted fix.
///
/// Serializes to the collector's expected body. Fields the platform did not
/// measure are omitted entirely rather than sent as null or zero. The
/// collector stamps records on receipt, so no timestamp travels with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Device identifier from the session configuration
    pub device_id: String,
    /// Position source tag
    pub source: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Estimated horizontal accuracy in meters
    pub accuracy: f64,
    /// Altitude in meters, when measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Ground speed in meters per second, when measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Battery percentage at sample time
    pub battery_level: u8,
    /// Signal strength of the reported cell, when one was captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<i32>,
    /// Zero or one normalized cell records
    pub cell_towers: Vec<CellRecord>,
}

/// Position source tag carried on every record.
pub const SOURCE_GPS: &str = "GPS";
