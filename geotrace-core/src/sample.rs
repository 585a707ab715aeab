//! Assembles an admitted fix into the record the collector receives.

use crate::config::AgentConfig;
use crate::types::{CellRecord, Fix, TelemetryRecord, SOURCE_GPS};

/// Combine a fix, the battery level, and an optional cell record into one
/// telemetry record.
///
/// Pure and infallible: every field is a copy or a direct mapping. Altitude
/// and speed carry over only when the provider measured them; the cell
/// record's signal strength is mirrored into the top-level field.
pub fn assemble(
    fix: &Fix,
    battery_level: u8,
    cell: Option<CellRecord>,
    config: &AgentConfig,
) -> TelemetryRecord {
    TelemetryRecord {
        device_id: config.device_id.clone(),
        source: SOURCE_GPS.to_string(),
        latitude: fix.latitude,
        longitude: fix.longitude,
        accuracy: fix.accuracy,
        altitude: fix.altitude,
        speed: fix.speed,
        battery_level,
        signal_strength: cell.as_ref().map(|c| c.signal_strength),
        cell_towers: cell.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config() -> AgentConfig {
        AgentConfig {
            device_id: "field-unit-7".to_string(),
            server_url: "https://collector.example.com".to_string(),
            ..Default::default()
        }
    }

    fn fix() -> Fix {
        Fix {
            latitude: 47.3769,
            longitude: 8.5417,
            accuracy: 8.0,
            altitude: Some(408.0),
            speed: Some(2.5),
            timestamp: Utc::now(),
        }
    }

    fn cell() -> CellRecord {
        CellRecord {
            cell_id: "100".to_string(),
            lac: "200".to_string(),
            mcc: "310".to_string(),
            mnc: "410".to_string(),
            signal_strength: -80,
        }
    }

    #[test]
    fn test_assemble_copies_fix_fields() {
        let record = assemble(&fix(), 73, Some(cell()), &config());

        assert_eq!(record.device_id, "field-unit-7");
        assert_eq!(record.source, "GPS");
        assert_eq!(record.latitude, 47.3769);
        assert_eq!(record.longitude, 8.5417);
        assert_eq!(record.accuracy, 8.0);
        assert_eq!(record.altitude, Some(408.0));
        assert_eq!(record.speed, Some(2.5));
        assert_eq!(record.battery_level, 73);
    }

    #[test]
    fn test_assemble_mirrors_cell_signal() {
        let record = assemble(&fix(), 73, Some(cell()), &config());
        assert_eq!(record.signal_strength, Some(-80));
        assert_eq!(record.cell_towers, vec![cell()]);
    }

    #[test]
    fn test_assemble_without_cell() {
        let record = assemble(&fix(), 73, None, &config());
        assert_eq!(record.signal_strength, None);
        assert!(record.cell_towers.is_empty());
    }

    #[test]
    fn test_absent_measurements_stay_absent() {
        let fix = Fix {
            altitude: None,
            speed: None,
            ..fix()
        };
        let record = assemble(&fix, 73, None, &config());
        assert_eq!(record.altitude, None);
        assert_eq!(record.speed, None);
    }
}
