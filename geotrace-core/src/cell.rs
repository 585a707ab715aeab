//! Cellular-radio metadata collection and normalization.
//!
//! The radio reports technology-specific cell info; the collector flattens
//! whatever it sees into one [`CellRecord`] shape. Each technology names the
//! same logical fields differently (LTE has a cell identity and a tracking
//! area code where GSM and WCDMA have a cell id and a location area code),
//! so normalization is one mapping per variant. Adding a technology means
//! adding a variant and its mapping arm, nothing else.
//!
//! Collection never raises: a missing grant, a failed radio query, or an
//! empty cell-info list all degrade the sample to "no cell record".

use std::sync::Arc;

use crate::error::Result;
use crate::platform::{Capability, PermissionProvider};
use crate::types::CellRecord;

/// A raw cell-info entry as reported by the radio, one variant per
/// supported technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellInfo {
    Lte {
        /// Cell identity (CI)
        cell_identity: i64,
        /// Tracking area code (TAC)
        tracking_area: i32,
        mcc: String,
        mnc: String,
        /// Signal strength in dBm
        dbm: i32,
    },
    Gsm {
        /// Cell id (CID)
        cell_id: i64,
        /// Location area code (LAC)
        location_area: i32,
        mcc: String,
        mnc: String,
        dbm: i32,
    },
    Wcdma {
        /// Cell id (CID)
        cell_id: i64,
        /// Location area code (LAC)
        location_area: i32,
        mcc: String,
        mnc: String,
        dbm: i32,
    },
}

impl CellInfo {
    /// Flatten this entry into the technology-independent wire shape.
    pub fn normalize(&self) -> CellRecord {
        match self {
            CellInfo::Lte {
                cell_identity,
                tracking_area,
                mcc,
                mnc,
                dbm,
            } => CellRecord {
                cell_id: cell_identity.to_string(),
                lac: tracking_area.to_string(),
                mcc: mcc.clone(),
                mnc: mnc.clone(),
                signal_strength: *dbm,
            },
            CellInfo::Gsm {
                cell_id,
                location_area,
                mcc,
                mnc,
                dbm,
            }
            | CellInfo::Wcdma {
                cell_id,
                location_area,
                mcc,
                mnc,
                dbm,
            } => CellRecord {
                cell_id: cell_id.to_string(),
                lac: location_area.to_string(),
                mcc: mcc.clone(),
                mnc: mnc.clone(),
                signal_strength: *dbm,
            },
        }
    }
}

/// Queries the radio for its current cell-info list.
///
/// The platform seam: host binaries wrap the actual modem interface, tests
/// script the returned entries.
pub trait CellProbe: Send + Sync {
    fn scan(&self) -> Result<Vec<CellInfo>>;
}

/// Collects at most one normalized cell record per sample.
pub struct CellCollector {
    probe: Arc<dyn CellProbe>,
    permissions: Arc<dyn PermissionProvider>,
}

impl CellCollector {
    pub fn new(probe: Arc<dyn CellProbe>, permissions: Arc<dyn PermissionProvider>) -> Self {
        Self { probe, permissions }
    }

    /// Query the radio and normalize the first reported entry.
    ///
    /// Returns `None` when the location grant is absent, the query fails,
    /// or the radio reports no cells. Query failures are logged and
    /// swallowed; the caller never sees an error.
    pub fn collect(&self) -> Option<CellRecord> {
        if !self.permissions.granted(Capability::Location) {
            return None;
        }

        let cells = match self.probe.scan() {
            Ok(cells) => cells,
            Err(e) => {
                tracing::warn!(error = %e, "cell-info query failed");
                return None;
            }
        };

        cells.first().map(CellInfo::normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct ScriptedProbe(std::sync::Mutex<Option<Result<Vec<CellInfo>>>>);

    impl ScriptedProbe {
        fn returning(result: Result<Vec<CellInfo>>) -> Arc<Self> {
            Arc::new(Self(std::sync::Mutex::new(Some(result))))
        }
    }

    impl CellProbe for ScriptedProbe {
        fn scan(&self) -> Result<Vec<CellInfo>> {
            self.0
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    struct Granted(bool);

    impl PermissionProvider for Granted {
        fn granted(&self, _capability: Capability) -> bool {
            self.0
        }
    }

    fn lte_entry() -> CellInfo {
        CellInfo::Lte {
            cell_identity: 100,
            tracking_area: 200,
            mcc: "310".to_string(),
            mnc: "410".to_string(),
            dbm: -80,
        }
    }

    fn expected_record() -> CellRecord {
        CellRecord {
            cell_id: "100".to_string(),
            lac: "200".to_string(),
            mcc: "310".to_string(),
            mnc: "410".to_string(),
            signal_strength: -80,
        }
    }

    #[test]
    fn test_normalize_lte() {
        assert_eq!(lte_entry().normalize(), expected_record());
    }

    #[test]
    fn test_normalize_gsm() {
        let entry = CellInfo::Gsm {
            cell_id: 100,
            location_area: 200,
            mcc: "310".to_string(),
            mnc: "410".to_string(),
            dbm: -80,
        };
        assert_eq!(entry.normalize(), expected_record());
    }

    #[test]
    fn test_normalize_wcdma() {
        let entry = CellInfo::Wcdma {
            cell_id: 100,
            location_area: 200,
            mcc: "310".to_string(),
            mnc: "410".to_string(),
            dbm: -80,
        };
        assert_eq!(entry.normalize(), expected_record());
    }

    #[test]
    fn test_collect_takes_first_entry() {
        let second = CellInfo::Gsm {
            cell_id: 999,
            location_area: 1,
            mcc: "262".to_string(),
            mnc: "02".to_string(),
            dbm: -60,
        };
        let probe = ScriptedProbe::returning(Ok(vec![lte_entry(), second]));
        let collector = CellCollector::new(probe, Arc::new(Granted(true)));

        assert_eq!(collector.collect(), Some(expected_record()));
    }

    #[test]
    fn test_collect_empty_scan_is_none() {
        let probe = ScriptedProbe::returning(Ok(vec![]));
        let collector = CellCollector::new(probe, Arc::new(Granted(true)));
        assert_eq!(collector.collect(), None);
    }

    #[test]
    fn test_collect_swallows_query_failure() {
        let probe = ScriptedProbe::returning(Err(Error::Feed("radio unavailable".to_string())));
        let collector = CellCollector::new(probe, Arc::new(Granted(true)));
        assert_eq!(collector.collect(), None);
    }

    #[test]
    fn test_collect_without_grant_is_none() {
        let probe = ScriptedProbe::returning(Ok(vec![lte_entry()]));
        let collector = CellCollector::new(probe, Arc::new(Granted(false)));
        assert_eq!(collector.collect(), None);
    }
}
