//! Host-side implementations of the collaborator interfaces the core
//! consumes.
//!
//! The consent flow and the persistent indicator are external surfaces.
//! This binary reduces them to what the pipeline actually needs: a grant
//! flag resolved before start, and a status signal rendered through the
//! log.

use geotrace_core::cell::{CellInfo, CellProbe};
use geotrace_core::platform::{Capability, PermissionProvider, StatusSurface};

/// Grants resolved once at startup, before the agent is constructed.
pub struct StaticPermissions {
    pub location: bool,
}

impl PermissionProvider for StaticPermissions {
    fn granted(&self, capability: Capability) -> bool {
        match capability {
            Capability::Location => self.location,
        }
    }
}

/// Status surface rendered as log lines while a session is running.
pub struct LogStatusSurface;

impl StatusSurface for LogStatusSurface {
    fn show(&self) {
        tracing::info!("location tracking active");
    }

    fn clear(&self) {
        tracing::info!("location tracking indicator cleared");
    }
}

/// Cell probe for hosts without a cellular modem: every scan is empty, so
/// samples go out without cell records.
pub struct NoCellProbe;

impl CellProbe for NoCellProbe {
    fn scan(&self) -> geotrace_core::Result<Vec<CellInfo>> {
        Ok(Vec::new())
    }
}
