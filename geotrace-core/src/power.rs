//! Battery level readings for the admission gate.
//!
//! The gate only needs a percentage, read synchronously on every fix. The
//! trait is infallible: platforms that cannot report a level degrade to a
//! full battery rather than failing the pipeline.

use std::path::{Path, PathBuf};

/// Root of the kernel's power-supply class.
const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Reads the current battery charge level.
pub trait PowerMonitor: Send + Sync {
    /// Current charge level as a percentage in [0, 100]. Never fails.
    fn level(&self) -> u8;

    /// Whether the charge level is below `threshold`.
    fn is_low(&self, threshold: u8) -> bool {
        self.level() < threshold
    }
}

/// Battery monitor backed by `/sys/class/power_supply/*/capacity`.
///
/// On hosts without a battery (or inside a container) the capacity file is
/// missing; readings degrade to 100 so the admission gate stays open.
pub struct SysfsPowerMonitor {
    capacity_path: Option<PathBuf>,
}

impl SysfsPowerMonitor {
    /// Discover the first power supply that reports a capacity.
    pub fn discover() -> Self {
        Self::discover_in(Path::new(POWER_SUPPLY_ROOT))
    }

    /// Discover within a specific sysfs root.
    pub(crate) fn discover_in(root: &Path) -> Self {
        let capacity_path = std::fs::read_dir(root)
            .ok()
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path().join("capacity"))
            .find(|p| p.is_file());

        if capacity_path.is_none() {
            tracing::debug!(
                root = %root.display(),
                "no battery capacity found, power readings degrade to 100"
            );
        }

        Self { capacity_path }
    }

    /// Monitor a specific capacity file directly.
    pub fn with_capacity_path(path: PathBuf) -> Self {
        Self {
            capacity_path: Some(path),
        }
    }

    fn read_capacity(path: &Path) -> Option<u8> {
        let content = std::fs::read_to_string(path).ok()?;
        content.trim().parse::<u8>().ok()
    }
}

impl PowerMonitor for SysfsPowerMonitor {
    fn level(&self) -> u8 {
        self.capacity_path
            .as_deref()
            .and_then(Self::read_capacity)
            .unwrap_or(100)
            .min(100)
    }
}
