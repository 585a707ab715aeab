//! Replay fix feed: drives the agent from a JSON Lines trace of fixes.
//!
//! Stands in for the platform's fused location provider on hosts without
//! positioning hardware. Each line of the trace is one fix; the feed
//! delivers them at the requested cadence and re-stamps them at delivery
//! time, the way a live provider would report current observations.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use geotrace_core::location::{FeedRequest, FixFeed};
use geotrace_core::types::Fix;

#[derive(Debug)]
pub struct ReplayFeed {
    fixes: Vec<Fix>,
}

impl ReplayFeed {
    /// Load a trace file, one JSON-encoded fix per line. Blank lines are
    /// allowed; malformed lines are not.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fix trace {:?}", path))?;

        let mut fixes = Vec::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fix: Fix = serde_json::from_str(line)
                .with_context(|| format!("invalid fix on line {} of {:?}", number + 1, path))?;
            fixes.push(fix);
        }

        tracing::info!(count = fixes.len(), path = %path.display(), "loaded fix trace");
        Ok(Self { fixes })
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

impl FixFeed for ReplayFeed {
    fn open(&self, request: FeedRequest) -> geotrace_core::Result<mpsc::Receiver<Vec<Fix>>> {
        let (tx, rx) = mpsc::channel(8);
        let fixes = self.fixes.clone();
        let interval = request.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            for mut fix in fixes {
                ticker.tick().await;
                fix.timestamp = chrono::Utc::now();
                if tx.send(vec![fix]).await.is_err() {
                    // Subscriber went away; end the replay.
                    return;
                }
            }
            tracing::info!("fix trace exhausted");
        });

        Ok(rx)
    }
}
