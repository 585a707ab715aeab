//! Fire-and-forget record dispatch to the collector.
//!
//! Every dispatch is one independent task: the pipeline hands a record over
//! and immediately moves on. Failures are logged and the record is lost:
//! there is no retry, no queue, and no per-request timeout. Stopping the
//! agent abandons whatever is still in flight.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::config::AgentConfig;
use crate::error::{Error, Result};
use crate::types::TelemetryRecord;

/// Path the collector ingests location updates on, relative to the
/// configured base URL.
const UPDATE_PATH: &str = "/api/location/update";

/// Accepts records for asynchronous dispatch.
///
/// `dispatch` must return promptly; implementations own whatever happens to
/// the record afterwards. The trait is the seam the lifecycle tests inject
/// recording sinks through.
pub trait UploadSink: Send + Sync {
    fn dispatch(&self, record: TelemetryRecord);
}

/// Uploads records to the configured collector endpoint over HTTP.
pub struct HttpUploader {
    client: reqwest::Client,
    url: Arc<str>,
}

impl HttpUploader {
    /// Build an uploader for the session's endpoint.
    ///
    /// Construction can fail (client setup); sending cannot. Transport
    /// errors surface only in the log.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        let url = format!(
            "{}{}",
            config.server_url.trim_end_matches('/'),
            UPDATE_PATH
        );

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The resolved endpoint URL records are posted to.
    pub fn endpoint(&self) -> &str {
        &self.url
    }
}

impl UploadSink for HttpUploader {
    fn dispatch(&self, record: TelemetryRecord) {
        let client = self.client.clone();
        let url = self.url.clone();

        tokio::spawn(async move {
            match client.post(url.as_ref()).json(&record).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(device_id = %record.device_id, "telemetry accepted");
                }
                Ok(response) => {
                    tracing::warn!(
                        status = %response.status(),
                        device_id = %record.device_id,
                        "collector rejected telemetry"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        device_id = %record.device_id,
                        "telemetry upload failed"
                    );
                }
            }
        });
    }
}
