use log::{debug, error};
use serde::Deserialize;

use furrow_core::UpdatePolicy;

use crate::error::ReleaseError;

/// Sentinel the bot reports while its platform target is still unknown.
pub const UNKNOWN_TARGET: &str = "---";

/// Release-server response for a platform lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OsRelease {
    pub version: String,
}

/// Payload of the status event merged into console state after a release
/// lookup. A failed lookup carries no version, which downstream
/// classification renders as "can't connect to release server".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsUpdateInfo {
    pub version: Option<String>,
}

/// HTTP client for the OS release server.
///
/// The base URL is supplied at construction rather than read from module
/// state, so tests and multi-server setups can point instances wherever
/// they need.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReleaseClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    fn release_url(&self, platform: &str) -> String {
        format!("{}{platform}", self.base_url)
    }

    /// Fetch the latest release published for the bot's platform.
    ///
    /// # Errors
    /// Returns [`ReleaseError::MissingPlatform`] when the target is absent
    /// or still the unknown-target sentinel, [`ReleaseError::NotFound`] when
    /// the server has no release for the platform, and request/parse errors
    /// otherwise.
    pub async fn fetch_release(&self, target: Option<&str>) -> Result<OsRelease, ReleaseError> {
        let platform = target
            .filter(|target| *target != UNKNOWN_TARGET)
            .ok_or(ReleaseError::MissingPlatform)?;

        let url = self.release_url(platform);
        debug!("Fetching OS release information from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ReleaseError::Request)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ReleaseError::NotFound);
        }
        if !status.is_success() {
            return Err(ReleaseError::Http { status });
        }

        response.json().await.map_err(ReleaseError::Parse)
    }

    /// Fetch release information and fold any failure into the status event.
    ///
    /// Returns `None` when the policy sources releases from the bot instead
    /// of the API, mirroring a lookup that was never started. Failures are
    /// logged and collapse to an event with no version; they never surface
    /// to the rendering layer.
    pub async fn fetch_os_update_info(
        &self,
        policy: &UpdatePolicy,
        target: Option<&str>,
    ) -> Option<OsUpdateInfo> {
        if !policy.api_ota_releases {
            return None;
        }

        match self.fetch_release(target).await {
            Ok(release) => Some(OsUpdateInfo {
                version: Some(release.version),
            }),
            Err(fetch_error) => {
                if matches!(fetch_error, ReleaseError::NotFound) {
                    error!("No releases found for platform and channel.");
                }
                error!("Could not download OS update information: {fetch_error}");
                Some(OsUpdateInfo::default())
            }
        }
    }
}
