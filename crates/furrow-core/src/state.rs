use std::collections::HashMap;

use serde::Deserialize;

use crate::progress::JobProgress;

/// Job name the bot uses for over-the-air OS update downloads.
pub const OS_OTA_JOB: &str = "FBOS_OTA";

/// Feature key whose minimum-version entry supplies the upgrade-path ceiling.
pub const FEATURE_API_OTA_RELEASES: &str = "api_ota_releases";

/// Ceiling applied when the bot does not advertise one.
pub const OTA_CEILING_FALLBACK: &str = "6.4.0";

/// Versioning fields from the bot's informational settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InformationalSettings {
    #[serde(default)]
    pub controller_version: Option<String>,
    /// Commit hash of the installed OS build.
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub currently_on_beta: bool,
    /// Set by the bot itself when it already knows an update exists.
    #[serde(default)]
    pub update_available: bool,
    /// Platform identifier used to key release-server lookups.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hardware {
    #[serde(default)]
    pub informational_settings: InformationalSettings,
    #[serde(default)]
    pub jobs: HashMap<String, JobProgress>,
}

/// Console-side snapshot of the bot plus the release data fetched for it.
///
/// `current_os_version` holds whichever stable release the console last
/// learned about; when release data comes from the API it is overwritten by
/// the fetched version (or cleared when the fetch failed).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotState {
    #[serde(default)]
    pub hardware: Hardware,
    #[serde(default)]
    pub current_os_version: Option<String>,
    #[serde(default)]
    pub current_beta_os_version: Option<String>,
    #[serde(default)]
    pub current_beta_os_commit: Option<String>,
    /// Per-feature minimum OS versions advertised by the bot.
    #[serde(default)]
    pub min_os_feature_data: Option<HashMap<String, String>>,
}

impl BotState {
    /// Maximum release this bot's platform can be upgraded to in one step.
    #[must_use]
    pub fn ota_upgrade_ceiling(&self) -> &str {
        self.min_os_feature_data
            .as_ref()
            .and_then(|features| features.get(FEATURE_API_OTA_RELEASES))
            .map_or(OTA_CEILING_FALLBACK, String::as_str)
    }

    /// Progress of the OS update download, when one is running.
    #[must_use]
    pub fn os_update_job(&self) -> Option<&JobProgress> {
        self.hardware.jobs.get(OS_OTA_JOB)
    }

    /// Merge the outcome of a release-server lookup into the snapshot.
    pub fn record_fetched_release(&mut self, version: Option<String>) {
        self.current_os_version = version;
    }
}
