//! Pure decision logic behind the operator console's OS-update button.
//!
//! This crate is free of I/O and holds the logic the rendering layer binds
//! to:
//! - Dotted version parsing and numeric segment comparison.
//! - "Latest available" derivation from the stable/beta release tracks,
//!   capped by the platform's upgrade-path ceiling.
//! - Classification of the required operator action.
//! - Button presentation, including download-progress labels.
//!
//! Everything here is a deterministic function of the bot snapshot and the
//! resolved [`UpdatePolicy`]; release data arrives via `furrow-releases`.

mod button;
mod progress;
mod state;
mod status;
mod version;

pub use button::{
    ButtonColor, ButtonPresentation, MIN_UPDATABLE_VERSION, TOO_OLD_MESSAGE, UpdateButtonView,
    button_presentation, update_button_view,
};
pub use progress::{JobProgress, JobStatus, ProgressUnit, download_progress, is_working};
pub use state::{
    BotState, FEATURE_API_OTA_RELEASES, Hardware, InformationalSettings, OS_OTA_JOB,
    OTA_CEILING_FALLBACK,
};
pub use status::{
    UpdatePolicy, UpdateStatus, beta_commits_differ, button_version_status, clamp_to_ceiling,
    installed_version, latest_available, update_status,
};
pub use version::{Version, VersionError, compare_versions};
