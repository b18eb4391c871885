use std::cmp::Ordering;

use crate::button::{ButtonPresentation, button_presentation};
use crate::state::BotState;
use crate::version::{Version, compare_versions};

/// Action required of the operator, derived from release and bot data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    NeedsUpdate,
    NeedsDowngrade,
    /// Release data is missing or malformed.
    Unknown,
    /// The bot has never reported an installed version.
    None,
}

/// Update-channel and capability settings, resolved once at startup.
///
/// `api_ota_releases` means the release server is the source of truth for
/// available versions; the bot's own advertised release tracks are ignored
/// and downgrades to the served version are allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatePolicy {
    pub beta_opt_in: bool,
    pub api_ota_releases: bool,
}

impl UpdatePolicy {
    /// Derive the policy from the configured update channel name.
    #[must_use]
    pub fn from_update_channel(channel: &str, api_ota_releases: bool) -> Self {
        Self {
            beta_opt_in: channel != "stable",
            api_ota_releases,
        }
    }
}

fn parse(version: Option<&str>) -> Option<Version> {
    version.and_then(|version| version.parse().ok())
}

/// Newest release available from the stable and beta tracks.
///
/// Opting out of beta always yields the stable track. Ties and an
/// unparseable beta version favor stable.
#[must_use]
pub fn latest_available(
    stable: Option<&str>,
    beta: Option<&str>,
    beta_opt_in: bool,
) -> Option<String> {
    if !beta_opt_in {
        return stable.map(str::to_owned);
    }
    match (parse(stable), parse(beta)) {
        (Some(stable_version), Some(beta_version)) if beta_version > stable_version => {
            beta.map(str::to_owned)
        }
        (None, Some(_)) => beta.map(str::to_owned),
        _ => stable.map(str::to_owned),
    }
}

/// Cap `latest` at the platform's upgrade-path ceiling.
///
/// Identity when release data comes from the API (`ignore_bot`) or when
/// there is no candidate to clamp.
#[must_use]
pub fn clamp_to_ceiling(
    latest: Option<&str>,
    ceiling: &str,
    ignore_bot: bool,
) -> Option<String> {
    if ignore_bot {
        return latest.map(str::to_owned);
    }
    let latest = latest?;
    match (parse(Some(latest)), parse(Some(ceiling))) {
        (Some(latest_version), Some(ceiling_version)) if latest_version > ceiling_version => {
            Some(ceiling.to_owned())
        }
        _ => Some(latest.to_owned()),
    }
}

/// Normalize the version string the bot reports as installed.
///
/// A version already carrying a beta marker passes through unchanged;
/// otherwise a `-beta` suffix is appended when the bot runs the beta
/// channel, so it lines up with the beta track's version labels.
#[must_use]
pub fn installed_version(raw: Option<&str>, currently_on_beta: bool) -> Option<String> {
    let raw = raw?;
    if raw.contains("beta") {
        return Some(raw.to_owned());
    }
    if currently_on_beta {
        Some(format!("{raw}-beta"))
    } else {
        Some(raw.to_owned())
    }
}

/// Classify the action required given a candidate release and the installed
/// version. Total: malformed inputs degrade to [`UpdateStatus::Unknown`]
/// rather than erroring.
#[must_use]
pub fn update_status(
    candidate: Option<&str>,
    installed: Option<&str>,
    allow_downgrades: bool,
) -> UpdateStatus {
    let Some(installed) = installed else {
        return UpdateStatus::None;
    };
    let Some(candidate) = candidate else {
        return if allow_downgrades {
            UpdateStatus::UpToDate
        } else {
            UpdateStatus::Unknown
        };
    };

    match compare_versions(candidate, installed) {
        Ok(Ordering::Greater) => UpdateStatus::NeedsUpdate,
        Ok(Ordering::Less | Ordering::Equal) => {
            if allow_downgrades {
                UpdateStatus::NeedsDowngrade
            } else {
                UpdateStatus::UpToDate
            }
        }
        Err(_) => UpdateStatus::Unknown,
    }
}

/// Equal-version beta builds are told apart by commit hash; a differing
/// hash means the installed beta is stale.
#[must_use]
pub fn beta_commits_differ(
    installed_commit: Option<&str>,
    beta_release_commit: Option<&str>,
) -> bool {
    matches!(
        (installed_commit, beta_release_commit),
        (Some(installed), Some(release)) if installed != release
    )
}

fn equal_to_latest(latest: Option<&str>, installed: Option<&str>) -> bool {
    match (latest, installed) {
        (Some(latest), Some(installed)) => {
            matches!(compare_versions(installed, latest), Ok(Ordering::Equal))
        }
        _ => false,
    }
}

/// Full derivation of the update button's release-status presentation.
///
/// Picks the latest release from the tracks the policy allows, clamps it to
/// the upgrade-path ceiling, normalizes the installed version, classifies,
/// and then applies two overrides that force an update offer: the bot's own
/// `update_available` flag, and an installed beta whose version matches the
/// beta track but whose commit is stale.
#[must_use]
pub fn button_version_status(bot: &BotState, policy: &UpdatePolicy) -> ButtonPresentation {
    let info = &bot.hardware.informational_settings;
    let ignore_bot = policy.api_ota_releases;
    let beta_selected = !ignore_bot && policy.beta_opt_in;
    let on_beta = !ignore_bot && info.currently_on_beta;

    let latest = latest_available(
        bot.current_os_version.as_deref(),
        bot.current_beta_os_version.as_deref(),
        beta_selected,
    );
    let latest = clamp_to_ceiling(latest.as_deref(), bot.ota_upgrade_ceiling(), ignore_bot);
    let installed = installed_version(info.controller_version.as_deref(), on_beta);
    let status = update_status(latest.as_deref(), installed.as_deref(), ignore_bot);

    // An installed beta can match the beta track's version yet predate its
    // current build; only the commit hash tells them apart.
    let uncertain = status == UpdateStatus::UpToDate
        && equal_to_latest(latest.as_deref(), installed.as_deref())
        && beta_selected;
    let stale_beta = latest.as_deref() == bot.current_beta_os_version.as_deref()
        && beta_commits_differ(info.commit.as_deref(), bot.current_beta_os_commit.as_deref());

    let force_update = (!ignore_bot && info.update_available) || (uncertain && stale_beta);
    let status = if force_update {
        UpdateStatus::NeedsUpdate
    } else {
        status
    };

    button_presentation(status, latest.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::ButtonColor;
    use crate::state::{Hardware, InformationalSettings};

    #[test]
    fn stable_track_wins_without_beta_opt_in() {
        assert_eq!(
            latest_available(Some("5.0.0"), None, true).as_deref(),
            Some("5.0.0")
        );
        assert_eq!(
            latest_available(Some("6.4.0"), Some("6.5.0-beta"), false).as_deref(),
            Some("6.4.0")
        );
    }

    #[test]
    fn beta_track_wins_only_when_strictly_newer() {
        assert_eq!(
            latest_available(Some("6.4.0"), Some("6.5.0-beta"), true).as_deref(),
            Some("6.5.0-beta")
        );
        // Ties favor stable: the tag is informational.
        assert_eq!(
            latest_available(Some("6.4.0"), Some("6.4.0-beta"), true).as_deref(),
            Some("6.4.0")
        );
        assert_eq!(
            latest_available(None, Some("6.5.0-beta"), true).as_deref(),
            Some("6.5.0-beta")
        );
        assert_eq!(
            latest_available(Some("6.4.0"), Some("not-a-version"), true).as_deref(),
            Some("6.4.0")
        );
    }

    #[test]
    fn ceiling_caps_the_candidate() {
        assert_eq!(
            clamp_to_ceiling(Some("7.0.0"), "6.5.0", false).as_deref(),
            Some("6.5.0")
        );
        assert_eq!(
            clamp_to_ceiling(Some("6.4.0"), "6.5.0", false).as_deref(),
            Some("6.4.0")
        );
        assert_eq!(
            clamp_to_ceiling(Some("7.0.0"), "6.5.0", true).as_deref(),
            Some("7.0.0")
        );
        assert_eq!(clamp_to_ceiling(None, "6.5.0", false), None);
    }

    #[test]
    fn installed_version_normalizes_beta_markers() {
        assert_eq!(installed_version(None, true), None);
        assert_eq!(
            installed_version(Some("6.4.2"), false).as_deref(),
            Some("6.4.2")
        );
        assert_eq!(
            installed_version(Some("6.4.2"), true).as_deref(),
            Some("6.4.2-beta")
        );
        assert_eq!(
            installed_version(Some("6.4.2-beta"), true).as_deref(),
            Some("6.4.2-beta")
        );
    }

    #[test]
    fn classification_matches_required_action() {
        assert_eq!(
            update_status(Some("6.2.0"), Some("6.1.0"), false),
            UpdateStatus::NeedsUpdate
        );
        assert_eq!(
            update_status(Some("6.1.0"), Some("6.1.0"), false),
            UpdateStatus::UpToDate
        );
        assert_eq!(
            update_status(Some("6.1.0"), Some("6.1.0"), true),
            UpdateStatus::NeedsDowngrade
        );
        assert_eq!(
            update_status(Some("6.0.0"), Some("6.1.0"), true),
            UpdateStatus::NeedsDowngrade
        );
    }

    #[test]
    fn missing_inputs_classify_without_erroring() {
        assert_eq!(update_status(Some("6.1.0"), None, false), UpdateStatus::None);
        assert_eq!(
            update_status(None, Some("5.0.0"), false),
            UpdateStatus::Unknown
        );
        assert_eq!(
            update_status(None, Some("5.0.0"), true),
            UpdateStatus::UpToDate
        );
        assert_eq!(
            update_status(Some("garbage"), Some("5.0.0"), false),
            UpdateStatus::Unknown
        );
    }

    #[test]
    fn commit_hashes_distinguish_equal_betas() {
        assert!(beta_commits_differ(Some("abc"), Some("def")));
        assert!(!beta_commits_differ(Some("abc"), Some("abc")));
        assert!(!beta_commits_differ(None, Some("abc")));
        assert!(!beta_commits_differ(Some("abc"), None));
    }

    fn bot(installed: &str) -> BotState {
        BotState {
            hardware: Hardware {
                informational_settings: InformationalSettings {
                    controller_version: Some(installed.to_string()),
                    ..InformationalSettings::default()
                },
                ..Hardware::default()
            },
            current_os_version: Some("6.4.0".to_string()),
            ..BotState::default()
        }
    }

    #[test]
    fn derivation_offers_update_when_behind() {
        let presentation = button_version_status(&bot("6.3.0"), &UpdatePolicy::default());
        assert_eq!(presentation.color, ButtonColor::Green);
        assert_eq!(presentation.text, "UPDATE TO 6.4.0");
    }

    #[test]
    fn derivation_reports_up_to_date() {
        let presentation = button_version_status(&bot("6.4.0"), &UpdatePolicy::default());
        assert_eq!(presentation.color, ButtonColor::Gray);
        assert_eq!(presentation.text, "UP TO DATE");
    }

    #[test]
    fn bot_update_available_flag_forces_an_update_offer() {
        let mut state = bot("6.4.0");
        state
            .hardware
            .informational_settings
            .update_available = true;
        let presentation = button_version_status(&state, &UpdatePolicy::default());
        assert_eq!(presentation.text, "UPDATE TO 6.4.0");
    }

    #[test]
    fn stale_beta_commit_forces_an_update_offer() {
        let mut state = bot("6.4.0-beta");
        state.current_os_version = None;
        state.current_beta_os_version = Some("6.4.0-beta".to_string());
        state.current_beta_os_commit = Some("new-commit".to_string());
        state.hardware.informational_settings.commit = Some("old-commit".to_string());
        state.hardware.informational_settings.currently_on_beta = true;

        let policy = UpdatePolicy {
            beta_opt_in: true,
            api_ota_releases: false,
        };
        let presentation = button_version_status(&state, &policy);
        assert_eq!(presentation.color, ButtonColor::Green);
        assert_eq!(presentation.text, "UPDATE TO 6.4.0-beta");
    }

    #[test]
    fn matching_beta_commit_stays_up_to_date() {
        let mut state = bot("6.4.0-beta");
        state.current_os_version = None;
        state.current_beta_os_version = Some("6.4.0-beta".to_string());
        state.current_beta_os_commit = Some("same".to_string());
        state.hardware.informational_settings.commit = Some("same".to_string());
        state.hardware.informational_settings.currently_on_beta = true;

        let policy = UpdatePolicy {
            beta_opt_in: true,
            api_ota_releases: false,
        };
        let presentation = button_version_status(&state, &policy);
        assert_eq!(presentation.text, "UP TO DATE");
    }

    #[test]
    fn api_releases_allow_downgrades_to_the_served_version() {
        let mut state = bot("6.5.0");
        state.record_fetched_release(Some("6.4.0".to_string()));
        let policy = UpdatePolicy {
            beta_opt_in: false,
            api_ota_releases: true,
        };
        let presentation = button_version_status(&state, &policy);
        assert_eq!(presentation.text, "DOWNGRADE TO 6.4.0");
    }

    #[test]
    fn ceiling_limits_the_offered_release() {
        let mut state = bot("6.3.0");
        state.current_os_version = Some("7.0.0".to_string());
        state.min_os_feature_data = Some(
            [("api_ota_releases".to_string(), "6.5.0".to_string())]
                .into_iter()
                .collect(),
        );
        let presentation = button_version_status(&state, &UpdatePolicy::default());
        assert_eq!(presentation.text, "UPDATE TO 6.5.0");
    }

    #[test]
    fn policy_derives_beta_opt_in_from_channel() {
        assert!(!UpdatePolicy::from_update_channel("stable", false).beta_opt_in);
        assert!(UpdatePolicy::from_update_channel("beta", false).beta_opt_in);
    }
}
