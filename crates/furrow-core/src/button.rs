use std::cmp::Ordering;

use crate::progress::{download_progress, is_working};
use crate::state::BotState;
use crate::status::{UpdatePolicy, UpdateStatus, button_version_status};
use crate::version::compare_versions;

/// Oldest release that still supports over-the-air updates.
pub const MIN_UPDATABLE_VERSION: &str = "6.0.0";

pub const TOO_OLD_MESSAGE: &str =
    "Installed OS version is too old to update over the air. Please re-flash the SD card.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonColor {
    Green,
    Gray,
    Yellow,
}

/// Color, label, and hover text for the update button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPresentation {
    pub color: ButtonColor,
    pub text: String,
    pub hover_text: Option<String>,
}

/// Map an update status to the button's color and text.
///
/// The hover label is the candidate release's version string; update and
/// downgrade offers interpolate it into the label.
#[must_use]
pub fn button_presentation(
    status: UpdateStatus,
    hover_label: Option<&str>,
) -> ButtonPresentation {
    match status {
        UpdateStatus::NeedsUpdate => {
            let text = hover_label
                .map_or_else(|| "UPDATE".to_owned(), |label| format!("UPDATE TO {label}"));
            ButtonPresentation {
                color: ButtonColor::Green,
                hover_text: Some(text.clone()),
                text,
            }
        }
        UpdateStatus::NeedsDowngrade => {
            let text = format!("DOWNGRADE TO {}", hover_label.unwrap_or_default());
            ButtonPresentation {
                color: ButtonColor::Green,
                hover_text: Some(text.clone()),
                text,
            }
        }
        UpdateStatus::UpToDate => ButtonPresentation {
            color: ButtonColor::Gray,
            text: "UP TO DATE".to_owned(),
            hover_text: hover_label.map(str::to_owned),
        },
        UpdateStatus::Unknown => ButtonPresentation {
            color: ButtonColor::Yellow,
            text: "Can't connect to release server".to_owned(),
            hover_text: hover_label.map(str::to_owned),
        },
        UpdateStatus::None => ButtonPresentation {
            color: ButtonColor::Yellow,
            text: "Can't connect to bot".to_owned(),
            hover_text: hover_label.map(str::to_owned),
        },
    }
}

/// Everything the rendering layer needs to draw the update button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateButtonView {
    pub color: ButtonColor,
    pub text: String,
    pub hover_text: Option<String>,
    pub disabled: bool,
}

/// Derive the complete update button from the bot snapshot.
///
/// Download progress replaces the status text while a transfer is working,
/// and the button is disabled while working or offline. Bots older than
/// [`MIN_UPDATABLE_VERSION`] short-circuit to a yellow re-flash notice.
#[must_use]
pub fn update_button_view(
    bot: &BotState,
    policy: &UpdatePolicy,
    bot_online: bool,
) -> UpdateButtonView {
    let job = bot.os_update_job();
    let disabled = is_working(job) || !bot_online;

    let too_old = bot
        .hardware
        .informational_settings
        .controller_version
        .as_deref()
        .is_some_and(|installed| {
            matches!(
                compare_versions(MIN_UPDATABLE_VERSION, installed),
                Ok(Ordering::Greater)
            )
        });
    if too_old {
        return UpdateButtonView {
            color: ButtonColor::Yellow,
            text: TOO_OLD_MESSAGE.to_owned(),
            hover_text: Some(TOO_OLD_MESSAGE.to_owned()),
            disabled,
        };
    }

    let presentation = button_version_status(bot, policy);
    UpdateButtonView {
        color: presentation.color,
        text: download_progress(job).unwrap_or(presentation.text),
        hover_text: presentation.hover_text,
        disabled,
    }
}
