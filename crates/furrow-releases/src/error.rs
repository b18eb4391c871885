use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The bot has not reported which platform it runs on.
    #[error("platform not available")]
    MissingPlatform,

    #[error("release request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The release server has no release for this platform and channel.
    #[error("no releases found for platform and channel")]
    NotFound,

    #[error("release server responded with HTTP {status}")]
    Http { status: reqwest::StatusCode },

    #[error("failed to parse release response: {0}")]
    Parse(#[source] reqwest::Error),
}
