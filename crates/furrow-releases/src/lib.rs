//! Release-server client for the operator console.
//!
//! Fetches the latest published OS release for a bot's platform and turns
//! the outcome, success or failure, into a plain status event
//! ([`OsUpdateInfo`]) that the console merges into its bot snapshot.
//! Failures are logged and degrade to an event without a version; the
//! decision logic in `furrow-core` then renders the "can't connect" state.

mod client;
mod error;

pub use client::{OsRelease, OsUpdateInfo, ReleaseClient, UNKNOWN_TARGET};
pub use error::ReleaseError;
