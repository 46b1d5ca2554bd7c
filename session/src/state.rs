//! The renderable outcome of the session sync pipeline.

use crate::compose::ComposedUrl;
use crate::error::SyncError;

/// Exactly one of these holds at any time.
#[derive(Clone, Debug, PartialEq, Eq, Default, strum::EnumIs)]
pub enum SyncStatus {
    /// A re-check is in progress (or has not completed yet).
    #[default]
    Loading,
    /// The iframe should show this URL.
    Ready(ComposedUrl),
    /// The run failed; the surface shows a message and a retry action.
    Error(SyncError),
}

/// What the embedding surface renders from.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SyncState {
    pub status: SyncStatus,
    /// A non-fatal problem from the last completed run, shown alongside a
    /// `Ready` URL. Cleared by the next run that finds nothing wrong.
    pub advisory: Option<SyncError>,
}

impl SyncState {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn ready(url: ComposedUrl, advisory: Option<SyncError>) -> Self {
        Self {
            status: SyncStatus::Ready(url),
            advisory,
        }
    }

    pub fn failed(error: SyncError) -> Self {
        Self {
            status: SyncStatus::Error(error),
            advisory: None,
        }
    }

    pub fn url(&self) -> Option<&ComposedUrl> {
        match &self.status {
            SyncStatus::Ready(url) => Some(url),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SyncError> {
        match &self.status {
            SyncStatus::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }
}
