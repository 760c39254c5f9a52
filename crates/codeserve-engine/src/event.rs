//! Image-pull progress events.

use bollard::models::CreateImageInfo;

/// Byte-level progress of a layer transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteProgress {
    /// Bytes transferred so far.
    pub current: u64,
    /// Total bytes, when the engine knows it.
    pub total: Option<u64>,
}

/// One status update emitted by the engine during an image pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullEvent {
    /// Layer or tag the update refers to.
    pub id: Option<String>,
    /// Status text, e.g. `Downloading` or `Pull complete`.
    pub status: Option<String>,
    /// Byte progress for layer transfers.
    pub progress: Option<ByteProgress>,
    /// Progress text pre-rendered by the engine.
    pub progress_text: Option<String>,
    /// Error embedded by the engine among the progress objects.
    pub error: Option<String>,
}

impl PullEvent {
    /// Event carrying only a status line.
    #[must_use]
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Status update for a specific layer.
    #[must_use]
    pub fn layer(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Embedded engine error.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attaches byte progress.
    #[must_use]
    pub const fn with_progress(mut self, current: u64, total: Option<u64>) -> Self {
        self.progress = Some(ByteProgress { current, total });
        self
    }
}

impl From<CreateImageInfo> for PullEvent {
    fn from(info: CreateImageInfo) -> Self {
        // The engine sends an empty progressDetail object on plain status lines.
        let progress = info.progress_detail.and_then(|detail| {
            let current = detail.current.and_then(|c| u64::try_from(c).ok())?;
            Some(ByteProgress {
                current,
                total: detail.total.and_then(|t| u64::try_from(t).ok()),
            })
        });

        Self {
            id: info.id.filter(|id| !id.is_empty()),
            status: info.status.filter(|s| !s.is_empty()),
            progress,
            progress_text: info.progress.filter(|p| !p.is_empty()),
            error: info.error.filter(|e| !e.is_empty()),
        }
    }
}
