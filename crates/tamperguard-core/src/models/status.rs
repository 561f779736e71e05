use serde::Serialize;

/// Progress of the upload action.
///
/// `Succeeded` and `Failed` are terminal for one attempt but idle-eligible:
/// a new upload may start from either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl TransferStatus {
    pub fn is_submitting(self) -> bool {
        self == TransferStatus::Submitting
    }

    /// Upload, download and file-pick controls are disabled while submitting.
    pub fn controls_enabled(self) -> bool {
        !self.is_submitting()
    }

    pub fn shows_progress(self) -> bool {
        self.is_submitting()
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransferStatus::Idle => "idle",
            TransferStatus::Submitting => "submitting",
            TransferStatus::Succeeded => "succeeded",
            TransferStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}
