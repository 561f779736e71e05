use serde::Serialize;

/// Frame identifiers the service flagged for a modified video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TamperingReport {
    pub missing_frames: Vec<String>,
    pub tampered_frames: Vec<String>,
}

impl TamperingReport {
    pub fn new(missing_frames: Vec<String>, tampered_frames: Vec<String>) -> Self {
        Self {
            missing_frames,
            tampered_frames,
        }
    }

    /// Missing frames as shown to the user, e.g. `"12, 47"`.
    pub fn missing_frames_display(&self) -> String {
        self.missing_frames.join(", ")
    }

    pub fn tampered_frames_display(&self) -> String {
        self.tampered_frames.join(", ")
    }

    pub fn is_clean(&self) -> bool {
        self.missing_frames.is_empty() && self.tampered_frames.is_empty()
    }
}
