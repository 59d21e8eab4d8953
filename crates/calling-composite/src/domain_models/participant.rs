//! Remote participant model

/// A remote participant in the call roster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteParticipant {
    /// Stable identifier assigned by the calling service
    pub id: String,
    pub display_name: String,
    pub is_muted: bool,
    pub is_speaking: bool,
    /// Identifier of the participant's video stream, if they share video
    pub video_stream_id: Option<String>,
}

impl RemoteParticipant {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_muted: false,
            is_speaking: false,
            video_stream_id: None,
        }
    }

    pub fn muted(mut self, is_muted: bool) -> Self {
        self.is_muted = is_muted;
        self
    }

    pub fn speaking(mut self, is_speaking: bool) -> Self {
        self.is_speaking = is_speaking;
        self
    }

    pub fn with_video(mut self, stream_id: impl Into<String>) -> Self {
        self.video_stream_id = Some(stream_id.into());
        self
    }

    /// Name to render; falls back to the id for anonymous participants
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}
