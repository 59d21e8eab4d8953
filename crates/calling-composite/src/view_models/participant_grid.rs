//! Participant Grid View Model

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTile {
    pub id: String,
    pub label: String,
    pub is_muted: bool,
    pub is_speaking: bool,
    pub video_stream_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantGridViewModel {
    /// Dominant speakers first, then by label
    pub tiles: Vec<ParticipantTile>,
    pub local_video_stream_id: Option<String>,
}

impl ParticipantGridViewModel {
    /// Tiles shown at once; the rest is reachable through the roster
    pub const MAX_TILES: usize = 6;

    pub fn from_state(state: &AppState) -> Self {
        let speakers = &state.participants.dominant_speakers;
        let rank = |id: &str| {
            speakers
                .iter()
                .position(|speaker| speaker == id)
                .unwrap_or(usize::MAX)
        };

        let mut tiles: Vec<ParticipantTile> = state
            .participants
            .participants
            .values()
            .map(|p| ParticipantTile {
                id: p.id.clone(),
                label: p.label().to_string(),
                is_muted: p.is_muted,
                is_speaking: p.is_speaking,
                video_stream_id: p.video_stream_id.clone(),
            })
            .collect();
        tiles.sort_by(|a, b| {
            rank(&a.id)
                .cmp(&rank(&b.id))
                .then_with(|| a.label.cmp(&b.label))
        });
        tiles.truncate(Self::MAX_TILES);

        Self {
            tiles,
            local_video_stream_id: state.local_user.camera.video_stream_id.clone(),
        }
    }
}
