use crate::domain_models::RemoteParticipant;

/// Remote roster deltas as reported by the SDK
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipantAction {
    /// Participants joined or changed (upsert by id)
    ParticipantsUpdated(Vec<RemoteParticipant>),
    /// Participants left (by id)
    ParticipantsRemoved(Vec<String>),
    DominantSpeakersUpdated(Vec<String>),
}
