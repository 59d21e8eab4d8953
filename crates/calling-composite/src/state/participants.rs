//! Remote Participants State

use crate::domain_models::RemoteParticipant;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteParticipantsState {
    /// Roster keyed by participant id
    pub participants: BTreeMap<String, RemoteParticipant>,
    /// Most dominant first
    pub dominant_speakers: Vec<String>,
    /// Bumped on every roster change so views can cheaply detect updates
    pub roster_version: u64,
}

impl RemoteParticipantsState {
    pub fn count(&self) -> usize {
        self.participants.len()
    }

    pub fn get(&self, id: &str) -> Option<&RemoteParticipant> {
        self.participants.get(id)
    }
}
