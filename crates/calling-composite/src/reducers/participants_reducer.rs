//! Remote Participants Reducer

use crate::actions::{Action, ParticipantAction};
use crate::state::RemoteParticipantsState;

pub fn reduce(mut state: RemoteParticipantsState, action: &Action) -> RemoteParticipantsState {
    let Action::Participants(action) = action else {
        return state;
    };

    match action {
        ParticipantAction::ParticipantsUpdated(updated) => {
            let mut changed = false;
            for participant in updated {
                if state.participants.get(&participant.id) != Some(participant) {
                    state
                        .participants
                        .insert(participant.id.clone(), participant.clone());
                    changed = true;
                }
            }
            if changed {
                state.roster_version += 1;
            }
        }
        ParticipantAction::ParticipantsRemoved(ids) => {
            let before = state.participants.len();
            for id in ids {
                state.participants.remove(id);
            }
            state
                .dominant_speakers
                .retain(|id| state.participants.contains_key(id));
            if state.participants.len() != before {
                state.roster_version += 1;
            }
        }
        ParticipantAction::DominantSpeakersUpdated(speakers) => {
            state.dominant_speakers = speakers.clone();
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_models::RemoteParticipant;

    fn updated(participants: Vec<RemoteParticipant>) -> Action {
        Action::Participants(ParticipantAction::ParticipantsUpdated(participants))
    }

    #[test]
    fn test_upsert_and_remove() {
        let state = reduce(
            RemoteParticipantsState::default(),
            &updated(vec![
                RemoteParticipant::new("a", "Alice"),
                RemoteParticipant::new("b", "Bob"),
            ]),
        );
        let state = reduce(state, &updated(vec![RemoteParticipant::new("a", "Alice").muted(true)]));
        assert_eq!(state.count(), 2);
        assert!(state.get("a").unwrap().is_muted);
        assert_eq!(state.roster_version, 2);

        let state = reduce(
            state,
            &Action::Participants(ParticipantAction::ParticipantsRemoved(vec!["b".to_string()])),
        );
        assert_eq!(state.count(), 1);
        assert_eq!(state.roster_version, 3);
    }

    #[test]
    fn test_unchanged_update_keeps_version() {
        let alice = RemoteParticipant::new("a", "Alice");
        let state = reduce(RemoteParticipantsState::default(), &updated(vec![alice.clone()]));
        let state = reduce(state, &updated(vec![alice]));
        assert_eq!(state.roster_version, 1);
    }

    #[test]
    fn test_departed_speaker_is_dropped() {
        let state = reduce(
            RemoteParticipantsState::default(),
            &updated(vec![RemoteParticipant::new("a", "Alice")]),
        );
        let state = reduce(
            state,
            &Action::Participants(ParticipantAction::DominantSpeakersUpdated(vec!["a".to_string()])),
        );
        let state = reduce(
            state,
            &Action::Participants(ParticipantAction::ParticipantsRemoved(vec!["a".to_string()])),
        );
        assert!(state.dominant_speakers.is_empty());
    }
}
