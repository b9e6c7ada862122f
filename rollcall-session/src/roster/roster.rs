use rollcall_core::{Participant, ParticipantId};

/// Participants in join order, at most one per id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.index_of(participant_id).is_some()
    }

    pub fn index_of(&self, participant_id: &ParticipantId) -> Option<usize> {
        self.participants
            .iter()
            .position(|p| &p.id == participant_id)
    }

    pub fn get(&self, participant_id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == participant_id)
    }

    pub fn get_mut(&mut self, participant_id: &ParticipantId) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| &p.id == participant_id)
    }

    pub fn at(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    /// Appends `participant` and returns its index, or `None` if the id is
    /// already present.
    pub fn push(&mut self, participant: Participant) -> Option<usize> {
        if self.contains(&participant.id) {
            return None;
        }
        self.participants.push(participant);
        Some(self.participants.len() - 1)
    }

    /// Removes the participant and returns the index it occupied.
    pub fn remove(&mut self, participant_id: &ParticipantId) -> Option<(usize, Participant)> {
        let index = self.index_of(participant_id)?;
        Some((index, self.participants.remove(index)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }
}
