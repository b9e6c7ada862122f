use crate::roster::roster::Roster;
use crate::service::ConferencingService;
use bytes::Bytes;
use rollcall_core::{
    ConferenceEvent, MediaStream, Participant, ParticipantId, ParticipantMetadata, RosterUpdate,
    RowViewModel, SpatialPosition, Surface,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Keeps the roster in step with conferencing service events and turns each
/// event into the instructions the rendered list needs.
///
/// Media is tracked per participant, not per rendered row: a stream that
/// arrives while its row is off screen is kept and attached once the row is
/// shown again.
pub struct RosterReconciler {
    service: Arc<dyn ConferencingService>,
    local: Participant,
    roster: Roster,
    streams: HashMap<ParticipantId, MediaStream>,
    visible: HashSet<ParticipantId>,
    avatars: HashMap<ParticipantId, Bytes>,
    self_stream: Option<MediaStream>,
    screen_share: Option<MediaStream>,
    latest_message: Option<String>,
}

impl RosterReconciler {
    pub fn new(service: Arc<dyn ConferencingService>) -> Self {
        let local_id = service.local_participant_id();

        Self {
            service,
            local: Participant::new(local_id, ParticipantMetadata::default()),
            roster: Roster::new(),
            streams: HashMap::new(),
            visible: HashSet::new(),
            avatars: HashMap::new(),
            self_stream: None,
            screen_share: None,
            latest_message: None,
        }
    }

    pub fn local(&self) -> &Participant {
        &self.local
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn latest_message(&self) -> Option<&str> {
        self.latest_message.as_deref()
    }

    pub fn screen_share(&self) -> Option<&MediaStream> {
        self.screen_share.as_ref()
    }

    pub fn stream_for(&self, participant_id: &ParticipantId) -> Option<&MediaStream> {
        self.streams.get(participant_id)
    }

    pub fn is_visible(&self, participant_id: &ParticipantId) -> bool {
        self.visible.contains(participant_id)
    }

    pub fn avatar(&self, participant_id: &ParticipantId) -> Option<&Bytes> {
        self.avatars.get(participant_id)
    }

    pub fn row(&self, participant_id: &ParticipantId) -> Option<RowViewModel> {
        self.roster
            .get(participant_id)
            .map(|p| RowViewModel::from_participant(p, self.avatars.get(&p.id).cloned()))
    }

    pub fn rows(&self) -> Vec<RowViewModel> {
        self.roster
            .iter()
            .map(|p| RowViewModel::from_participant(p, self.avatars.get(&p.id).cloned()))
            .collect()
    }

    pub fn apply(&mut self, event: ConferenceEvent) -> Vec<RosterUpdate> {
        match event {
            ConferenceEvent::ParticipantJoined {
                participant_id,
                metadata,
            } => self.on_participant_joined(participant_id, metadata),
            ConferenceEvent::ParticipantLeft { participant_id } => {
                self.on_participant_left(&participant_id)
            }
            ConferenceEvent::MessageReceived {
                participant_id,
                text,
            } => self.on_message_received(&participant_id, &text),
            ConferenceEvent::StreamAdded {
                participant_id,
                stream,
            } => self.on_media_stream_added(stream, &participant_id),
            ConferenceEvent::StreamRemoved { participant_id } => {
                self.on_media_stream_removed(&participant_id)
            }
            ConferenceEvent::ScreenShareAdded { stream, .. } => self.on_screen_share_added(stream),
            ConferenceEvent::ScreenShareRemoved { .. } => self.on_screen_share_removed(),
        }
    }

    pub fn on_participant_joined(
        &mut self,
        participant_id: ParticipantId,
        metadata: ParticipantMetadata,
    ) -> Vec<RosterUpdate> {
        if participant_id == self.local.id {
            debug!("Join for local user {} has no roster row", participant_id);
            return Vec::new();
        }
        if self.roster.contains(&participant_id) {
            debug!("Duplicate join for {}, ignoring", participant_id);
            return Vec::new();
        }

        self.service.set_user_distance(&participant_id, 0.0);
        let angle = self.service.user_position(&participant_id).angle;

        let mut participant = Participant::new(participant_id.clone(), metadata);
        participant.position = SpatialPosition::new(angle, 0.0);
        participant.is_muted = self.service.is_user_muted(&participant_id);

        let Some(index) = self.roster.push(participant) else {
            return Vec::new();
        };
        info!("Participant {} joined at row {}", participant_id, index);

        self.row_update(index, |index, row| RosterUpdate::RowInserted { index, row })
            .into_iter()
            .collect()
    }

    pub fn on_participant_left(&mut self, participant_id: &ParticipantId) -> Vec<RosterUpdate> {
        let Some((index, _)) = self.roster.remove(participant_id) else {
            debug!("Leave for unknown participant {}, ignoring", participant_id);
            return Vec::new();
        };
        info!("Participant {} left from row {}", participant_id, index);

        let mut updates = Vec::new();
        let was_visible = self.visible.remove(participant_id);
        if self.streams.remove(participant_id).is_some() && was_visible {
            updates.push(self.detach(Surface::Row(participant_id.clone())));
        }
        self.avatars.remove(participant_id);

        updates.push(RosterUpdate::RowRemoved {
            index,
            participant_id: participant_id.clone(),
        });
        updates
    }

    /// `"<name>: <text>"`, with the raw id standing in for a missing name or
    /// an unknown sender.
    pub fn format_message(&self, participant_id: &ParticipantId, text: &str) -> String {
        let sender = self
            .roster
            .get(participant_id)
            .map(|p| p.label())
            .unwrap_or(participant_id.as_str());
        format!("{}: {}", sender, text)
    }

    pub fn on_message_received(
        &mut self,
        participant_id: &ParticipantId,
        text: &str,
    ) -> Vec<RosterUpdate> {
        let text = self.format_message(participant_id, text);
        self.latest_message = Some(text.clone());
        vec![RosterUpdate::MessageChanged { text }]
    }

    pub fn on_media_stream_added(
        &mut self,
        stream: MediaStream,
        participant_id: &ParticipantId,
    ) -> Vec<RosterUpdate> {
        let mut updates = Vec::new();

        if *participant_id == self.local.id {
            if self.self_stream.take().is_some() {
                updates.push(self.detach(Surface::SelfView));
            }
            self.local.has_active_video = true;
            self.self_stream = Some(stream.clone());
            updates.push(self.attach(stream, Surface::SelfView));
            return updates;
        }

        let Some(index) = self.roster.index_of(participant_id) else {
            debug!(
                "Stream {} for unknown participant {}, ignoring",
                stream.id, participant_id
            );
            return updates;
        };

        let surface = Surface::Row(participant_id.clone());
        let previous = self.streams.insert(participant_id.clone(), stream.clone());
        if let Some(participant) = self.roster.get_mut(participant_id) {
            participant.has_active_video = true;
        }

        if self.visible.contains(participant_id) {
            if previous.is_some() {
                updates.push(self.detach(surface.clone()));
            }
            updates.push(self.attach(stream, surface));
        } else {
            debug!(
                "Row for {} not visible, stream {} kept until shown",
                participant_id, stream.id
            );
        }

        updates.extend(self.row_update(index, |index, row| RosterUpdate::RowRefreshed {
            index,
            row,
        }));
        updates
    }

    pub fn on_media_stream_removed(&mut self, participant_id: &ParticipantId) -> Vec<RosterUpdate> {
        let mut updates = Vec::new();

        if *participant_id == self.local.id {
            self.local.has_active_video = false;
            if self.self_stream.take().is_some() {
                updates.push(self.detach(Surface::SelfView));
            }
            return updates;
        }

        let Some(index) = self.roster.index_of(participant_id) else {
            debug!("Stream removal for unknown participant {}", participant_id);
            return updates;
        };

        if let Some(participant) = self.roster.get_mut(participant_id) {
            participant.has_active_video = false;
        }
        if self.streams.remove(participant_id).is_some() && self.visible.contains(participant_id) {
            updates.push(self.detach(Surface::Row(participant_id.clone())));
        }

        updates.extend(self.row_update(index, |index, row| RosterUpdate::RowRefreshed {
            index,
            row,
        }));
        updates
    }

    /// Only one screen share is shown. A new one replaces the current one.
    pub fn on_screen_share_added(&mut self, stream: MediaStream) -> Vec<RosterUpdate> {
        let mut updates = Vec::new();
        if self.screen_share.take().is_some() {
            updates.push(self.detach(Surface::ScreenShare));
        }
        self.screen_share = Some(stream.clone());
        updates.push(self.attach(stream, Surface::ScreenShare));
        updates
    }

    pub fn on_screen_share_removed(&mut self) -> Vec<RosterUpdate> {
        match self.screen_share.take() {
            Some(_) => vec![self.detach(Surface::ScreenShare)],
            None => Vec::new(),
        }
    }

    /// Flips the mute state the service reports and returns the new state.
    pub fn toggle_mute(&mut self, participant_id: &ParticipantId) -> (bool, Vec<RosterUpdate>) {
        let muted = !self.service.is_user_muted(participant_id);
        self.service.mute_user(participant_id, muted);
        info!("Participant {} muted: {}", participant_id, muted);

        let Some(index) = self.roster.index_of(participant_id) else {
            return (muted, Vec::new());
        };
        if let Some(participant) = self.roster.get_mut(participant_id) {
            participant.is_muted = muted;
        }

        let updates = self
            .row_update(index, |index, row| RosterUpdate::RowRefreshed { index, row })
            .into_iter()
            .collect();
        (muted, updates)
    }

    /// Forwarded unvalidated; the service owns the bounds.
    pub fn set_angle(&mut self, participant_id: &ParticipantId, angle: f64) -> Vec<RosterUpdate> {
        self.service.set_user_angle(participant_id, angle);
        self.refresh_position(participant_id, |position| position.angle = angle)
    }

    pub fn set_distance(
        &mut self,
        participant_id: &ParticipantId,
        distance: f64,
    ) -> Vec<RosterUpdate> {
        self.service.set_user_distance(participant_id, distance);
        self.refresh_position(participant_id, |position| position.distance = distance)
    }

    /// The presentation layer started rendering this participant's row.
    pub fn row_shown(&mut self, participant_id: &ParticipantId) -> Vec<RosterUpdate> {
        if !self.roster.contains(participant_id) {
            debug!("Row shown for unknown participant {}", participant_id);
            return Vec::new();
        }
        if !self.visible.insert(participant_id.clone()) {
            return Vec::new();
        }

        match self.streams.get(participant_id).cloned() {
            Some(stream) => vec![self.attach(stream, Surface::Row(participant_id.clone()))],
            None => Vec::new(),
        }
    }

    /// The row went off screen or was recycled. The stream stays known.
    pub fn row_hidden(&mut self, participant_id: &ParticipantId) -> Vec<RosterUpdate> {
        if !self.visible.remove(participant_id) {
            return Vec::new();
        }
        if self.streams.contains_key(participant_id) {
            vec![self.detach(Surface::Row(participant_id.clone()))]
        } else {
            Vec::new()
        }
    }

    /// Caches a downloaded avatar if the participant is still present.
    pub fn store_avatar(&mut self, participant_id: &ParticipantId, avatar: Bytes) -> bool {
        if !self.roster.contains(participant_id) {
            return false;
        }
        self.avatars.insert(participant_id.clone(), avatar);
        true
    }

    /// Detaches every attached surface and forgets all participants.
    pub fn clear(&mut self) -> Vec<RosterUpdate> {
        let mut updates = Vec::new();

        if self.self_stream.take().is_some() {
            updates.push(self.detach(Surface::SelfView));
        }
        self.local.has_active_video = false;
        if self.screen_share.take().is_some() {
            updates.push(self.detach(Surface::ScreenShare));
        }

        let mut attached_rows: Vec<ParticipantId> = self
            .visible
            .iter()
            .filter(|id| self.streams.contains_key(*id))
            .cloned()
            .collect();
        attached_rows.sort();
        for participant_id in attached_rows {
            updates.push(self.detach(Surface::Row(participant_id)));
        }

        self.roster.clear();
        self.streams.clear();
        self.visible.clear();
        self.avatars.clear();
        updates
    }

    fn attach(&self, stream: MediaStream, surface: Surface) -> RosterUpdate {
        self.service.attach_stream(&stream, &surface);
        RosterUpdate::StreamAttached { surface, stream }
    }

    fn detach(&self, surface: Surface) -> RosterUpdate {
        self.service.detach_stream(&surface);
        RosterUpdate::StreamDetached { surface }
    }

    fn refresh_position<F>(&mut self, participant_id: &ParticipantId, change: F) -> Vec<RosterUpdate>
    where
        F: FnOnce(&mut SpatialPosition),
    {
        let Some(index) = self.roster.index_of(participant_id) else {
            return Vec::new();
        };
        if let Some(participant) = self.roster.get_mut(participant_id) {
            change(&mut participant.position);
        }
        self.row_update(index, |index, row| RosterUpdate::RowRefreshed { index, row })
            .into_iter()
            .collect()
    }

    fn row_update<F>(&self, index: usize, build: F) -> Option<RosterUpdate>
    where
        F: FnOnce(usize, RowViewModel) -> RosterUpdate,
    {
        let participant = self.roster.at(index)?;
        let row = RowViewModel::from_participant(
            participant,
            self.avatars.get(&participant.id).cloned(),
        );
        Some(build(index, row))
    }
}
