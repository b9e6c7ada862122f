use crate::error::ServiceError;
use crate::service::conferencing_service::ConferencingService;
use crate::service::event_sender::EventSender;
use async_trait::async_trait;
use dashmap::DashMap;
use rollcall_core::{
    ConferenceEvent, ConferenceId, DemoConference, MediaStream, ParticipantId, SpatialPosition,
    Surface,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tracing::{debug, info};
use uuid::Uuid;

/// In-process conferencing service. Keeps per-user state in memory and lets
/// the caller push delegate callbacks with [`LoopbackService::emit`].
pub struct LoopbackService {
    local_id: ParticipantId,
    default_angle: f64,
    subscriber: Mutex<Option<EventSender>>,
    muted: DashMap<ParticipantId, bool>,
    positions: DashMap<ParticipantId, SpatialPosition>,
    attached: DashMap<Surface, MediaStream>,
    sent_messages: Mutex<Vec<String>>,
    join_failure: Option<ServiceError>,
    leave_failure: Option<ServiceError>,
    join_gate: Option<Arc<Notify>>,
    leave_events: Vec<ConferenceEvent>,
    joined: AtomicBool,
    leave_calls: AtomicUsize,
    camera_flips: AtomicUsize,
    speaker_switches: AtomicUsize,
    demo_counter: AtomicU64,
}

impl LoopbackService {
    pub fn new(local_id: impl Into<ParticipantId>) -> Self {
        Self {
            local_id: local_id.into(),
            default_angle: 0.0,
            subscriber: Mutex::new(None),
            muted: DashMap::new(),
            positions: DashMap::new(),
            attached: DashMap::new(),
            sent_messages: Mutex::new(Vec::new()),
            join_failure: None,
            leave_failure: None,
            join_gate: None,
            leave_events: Vec::new(),
            joined: AtomicBool::new(false),
            leave_calls: AtomicUsize::new(0),
            camera_flips: AtomicUsize::new(0),
            speaker_switches: AtomicUsize::new(0),
            demo_counter: AtomicU64::new(0),
        }
    }

    /// Angle reported for users that have never been positioned.
    pub fn with_default_angle(mut self, angle: f64) -> Self {
        self.default_angle = angle;
        self
    }

    pub fn with_join_failure(mut self, reason: impl Into<String>) -> Self {
        self.join_failure = Some(ServiceError::new(reason));
        self
    }

    pub fn with_leave_failure(mut self, reason: impl Into<String>) -> Self {
        self.leave_failure = Some(ServiceError::new(reason));
        self
    }

    /// `join` and `create_demo_conference` wait for `gate` before answering.
    pub fn with_join_gate(mut self, gate: Arc<Notify>) -> Self {
        self.join_gate = Some(gate);
        self
    }

    /// Events delivered to the subscriber from inside `leave`, before it returns.
    pub fn with_leave_events(mut self, events: Vec<ConferenceEvent>) -> Self {
        self.leave_events = events;
        self
    }

    /// Push a delegate callback to the subscribed session.
    pub async fn emit(&self, event: ConferenceEvent) -> bool {
        let subscriber = self.lock_subscriber().clone();
        match subscriber {
            Some(sender) => sender.deliver(event).await,
            None => {
                debug!("No subscriber, dropping {:?}", event);
                false
            }
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.lock_subscriber().is_some()
    }

    pub fn is_joined(&self) -> bool {
        self.joined.load(Ordering::SeqCst)
    }

    pub fn set_user_muted(&self, participant_id: &ParticipantId, muted: bool) {
        self.muted.insert(participant_id.clone(), muted);
    }

    pub fn attached(&self, surface: &Surface) -> Option<MediaStream> {
        self.attached.get(surface).map(|entry| entry.value().clone())
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent_messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn leave_calls(&self) -> usize {
        self.leave_calls.load(Ordering::SeqCst)
    }

    pub fn camera_flips(&self) -> usize {
        self.camera_flips.load(Ordering::SeqCst)
    }

    pub fn speaker_switches(&self) -> usize {
        self.speaker_switches.load(Ordering::SeqCst)
    }

    async fn wait_for_join_gate(&self) {
        if let Some(gate) = &self.join_gate {
            gate.notified().await;
        }
    }

    fn lock_subscriber(&self) -> MutexGuard<'_, Option<EventSender>> {
        self.subscriber
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ConferencingService for LoopbackService {
    fn subscribe(&self, events: EventSender) {
        *self.lock_subscriber() = Some(events);
    }

    fn unsubscribe(&self) {
        self.lock_subscriber().take();
    }

    fn local_participant_id(&self) -> ParticipantId {
        self.local_id.clone()
    }

    async fn join(&self, alias: &ConferenceId) -> Result<(), ServiceError> {
        self.wait_for_join_gate().await;
        if let Some(failure) = &self.join_failure {
            return Err(failure.clone());
        }
        info!("Loopback joined conference {}", alias);
        self.joined.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_demo_conference(&self) -> Result<DemoConference, ServiceError> {
        self.wait_for_join_gate().await;
        if let Some(failure) = &self.join_failure {
            return Err(failure.clone());
        }
        let n = self.demo_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let conference = DemoConference {
            id: ConferenceId(Uuid::new_v4().to_string()),
            alias: ConferenceId(format!("demo-{}", n)),
        };
        info!(
            "Loopback created demo conference {} ({})",
            conference.alias, conference.id
        );
        self.joined.store(true, Ordering::SeqCst);
        Ok(conference)
    }

    async fn leave(&self) -> Result<(), ServiceError> {
        self.leave_calls.fetch_add(1, Ordering::SeqCst);
        for event in &self.leave_events {
            self.emit(event.clone()).await;
        }
        self.joined.store(false, Ordering::SeqCst);
        self.attached.clear();
        match &self.leave_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    async fn send_broadcast_message(&self, text: &str) -> Result<(), ServiceError> {
        if !self.is_joined() {
            return Err(ServiceError::new("not in a conference"));
        }
        self.sent_messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_owned());
        Ok(())
    }

    fn user_position(&self, participant_id: &ParticipantId) -> SpatialPosition {
        self.positions
            .get(participant_id)
            .map(|entry| *entry.value())
            .unwrap_or(SpatialPosition::new(self.default_angle, 0.0))
    }

    fn set_user_angle(&self, participant_id: &ParticipantId, angle: f64) {
        let mut entry = self
            .positions
            .entry(participant_id.clone())
            .or_insert(SpatialPosition::new(self.default_angle, 0.0));
        entry.angle = angle;
    }

    fn set_user_distance(&self, participant_id: &ParticipantId, distance: f64) {
        let mut entry = self
            .positions
            .entry(participant_id.clone())
            .or_insert(SpatialPosition::new(self.default_angle, 0.0));
        entry.distance = distance;
    }

    fn is_user_muted(&self, participant_id: &ParticipantId) -> bool {
        self.muted
            .get(participant_id)
            .map(|entry| *entry.value())
            .unwrap_or(false)
    }

    fn mute_user(&self, participant_id: &ParticipantId, mute: bool) {
        self.muted.insert(participant_id.clone(), mute);
    }

    fn flip_camera(&self) {
        self.camera_flips.fetch_add(1, Ordering::SeqCst);
    }

    fn switch_device_speaker(&self) {
        self.speaker_switches.fetch_add(1, Ordering::SeqCst);
    }

    fn attach_stream(&self, stream: &MediaStream, surface: &Surface) {
        self.attached.insert(surface.clone(), stream.clone());
    }

    fn detach_stream(&self, surface: &Surface) {
        self.attached.remove(surface);
    }
}
