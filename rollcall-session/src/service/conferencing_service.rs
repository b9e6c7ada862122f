use crate::error::ServiceError;
use crate::service::event_sender::EventSender;
use async_trait::async_trait;
use rollcall_core::{
    ConferenceId, DemoConference, MediaStream, ParticipantId, SpatialPosition, Surface,
};

/// The external conferencing SDK, seen through the calls a session makes.
///
/// Session-level operations are asynchronous and complete exactly once.
/// Per-user queries and controls are synchronous, as the SDK exposes them.
#[async_trait]
pub trait ConferencingService: Send + Sync {
    /// Start delivering delegate callbacks into `events`.
    fn subscribe(&self, events: EventSender);

    /// Stop delivering delegate callbacks.
    fn unsubscribe(&self);

    /// Id of the local user in the current session.
    fn local_participant_id(&self) -> ParticipantId;

    async fn join(&self, alias: &ConferenceId) -> Result<(), ServiceError>;

    async fn create_demo_conference(&self) -> Result<DemoConference, ServiceError>;

    async fn leave(&self) -> Result<(), ServiceError>;

    async fn send_broadcast_message(&self, text: &str) -> Result<(), ServiceError>;

    fn user_position(&self, participant_id: &ParticipantId) -> SpatialPosition;

    fn set_user_angle(&self, participant_id: &ParticipantId, angle: f64);

    fn set_user_distance(&self, participant_id: &ParticipantId, distance: f64);

    fn is_user_muted(&self, participant_id: &ParticipantId) -> bool;

    fn mute_user(&self, participant_id: &ParticipantId, mute: bool);

    fn flip_camera(&self);

    fn switch_device_speaker(&self);

    fn attach_stream(&self, stream: &MediaStream, surface: &Surface);

    fn detach_stream(&self, surface: &Surface);
}
