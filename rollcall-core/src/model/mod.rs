mod conference;
mod event;
mod participant;
mod position;
mod session_state;
mod stream;
mod update;

pub use conference::{ConferenceId, ConferenceTarget, DemoConference};
pub use event::ConferenceEvent;
pub use participant::{Participant, ParticipantId, ParticipantMetadata};
pub use position::SpatialPosition;
pub use session_state::{InvalidTransition, SessionState};
pub use stream::{MediaStream, StreamId, Surface};
pub use update::{RosterUpdate, RowSlot, RowViewModel};
