pub use rollcall_core::model::{ParticipantId, RosterUpdate, SessionState};

pub mod model {
    pub use rollcall_core::model::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use rollcall_session::*;
}
