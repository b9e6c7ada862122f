use async_trait::async_trait;
use bytes::Bytes;
use colored::*;
use rollcall::model::{ConferenceId, ParticipantId, RosterUpdate, RowSlot, SessionState, Surface};
use rollcall::session::PresentationOutput;

/// Renders the presentation feed as terminal lines.
pub struct ConsoleOutput;

fn surface_name(surface: &Surface) -> String {
    match surface {
        Surface::SelfView => "self view".to_string(),
        Surface::Row(id) => format!("row of {}", id),
        Surface::ScreenShare => "screen share".to_string(),
    }
}

#[async_trait]
impl PresentationOutput for ConsoleOutput {
    async fn apply(&self, update: RosterUpdate) {
        let line = match update {
            RosterUpdate::RowInserted { index, row } => {
                format!("+ [{}] {}", index, row.label).green()
            }
            RosterUpdate::RowRemoved {
                index,
                participant_id,
            } => format!("- [{}] {}", index, participant_id).red(),
            RosterUpdate::RowRefreshed { index, row } => format!(
                "~ [{}] {} muted={} angle={:.2} distance={:.2} video={}",
                index, row.label, row.muted, row.angle, row.distance, row.video_visible
            )
            .yellow(),
            RosterUpdate::StreamAttached { surface, stream } => {
                format!("▶ stream {} on {}", stream.id, surface_name(&surface)).cyan()
            }
            RosterUpdate::StreamDetached { surface } => {
                format!("■ stream removed from {}", surface_name(&surface)).cyan()
            }
            RosterUpdate::MessageChanged { text } => format!("✉ {}", text).bold(),
        };
        println!("{}", line);
    }

    async fn session_state_changed(&self, state: SessionState) {
        println!("{}", format!("● session {}", state).magenta());
    }

    async fn conference_joined(&self, conference_id: ConferenceId) {
        println!(
            "{}",
            format!("📞 In conference {}", conference_id).green().bold()
        );
    }

    async fn avatar_loaded(&self, slot: RowSlot, participant_id: ParticipantId, avatar: Bytes) {
        println!(
            "{}",
            format!(
                "🖼 avatar for {} on slot {} ({} bytes)",
                participant_id,
                slot.0,
                avatar.len()
            )
            .blue()
        );
    }
}
