mod console_output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use console_output::ConsoleOutput;
use dialoguer::{Input, Select};
use rollcall::model::{
    ConferenceEvent, ConferenceTarget, MediaStream, ParticipantId, ParticipantMetadata, RowSlot,
};
use rollcall::session::{
    ConferenceSession, FilePreferences, LAST_CONFERENCE_ID_KEY, LoopbackService,
    PreferenceStore, SessionConfig, SessionHandle,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Conference roster demo against an in-process conferencing service")]
struct Cli {
    /// TOML file with session settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Id the local user has in the conference.
    #[arg(long, default_value = "local-user")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a conference by id. Prompts with the last used id when omitted.
    Join {
        #[arg(long)]
        conference: Option<String>,
    },
    /// Create a demo conference and join it.
    Demo,
}

const ACTIONS: &[&str] = &[
    "Participant joins",
    "Participant leaves",
    "Participant sends a message",
    "Participant starts video",
    "Participant stops video",
    "Participant starts screen share",
    "Participant stops screen share",
    "Show row",
    "Hide row",
    "Toggle mute",
    "Set angle",
    "Set distance",
    "Broadcast a message",
    "Flip camera",
    "Switch speaker",
    "Hang up",
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    debug!("Session config: {:?}", config);
    let preferences = Arc::new(FilePreferences::new(config.preferences_path.clone()));

    let target = match cli.command {
        Commands::Join {
            conference: Some(id),
        } => ConferenceTarget::Join(id.into()),
        Commands::Join { conference: None } => {
            let last = preferences
                .get(LAST_CONFERENCE_ID_KEY)
                .context("Failed to read preferences")?
                .unwrap_or_default();
            let id = prompt_text("Conference ID", last).await?;
            ConferenceTarget::Join(id.into())
        }
        Commands::Demo => ConferenceTarget::CreateDemo,
    };

    let service = Arc::new(LoopbackService::new(cli.user.as_str()));
    let (session, handle) = ConferenceSession::new(
        &config,
        target,
        service.clone(),
        Arc::new(ConsoleOutput),
    );
    let session = session.with_preferences(preferences);
    let mut session_task = tokio::spawn(session.run());

    loop {
        if session_task.is_finished() {
            break;
        }
        let choice = prompt_select("Action", ACTIONS).await?;
        if ACTIONS[choice] == "Hang up" {
            handle.hang_up().await.context("Session already closed")?;
            break;
        }
        if let Err(e) = perform(ACTIONS[choice], &service, &handle).await {
            println!("{}", format!("✗ {:#}", e).red());
        }
    }

    match (&mut session_task).await.context("Session task panicked")? {
        Ok(()) => println!("{}", "👋 Left the conference".green().bold()),
        Err(e) => println!("{}", format!("✗ {}", e).red().bold()),
    }
    Ok(())
}

async fn perform(action: &str, service: &LoopbackService, handle: &SessionHandle) -> Result<()> {
    match action {
        "Participant joins" => {
            let participant_id = prompt_participant().await?;
            let name = prompt_text("Display name (empty for none)", String::new()).await?;
            let avatar = prompt_text("Avatar URL (empty for none)", String::new()).await?;
            let metadata = ParticipantMetadata {
                external_id: None,
                avatar_url: Some(avatar).filter(|s| !s.is_empty()),
                display_name: Some(name).filter(|s| !s.is_empty()),
            };
            service
                .emit(ConferenceEvent::ParticipantJoined {
                    participant_id,
                    metadata,
                })
                .await;
        }
        "Participant leaves" => {
            let participant_id = prompt_participant().await?;
            service
                .emit(ConferenceEvent::ParticipantLeft { participant_id })
                .await;
        }
        "Participant sends a message" => {
            let participant_id = prompt_participant().await?;
            let text = prompt_text("Message", String::new()).await?;
            service
                .emit(ConferenceEvent::MessageReceived {
                    participant_id,
                    text,
                })
                .await;
        }
        "Participant starts video" => {
            let participant_id = prompt_participant().await?;
            service
                .emit(ConferenceEvent::StreamAdded {
                    participant_id,
                    stream: MediaStream::new(),
                })
                .await;
        }
        "Participant stops video" => {
            let participant_id = prompt_participant().await?;
            service
                .emit(ConferenceEvent::StreamRemoved { participant_id })
                .await;
        }
        "Participant starts screen share" => {
            let participant_id = prompt_participant().await?;
            service
                .emit(ConferenceEvent::ScreenShareAdded {
                    participant_id,
                    stream: MediaStream::new(),
                })
                .await;
        }
        "Participant stops screen share" => {
            let participant_id = prompt_participant().await?;
            service
                .emit(ConferenceEvent::ScreenShareRemoved { participant_id })
                .await;
        }
        "Show row" => {
            let slot = prompt_slot().await?;
            let participant_id = prompt_participant().await?;
            handle.row_shown(slot, participant_id).await?;
        }
        "Hide row" => {
            let slot = prompt_slot().await?;
            handle.row_hidden(slot).await?;
        }
        "Toggle mute" => {
            let participant_id = prompt_participant().await?;
            let muted = handle.toggle_mute(participant_id.clone()).await?;
            println!("{} muted: {}", participant_id, muted);
        }
        "Set angle" => {
            let participant_id = prompt_participant().await?;
            let angle: f64 = prompt_text("Angle", "0.0".to_string())
                .await?
                .parse()
                .context("Angle must be a number")?;
            handle.set_angle(participant_id, angle).await?;
        }
        "Set distance" => {
            let participant_id = prompt_participant().await?;
            let distance: f64 = prompt_text("Distance", "0.0".to_string())
                .await?
                .parse()
                .context("Distance must be a number")?;
            handle.set_distance(participant_id, distance).await?;
        }
        "Broadcast a message" => {
            let text = prompt_text("Message", String::new()).await?;
            handle.send_message(text).await?;
        }
        "Flip camera" => handle.flip_camera().await?,
        "Switch speaker" => handle.switch_speaker().await?,
        other => anyhow::bail!("Unknown action {}", other),
    }
    Ok(())
}

async fn prompt_participant() -> Result<ParticipantId> {
    Ok(prompt_text("Participant id", String::new()).await?.into())
}

async fn prompt_slot() -> Result<RowSlot> {
    let slot = prompt_text("Row slot", "0".to_string())
        .await?
        .parse()
        .context("Row slot must be a number")?;
    Ok(RowSlot(slot))
}

async fn prompt_text(prompt: &'static str, initial: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
    })
    .await?
    .context("Failed to read input")
}

async fn prompt_select(prompt: &'static str, items: &'static [&'static str]) -> Result<usize> {
    tokio::task::spawn_blocking(move || {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
    })
    .await?
    .context("Failed to read selection")
}
