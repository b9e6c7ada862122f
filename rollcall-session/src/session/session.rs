use crate::avatar::{AvatarFetched, AvatarFetcher, AvatarLoader, HttpAvatarFetcher};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::output::PresentationOutput;
use crate::preferences::{FilePreferences, LAST_CONFERENCE_ID_KEY, PreferenceStore};
use crate::roster::RosterReconciler;
use crate::service::{ConferencingService, EventSender};
use crate::session::session_command::SessionCommand;
use crate::session::session_handle::SessionHandle;
use rollcall_core::{ConferenceEvent, ConferenceId, ConferenceTarget, RosterUpdate, SessionState};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// One conference session: joins, applies service events and UI commands
/// one at a time, and leaves.
pub struct ConferenceSession {
    target: ConferenceTarget,
    service: Arc<dyn ConferencingService>,
    output: Arc<dyn PresentationOutput>,
    preferences: Arc<dyn PreferenceStore>,
    reconciler: RosterReconciler,
    avatars: AvatarLoader,
    state: SessionState,
    conference_id: Option<ConferenceId>,
    command_rx: mpsc::Receiver<SessionCommand>,
    event_rx: mpsc::Receiver<ConferenceEvent>,
    event_tx: mpsc::Sender<ConferenceEvent>,
    avatar_rx: mpsc::UnboundedReceiver<AvatarFetched>,
    avatar_tx: mpsc::UnboundedSender<AvatarFetched>,
}

impl ConferenceSession {
    pub fn new(
        config: &SessionConfig,
        target: ConferenceTarget,
        service: Arc<dyn ConferencingService>,
        output: Arc<dyn PresentationOutput>,
    ) -> (Self, SessionHandle) {
        // Configs built in code do not go through validate().
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        let (avatar_tx, avatar_rx) = mpsc::unbounded_channel();

        let session = Self {
            target,
            reconciler: RosterReconciler::new(service.clone()),
            service,
            output,
            preferences: Arc::new(FilePreferences::new(config.preferences_path.clone())),
            avatars: AvatarLoader::new(Arc::new(HttpAvatarFetcher::new()), avatar_tx.clone()),
            state: SessionState::Idle,
            conference_id: None,
            command_rx,
            event_rx,
            event_tx,
            avatar_rx,
            avatar_tx,
        };

        (session, SessionHandle::new(command_tx))
    }

    pub fn with_preferences(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_avatar_fetcher(mut self, fetcher: Arc<dyn AvatarFetcher>) -> Self {
        self.avatars = AvatarLoader::new(fetcher, self.avatar_tx.clone());
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Joins, then serves inputs until the session is closed.
    ///
    /// A failed join or create closes the session and is returned as
    /// [`SessionError::Service`]. A failed leave is logged only.
    pub async fn run(mut self) -> Result<()> {
        info!("Session starting: {:?}", self.target);

        self.service.subscribe(EventSender::new(self.event_tx.clone()));
        self.set_state(SessionState::Joining).await?;

        if let Err(e) = self.connect().await {
            error!("Session failed to start: {}", e);
            self.service.unsubscribe();
            self.set_state(SessionState::Closed).await?;
            return Err(e);
        }
        self.set_state(SessionState::Active).await?;

        while !self.state.is_closed() {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::HangUp) => self.hang_up().await?,
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("All session handles dropped. Hanging up.");
                            self.hang_up().await?;
                        }
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event).await;
                }

                Some(fetched) = self.avatar_rx.recv() => {
                    self.handle_avatar(fetched).await;
                }
            }
        }

        // Anything the service queued while leaving is discarded through the state gate.
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event).await;
        }

        info!("Session finished");
        Ok(())
    }

    async fn connect(&mut self) -> Result<()> {
        let conference_id = match &self.target {
            ConferenceTarget::Join(alias) => {
                self.service
                    .join(alias)
                    .await
                    .map_err(|e| SessionError::service("join conference", e))?;

                let preferences = self.preferences.clone();
                let value = alias.0.clone();
                match tokio::task::spawn_blocking(move || {
                    preferences.set(LAST_CONFERENCE_ID_KEY, &value)
                })
                .await
                {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("Could not remember conference id {}: {}", alias, e),
                    Err(e) => warn!("Preference write for {} did not finish: {}", alias, e),
                }
                alias.clone()
            }
            ConferenceTarget::CreateDemo => {
                let demo = self
                    .service
                    .create_demo_conference()
                    .await
                    .map_err(|e| SessionError::service("create demo conference", e))?;
                info!("Demo conference {} created with id {}", demo.alias, demo.id);
                demo.alias
            }
        };

        info!("Joined conference {}", conference_id);
        self.conference_id = Some(conference_id.clone());
        self.output.conference_joined(conference_id).await;
        Ok(())
    }

    async fn hang_up(&mut self) -> Result<()> {
        self.set_state(SessionState::Leaving).await?;

        if let Err(e) = self.service.leave().await {
            warn!(
                "Leaving conference {:?} failed: {}. Closing anyway.",
                self.conference_id, e
            );
        }

        let updates = self.reconciler.clear();
        self.emit(updates).await;
        self.avatars.clear();
        self.service.unsubscribe();

        self.set_state(SessionState::Closed).await
    }

    async fn handle_event(&mut self, event: ConferenceEvent) {
        if !self.state.accepts_events() {
            debug!("Session {}, dropping {:?}", self.state, event);
            return;
        }
        let updates = self.reconciler.apply(event);
        self.emit(updates).await;
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::HangUp => {}

            SessionCommand::SendMessage { text, reply } => {
                let service = self.service.clone();
                tokio::spawn(async move {
                    let result = service
                        .send_broadcast_message(&text)
                        .await
                        .map_err(|e| SessionError::service("send broadcast message", e));
                    if let Err(e) = &result {
                        warn!("{}", e);
                    }
                    let _ = reply.send(result);
                });
            }

            SessionCommand::ToggleMute {
                participant_id,
                reply,
            } => {
                let (muted, updates) = self.reconciler.toggle_mute(&participant_id);
                self.emit(updates).await;
                let _ = reply.send(muted);
            }

            SessionCommand::SetAngle {
                participant_id,
                angle,
            } => {
                let updates = self.reconciler.set_angle(&participant_id, angle);
                self.emit(updates).await;
            }

            SessionCommand::SetDistance {
                participant_id,
                distance,
            } => {
                let updates = self.reconciler.set_distance(&participant_id, distance);
                self.emit(updates).await;
            }

            SessionCommand::FlipCamera => self.service.flip_camera(),

            SessionCommand::SwitchSpeaker => self.service.switch_device_speaker(),

            SessionCommand::RowShown {
                slot,
                participant_id,
            } => {
                let Some(participant) = self.reconciler.roster().get(&participant_id) else {
                    debug!("Row {:?} not bound: {}", slot, SessionError::NotFound(participant_id));
                    return;
                };
                let cached = self.reconciler.avatar(&participant_id).cloned();
                let avatar_url = match cached {
                    Some(_) => None,
                    None => participant.metadata.avatar_url.clone(),
                };

                let previous = self
                    .avatars
                    .bind(slot, participant_id.clone(), avatar_url.as_deref());
                if let Some(previous) = previous.filter(|p| *p != participant_id) {
                    if self.avatars.slots_for(&previous).is_empty() {
                        let updates = self.reconciler.row_hidden(&previous);
                        self.emit(updates).await;
                    }
                }

                let updates = self.reconciler.row_shown(&participant_id);
                self.emit(updates).await;

                if let Some(avatar) = cached {
                    self.output.avatar_loaded(slot, participant_id, avatar).await;
                }
            }

            SessionCommand::RowHidden { slot } => {
                let Some(previous) = self.avatars.unbind(slot) else {
                    return;
                };
                if self.avatars.slots_for(&previous).is_empty() {
                    let updates = self.reconciler.row_hidden(&previous);
                    self.emit(updates).await;
                }
            }
        }
    }

    async fn handle_avatar(&mut self, fetched: AvatarFetched) {
        if !self.avatars.accept(&fetched) {
            return;
        }
        let AvatarFetched {
            slot,
            participant_id,
            result,
            ..
        } = fetched;

        match result {
            Ok(avatar) => {
                if self.reconciler.store_avatar(&participant_id, avatar.clone()) {
                    self.output.avatar_loaded(slot, participant_id, avatar).await;
                }
            }
            Err(e) => warn!("Avatar for {} not loaded: {}", participant_id, e),
        }
    }

    async fn set_state(&mut self, next: SessionState) -> Result<()> {
        self.state = self.state.transition(next)?;
        info!("Session state: {}", next);
        self.output.session_state_changed(next).await;
        Ok(())
    }

    async fn emit(&self, updates: Vec<RosterUpdate>) {
        for update in updates {
            self.output.apply(update).await;
        }
    }
}
