use crate::avatar::avatar_fetcher::AvatarFetcher;
use crate::error::Result;
use bytes::Bytes;
use rollcall_core::{ParticipantId, RowSlot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Completion of one avatar download, tagged with the binding it was started for.
#[derive(Debug)]
pub struct AvatarFetched {
    pub slot: RowSlot,
    pub token: u64,
    pub participant_id: ParticipantId,
    pub result: Result<Bytes>,
}

struct RowBinding {
    participant_id: ParticipantId,
    token: u64,
    task: Option<JoinHandle<()>>,
}

/// Tracks which participant each row slot shows and runs avatar downloads
/// for them. Rebinding a slot invalidates the download started for the
/// previous binding.
pub struct AvatarLoader {
    fetcher: Arc<dyn AvatarFetcher>,
    bindings: HashMap<RowSlot, RowBinding>,
    next_token: u64,
    completions: mpsc::UnboundedSender<AvatarFetched>,
}

impl AvatarLoader {
    pub fn new(
        fetcher: Arc<dyn AvatarFetcher>,
        completions: mpsc::UnboundedSender<AvatarFetched>,
    ) -> Self {
        Self {
            fetcher,
            bindings: HashMap::new(),
            next_token: 0,
            completions,
        }
    }

    /// Binds `slot` to `participant_id` and starts a download when `avatar_url`
    /// is given. Returns the participant the slot showed before, if any.
    pub fn bind(
        &mut self,
        slot: RowSlot,
        participant_id: ParticipantId,
        avatar_url: Option<&str>,
    ) -> Option<ParticipantId> {
        let previous = self.unbind(slot);

        self.next_token += 1;
        let token = self.next_token;

        let task = avatar_url.map(|url| {
            let fetcher = self.fetcher.clone();
            let completions = self.completions.clone();
            let url = url.to_owned();
            let participant_id = participant_id.clone();

            tokio::spawn(async move {
                let result = fetcher.fetch(&url).await;
                let _ = completions.send(AvatarFetched {
                    slot,
                    token,
                    participant_id,
                    result,
                });
            })
        });

        self.bindings.insert(
            slot,
            RowBinding {
                participant_id,
                token,
                task,
            },
        );
        previous
    }

    pub fn unbind(&mut self, slot: RowSlot) -> Option<ParticipantId> {
        let binding = self.bindings.remove(&slot)?;
        if let Some(task) = binding.task {
            task.abort();
        }
        Some(binding.participant_id)
    }

    pub fn bound(&self, slot: RowSlot) -> Option<&ParticipantId> {
        self.bindings.get(&slot).map(|b| &b.participant_id)
    }

    pub fn slots_for(&self, participant_id: &ParticipantId) -> Vec<RowSlot> {
        let mut slots: Vec<RowSlot> = self
            .bindings
            .iter()
            .filter(|(_, b)| &b.participant_id == participant_id)
            .map(|(slot, _)| *slot)
            .collect();
        slots.sort();
        slots
    }

    /// Whether a completion still matches the current binding of its slot.
    pub fn accept(&mut self, fetched: &AvatarFetched) -> bool {
        let Some(binding) = self.bindings.get_mut(&fetched.slot) else {
            debug!("Avatar for unbound slot {:?} discarded", fetched.slot);
            return false;
        };
        if binding.token != fetched.token || binding.participant_id != fetched.participant_id {
            debug!(
                "Stale avatar for {} on slot {:?} discarded",
                fetched.participant_id, fetched.slot
            );
            return false;
        }
        binding.task = None;
        true
    }

    pub fn clear(&mut self) {
        for (_, binding) in self.bindings.drain() {
            if let Some(task) = binding.task {
                task.abort();
            }
        }
    }
}

impl Drop for AvatarLoader {
    fn drop(&mut self) {
        self.clear();
    }
}
