use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use hero_core::HeroError;
use hero_types::ValidationReason;
use uuid::Uuid;

/// Mutating flows that must not overlap for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    HealthLog,
    MysteryBox,
    QuizReward,
    Redemption,
    Equip,
    Appearance,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::HealthLog => "health log",
            MutationKind::MysteryBox => "mystery box",
            MutationKind::QuizReward => "quiz reward",
            MutationKind::Redemption => "redemption",
            MutationKind::Equip => "equip",
            MutationKind::Appearance => "appearance",
        };
        f.write_str(name)
    }
}

/// Registry of mutating flows currently waiting on the authority.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    slots: Arc<DashMap<MutationKind, Uuid>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `kind`, or refuses while another flow holds it.
    pub fn begin(&self, kind: MutationKind) -> Result<InFlightGuard, HeroError> {
        match self.slots.entry(kind) {
            Entry::Occupied(existing) => {
                tracing::debug!(flow = %kind, request_id = %existing.get(), "Mutation already in flight");
                Err(HeroError::validation(ValidationReason::MutationInFlight {
                    flow: kind.to_string(),
                }))
            }
            Entry::Vacant(slot) => {
                let request_id = Uuid::new_v4();
                slot.insert(request_id);
                Ok(InFlightGuard {
                    slots: self.slots.clone(),
                    kind,
                    request_id,
                })
            }
        }
    }

    pub fn is_busy(&self, kind: MutationKind) -> bool {
        self.slots.contains_key(&kind)
    }
}

/// Releases its slot when dropped, on every exit path.
#[derive(Debug)]
pub struct InFlightGuard {
    slots: Arc<DashMap<MutationKind, Uuid>>,
    kind: MutationKind,
    request_id: Uuid,
}

impl InFlightGuard {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.slots
            .remove_if(&self.kind, |_, request_id| *request_id == self.request_id);
    }
}
