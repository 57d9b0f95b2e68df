use hero_types::{AccountId, AvatarState, Card, FailureKind, HealthLogEntry, Item, ItemId, RewardId};

/// Something that happened in a player flow, published after the authority
/// confirmed it.
#[derive(Debug, Clone, PartialEq)]
pub enum HeroEvent {
    AvatarRefreshed {
        avatar: AvatarState,
    },
    HealthLogged {
        user_id: AccountId,
        entry: HealthLogEntry,
    },
    MysteryBoxOpened {
        user_id: AccountId,
        item: Item,
    },
    QuizCompleted {
        user_id: AccountId,
        correct_count: usize,
        session_length: usize,
        experience: u32,
        coins: u32,
    },
    CardAwarded {
        user_id: AccountId,
        card: Card,
        is_duplicate: bool,
    },
    RewardRedeemed {
        user_id: AccountId,
        reward_id: RewardId,
    },
    ItemEquipped {
        user_id: AccountId,
        item_id: Option<ItemId>,
    },
    ActionFailed {
        flow: String,
        kind: FailureKind,
        message: String,
    },
}

impl HeroEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HeroEvent::AvatarRefreshed { .. } => "avatar_refreshed",
            HeroEvent::HealthLogged { .. } => "health_logged",
            HeroEvent::MysteryBoxOpened { .. } => "mystery_box_opened",
            HeroEvent::QuizCompleted { .. } => "quiz_completed",
            HeroEvent::CardAwarded { .. } => "card_awarded",
            HeroEvent::RewardRedeemed { .. } => "reward_redeemed",
            HeroEvent::ItemEquipped { .. } => "item_equipped",
            HeroEvent::ActionFailed { .. } => "action_failed",
        }
    }
}

/// Event handler trait for reacting to hero events
pub trait HeroEventHandler: Send {
    fn handle_event(&mut self, event: &HeroEvent);
}

/// Fans each event out to every registered handler
#[derive(Default)]
pub struct HeroEventBus {
    handlers: Vec<Box<dyn HeroEventHandler>>,
}

impl HeroEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: Box<dyn HeroEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: HeroEvent) {
        tracing::trace!(event = event.name(), handlers = self.handlers.len(), "Publishing event");
        for handler in &mut self.handlers {
            handler.handle_event(&event);
        }
    }
}
