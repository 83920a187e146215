use crate::{EntityId, RenderId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    CatalogLoaded { entities: usize },
    CatalogFailed { message: String },
    ReloadRequested,
    RoundStarted { round: u32, cards: usize },
    CardDegraded { entity: EntityId },
    CardLiked {
        entity: EntityId,
        image: Option<usize>,
        render_id: RenderId,
        liked: usize,
    },
    UsedPruned { removed: usize, remaining: usize },
    AdvanceIgnored,
    Reset { cards: usize },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
