use crate::{
    select_image, Card, ConfigError, ControllerConfig, Entity, EntityId, Event, EventBus,
    LoadError, RenderId, RngState, SelectError, UsedSet,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error(String),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The top card was liked; `refilled` is set when that emptied the stack.
    Advanced { liked: RenderId, refilled: bool },
    /// Dropped by the busy guard while a previous advance cools down.
    Ignored,
    Empty,
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    /// The catalog failed earlier; the caller must fetch it again.
    ReloadRequested,
    Ignored,
}

/// Owns the card stack and drives it through advance and reset events.
///
/// The stack top is the last element. All mutation happens through
/// [`Controller::finish_load`], [`Controller::advance`],
/// [`Controller::release_cooldown`] and [`Controller::reset`].
#[derive(Debug)]
pub struct Controller {
    config: ControllerConfig,
    rng: RngState,
    phase: Phase,
    catalog: Vec<Arc<Entity>>,
    stack: Vec<Card>,
    liked: Vec<Card>,
    used: UsedSet,
    round: u32,
    next_render_id: u64,
    busy_since: Option<Instant>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            phase: Phase::Loading,
            catalog: Vec::new(),
            stack: Vec::new(),
            liked: Vec::new(),
            used: UsedSet::new(),
            round: 0,
            next_render_id: 1,
            busy_since: None,
        })
    }

    pub fn finish_load(
        &mut self,
        result: Result<Vec<Entity>, LoadError>,
        events: &mut EventBus,
    ) {
        if self.phase != Phase::Loading {
            debug!(phase = ?self.phase, "catalog result arrived outside loading; dropped");
            return;
        }
        match result {
            Ok(entities) => {
                info!(entities = entities.len(), seed = self.rng.seed(), "catalog loaded");
                events.push(Event::CatalogLoaded {
                    entities: entities.len(),
                });
                self.catalog = entities.into_iter().map(Arc::new).collect();
                self.phase = Phase::Ready;
                self.start_over(events);
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "catalog load failed");
                events.push(Event::CatalogFailed {
                    message: message.clone(),
                });
                self.phase = Phase::Error(message);
            }
        }
    }

    pub fn advance(&mut self, now: Instant, events: &mut EventBus) -> AdvanceOutcome {
        if self.phase != Phase::Ready {
            return AdvanceOutcome::NotReady;
        }
        if self.busy_since.is_some() {
            debug!("advance ignored while cooling down");
            events.push(Event::AdvanceIgnored);
            return AdvanceOutcome::Ignored;
        }
        let Some(top) = self.stack.pop() else {
            return AdvanceOutcome::Empty;
        };
        self.busy_since = Some(now);

        let liked_entity = top.entity.id.clone();
        let liked_image = top.image;
        let liked_render = top.render_id;
        if let Some(image) = liked_image {
            self.used.record(liked_entity.clone(), image);
        }
        self.liked.push(top);
        debug!(
            entity = %liked_entity,
            image = ?liked_image,
            render_id = %liked_render,
            remaining = self.stack.len(),
            "card liked"
        );
        events.push(Event::CardLiked {
            entity: liked_entity.clone(),
            image: liked_image,
            render_id: liked_render,
            liked: self.liked.len(),
        });

        self.prune_used(events);

        let refilled = self.stack.is_empty();
        if refilled {
            let exclude = liked_image.map(|image| (&liked_entity, image));
            self.stack = self.build_round(exclude, events);
            self.round = self.round.saturating_add(1);
            info!(round = self.round, cards = self.stack.len(), "round started");
            events.push(Event::RoundStarted {
                round: self.round,
                cards: self.stack.len(),
            });
        }

        AdvanceOutcome::Advanced {
            liked: liked_render,
            refilled,
        }
    }

    /// Clears the busy guard once the cooldown has elapsed. Returns true
    /// when the guard was released by this call.
    pub fn release_cooldown(&mut self, now: Instant) -> bool {
        let Some(since) = self.busy_since else {
            return false;
        };
        if now.saturating_duration_since(since) < self.config.cooldown() {
            return false;
        }
        self.busy_since = None;
        true
    }

    pub fn reset(&mut self, events: &mut EventBus) -> ResetOutcome {
        match self.phase {
            Phase::Loading => ResetOutcome::Ignored,
            Phase::Error(_) => {
                info!("reloading catalog after failure");
                self.phase = Phase::Loading;
                events.push(Event::ReloadRequested);
                ResetOutcome::ReloadRequested
            }
            Phase::Ready => {
                info!(liked = self.liked.len(), used = self.used.len(), "reset");
                self.start_over(events);
                events.push(Event::Reset {
                    cards: self.stack.len(),
                });
                ResetOutcome::Reset
            }
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn catalog(&self) -> &[Arc<Entity>] {
        &self.catalog
    }

    pub fn stack(&self) -> &[Card] {
        &self.stack
    }

    pub fn top(&self) -> Option<&Card> {
        self.stack.last()
    }

    /// Up to two cards from the top, back card first.
    pub fn visible_cards(&self) -> &[Card] {
        let start = self.stack.len().saturating_sub(2);
        &self.stack[start..]
    }

    pub fn liked(&self) -> &[Card] {
        &self.liked
    }

    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    pub fn used(&self) -> &UsedSet {
        &self.used
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_busy(&self) -> bool {
        self.busy_since.is_some()
    }

    fn start_over(&mut self, events: &mut EventBus) {
        self.liked.clear();
        self.used.clear();
        self.busy_since = None;
        self.stack = self.build_round(None, events);
        self.round = 1;
        info!(round = self.round, cards = self.stack.len(), "round started");
        events.push(Event::RoundStarted {
            round: self.round,
            cards: self.stack.len(),
        });
    }

    fn prune_used(&mut self, events: &mut EventBus) {
        if self.used.len() <= self.config.prune_threshold {
            return;
        }
        let removed = self.used.prune_oldest_half();
        debug!(removed, remaining = self.used.len(), "pruned used history");
        events.push(Event::UsedPruned {
            removed,
            remaining: self.used.len(),
        });
    }

    fn build_round(
        &mut self,
        exclude: Option<(&EntityId, usize)>,
        events: &mut EventBus,
    ) -> Vec<Card> {
        let catalog = self.catalog.clone();
        catalog
            .into_iter()
            .map(|entity| {
                let skip = exclude
                    .filter(|(id, _)| **id == entity.id)
                    .map(|(_, image)| image);
                self.make_card(entity, skip, events)
            })
            .collect()
    }

    fn make_card(
        &mut self,
        entity: Arc<Entity>,
        exclude: Option<usize>,
        events: &mut EventBus,
    ) -> Card {
        let image = match select_image(&entity, &self.used, exclude, &mut self.rng) {
            Ok(image) => Some(image),
            Err(SelectError::NoImageAvailable(_)) => {
                warn!(entity = %entity.id, "entity has no images; showing degraded card");
                events.push(Event::CardDegraded {
                    entity: entity.id.clone(),
                });
                None
            }
        };
        let render_id = RenderId(self.next_render_id);
        self.next_render_id = self.next_render_id.saturating_add(1);
        Card {
            entity,
            image,
            render_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(seed: u64) -> ControllerConfig {
        ControllerConfig {
            seed: Some(seed),
            ..ControllerConfig::default()
        }
    }

    fn entity(id: &str, images: usize) -> Entity {
        Entity::new(id, id.to_uppercase())
            .with_images((0..images).map(|idx| format!("{id}{idx}.jpg")))
    }

    fn ready(entities: Vec<Entity>, config: ControllerConfig) -> (Controller, EventBus) {
        let mut controller = Controller::new(config).expect("config");
        let mut events = EventBus::default();
        controller.finish_load(Ok(entities), &mut events);
        (controller, events)
    }

    fn after_cooldown(controller: &Controller, start: Instant) -> Instant {
        start + controller.config().cooldown()
    }

    #[test]
    fn starts_loading_and_ignores_events() {
        let mut controller = Controller::new(config(1)).expect("config");
        let mut events = EventBus::default();
        assert_eq!(controller.phase(), &Phase::Loading);
        assert_eq!(
            controller.advance(Instant::now(), &mut events),
            AdvanceOutcome::NotReady
        );
        assert_eq!(controller.reset(&mut events), ResetOutcome::Ignored);
        assert!(events.is_empty());
    }

    #[test]
    fn rejects_invalid_config() {
        let bad = ControllerConfig {
            cooldown_ms: 10,
            ..ControllerConfig::default()
        };
        assert!(Controller::new(bad).is_err());
    }

    #[test]
    fn load_builds_one_card_per_entity_in_catalog_order() {
        let (controller, _) = ready(vec![entity("a", 3), entity("b", 2)], config(3));
        assert_eq!(controller.phase(), &Phase::Ready);
        assert_eq!(controller.round(), 1);
        let ids: Vec<&str> = controller
            .stack()
            .iter()
            .map(|card| card.entity.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(controller.top().map(|card| card.entity.id.as_str()), Some("b"));
        assert!(controller.used().is_empty());
    }

    #[test]
    fn load_failure_enters_error_and_reset_requests_reload() {
        let mut controller = Controller::new(config(1)).expect("config");
        let mut events = EventBus::default();
        controller.finish_load(Err(LoadError::Message("offline".into())), &mut events);
        assert_eq!(controller.phase(), &Phase::Error("offline".to_string()));
        assert_eq!(
            controller.advance(Instant::now(), &mut events),
            AdvanceOutcome::NotReady
        );
        assert_eq!(controller.reset(&mut events), ResetOutcome::ReloadRequested);
        assert_eq!(controller.phase(), &Phase::Loading);
        controller.finish_load(Ok(vec![entity("a", 2)]), &mut events);
        assert_eq!(controller.phase(), &Phase::Ready);
        assert_eq!(controller.stack().len(), 1);
    }

    #[test]
    fn late_load_result_is_dropped_once_ready() {
        let (mut controller, mut events) = ready(vec![entity("a", 2)], config(1));
        controller.finish_load(Ok(vec![entity("x", 1), entity("y", 1)]), &mut events);
        assert_eq!(controller.catalog().len(), 1);
    }

    #[test]
    fn advance_pops_top_and_records_usage() {
        let (mut controller, mut events) =
            ready(vec![entity("a", 3), entity("b", 2), entity("c", 2)], config(5));
        let top = controller.top().cloned().expect("top");
        let outcome = controller.advance(Instant::now(), &mut events);
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                liked: top.render_id,
                refilled: false
            }
        );
        assert_eq!(controller.stack().len(), 2);
        assert_eq!(controller.liked_count(), 1);
        assert_eq!(controller.liked()[0].render_id, top.render_id);
        assert!(controller
            .used()
            .contains(&top.entity.id, top.image.expect("image")));
    }

    #[test]
    fn second_advance_inside_cooldown_is_ignored() {
        let (mut controller, mut events) =
            ready(vec![entity("a", 3), entity("b", 2), entity("c", 2)], config(5));
        let start = Instant::now();
        assert!(matches!(
            controller.advance(start, &mut events),
            AdvanceOutcome::Advanced { .. }
        ));
        let early = start + Duration::from_millis(10);
        assert!(!controller.release_cooldown(early));
        assert_eq!(controller.advance(early, &mut events), AdvanceOutcome::Ignored);
        assert_eq!(controller.stack().len(), 2);
        assert_eq!(controller.liked_count(), 1);

        let later = after_cooldown(&controller, start);
        assert!(controller.release_cooldown(later));
        assert!(!controller.release_cooldown(later));
        assert!(matches!(
            controller.advance(later, &mut events),
            AdvanceOutcome::Advanced { .. }
        ));
        assert_eq!(controller.stack().len(), 1);
        assert!(events.drain().any(|event| event == Event::AdvanceIgnored));
    }

    #[test]
    fn emptying_stack_refills_and_excludes_previous_image() {
        for seed in 0..32 {
            let (mut controller, mut events) = ready(vec![entity("a", 2)], config(seed));
            let before = controller.top().cloned().expect("top");
            let now = Instant::now();
            let outcome = controller.advance(now, &mut events);
            assert_eq!(
                outcome,
                AdvanceOutcome::Advanced {
                    liked: before.render_id,
                    refilled: true
                }
            );
            let after = controller.top().expect("refilled");
            assert_eq!(controller.stack().len(), 1);
            assert_ne!(after.image, before.image);
            assert_ne!(after.render_id, before.render_id);
            assert_eq!(controller.round(), 2);
        }
    }

    #[test]
    fn single_image_entity_repeats_after_refill() {
        let (mut controller, mut events) = ready(vec![entity("a", 1)], config(2));
        controller.advance(Instant::now(), &mut events);
        assert_eq!(controller.top().and_then(|card| card.image), Some(0));
    }

    #[test]
    fn pruning_keeps_used_history_bounded() {
        let config = ControllerConfig {
            prune_threshold: 4,
            ..config(8)
        };
        let (mut controller, mut events) = ready(vec![entity("a", 20)], config);
        let mut now = Instant::now();
        for _ in 0..40 {
            controller.advance(now, &mut events);
            now += controller.config().cooldown();
            controller.release_cooldown(now);
            assert!(controller.used().len() <= 4);
        }
        assert!(events
            .drain()
            .any(|event| matches!(event, Event::UsedPruned { .. })));
    }

    #[test]
    fn degraded_card_is_shown_and_not_recorded() {
        let (mut controller, mut events) = ready(vec![entity("a", 2), entity("b", 0)], config(4));
        let top = controller.top().cloned().expect("top");
        assert!(top.is_degraded());
        assert!(events
            .drain()
            .any(|event| matches!(event, Event::CardDegraded { .. })));
        controller.advance(Instant::now(), &mut events);
        assert!(controller.used().is_empty());
        assert_eq!(controller.liked_count(), 1);
    }

    #[test]
    fn reset_restores_fresh_round() {
        let (mut controller, mut events) =
            ready(vec![entity("a", 3), entity("b", 2)], config(6));
        let now = Instant::now();
        controller.advance(now, &mut events);
        assert!(controller.is_busy());
        assert_eq!(controller.reset(&mut events), ResetOutcome::Reset);
        assert_eq!(controller.stack().len(), 2);
        assert_eq!(controller.liked_count(), 0);
        assert!(controller.used().is_empty());
        assert!(!controller.is_busy());
        assert_eq!(controller.round(), 1);
        // A stale cooldown timer after reset is harmless.
        assert!(!controller.release_cooldown(now + Duration::from_secs(1)));
    }

    #[test]
    fn empty_catalog_is_ready_but_has_nothing_to_advance() {
        let (mut controller, mut events) = ready(Vec::new(), config(1));
        assert_eq!(controller.phase(), &Phase::Ready);
        assert!(controller.visible_cards().is_empty());
        assert_eq!(
            controller.advance(Instant::now(), &mut events),
            AdvanceOutcome::Empty
        );
        assert!(!controller.is_busy());
    }

    #[test]
    fn visible_cards_are_back_to_front() {
        let (controller, _) =
            ready(vec![entity("a", 1), entity("b", 1), entity("c", 1)], config(1));
        let visible: Vec<&str> = controller
            .visible_cards()
            .iter()
            .map(|card| card.entity.id.as_str())
            .collect();
        assert_eq!(visible, vec!["b", "c"]);
    }

    #[test]
    fn render_ids_never_repeat() {
        let (mut controller, mut events) = ready(vec![entity("a", 3), entity("b", 3)], config(9));
        let mut seen = std::collections::HashSet::new();
        let mut now = Instant::now();
        for card in controller.stack() {
            assert!(seen.insert(card.render_id));
        }
        for _ in 0..10 {
            if let AdvanceOutcome::Advanced { refilled: true, .. } =
                controller.advance(now, &mut events)
            {
                for card in controller.stack() {
                    assert!(seen.insert(card.render_id));
                }
            }
            now += controller.config().cooldown();
            controller.release_cooldown(now);
        }
    }
}
