//! Outbound notifications
//!
//! The engine is handed an [`EventSink`] at construction and pushes every
//! notification into it synchronously. [`EventQueue`] buffers them for the
//! caller to drain; [`EventBus`] fans them out to per-kind subscribers.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

/// Fixed sound vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Fire,
    BossFire,
    Kill,
    Explosion,
    Volt,
    LevelUp,
    Evo,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Fire => "fire",
            SoundCue::BossFire => "boss_fire",
            SoundCue::Kill => "kill",
            SoundCue::Explosion => "explosion",
            SoundCue::Volt => "volt",
            SoundCue::LevelUp => "levelup",
            SoundCue::Evo => "evo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    ExperienceChanged { current: u64, required: u64 },
    LevelUp(u32),
    GameOver,
    PlaySound(SoundCue),
    ScreenShake(f32),
    EnemyKilled,
}

/// Event name, used for subscription routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    ScoreChanged,
    ExperienceChanged,
    LevelUp,
    GameOver,
    PlaySound,
    ScreenShake,
    EnemyKilled,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::ScoreChanged(_) => EventKind::ScoreChanged,
            GameEvent::ExperienceChanged { .. } => EventKind::ExperienceChanged,
            GameEvent::LevelUp(_) => EventKind::LevelUp,
            GameEvent::GameOver => EventKind::GameOver,
            GameEvent::PlaySound(_) => EventKind::PlaySound,
            GameEvent::ScreenShake(_) => EventKind::ScreenShake,
            GameEvent::EnemyKilled => EventKind::EnemyKilled,
        }
    }
}

/// Receiver for engine notifications
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// FIFO buffer of pending notifications
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    /// Number of pending events of one kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.pending.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl EventSink for EventQueue {
    fn emit(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Synchronous per-kind fan-out. Handlers of one kind run in subscription order.
#[derive(Default)]
pub struct EventBus {
    handlers: BTreeMap<EventKind, Vec<(SubscriptionId, Handler)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.handlers.values_mut() {
            if let Some(idx) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(idx);
                return true;
            }
        }
        false
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: GameEvent) {
        if let Some(list) = self.handlers.get_mut(&event.kind()) {
            for (_, handler) in list.iter_mut() {
                handler(&event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("kinds", &self.handlers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_sound_names() {
        assert_eq!(SoundCue::BossFire.name(), "boss_fire");
        assert_eq!(SoundCue::LevelUp.name(), "levelup");
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut q = EventQueue::new();
        q.emit(GameEvent::ScoreChanged(1));
        q.emit(GameEvent::EnemyKilled);
        q.emit(GameEvent::ScoreChanged(2));
        assert_eq!(q.count(EventKind::ScoreChanged), 2);
        let drained: Vec<_> = q.drain().collect();
        assert_eq!(
            drained,
            vec![
                GameEvent::ScoreChanged(1),
                GameEvent::EnemyKilled,
                GameEvent::ScoreChanged(2)
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn test_bus_routes_by_kind_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let l = Rc::clone(&log);
        bus.subscribe(EventKind::LevelUp, move |e| l.borrow_mut().push(("a", *e)));
        let l = Rc::clone(&log);
        let second = bus.subscribe(EventKind::LevelUp, move |e| l.borrow_mut().push(("b", *e)));
        let l = Rc::clone(&log);
        bus.subscribe(EventKind::GameOver, move |e| l.borrow_mut().push(("c", *e)));

        bus.emit(GameEvent::LevelUp(2));
        assert_eq!(
            *log.borrow(),
            vec![("a", GameEvent::LevelUp(2)), ("b", GameEvent::LevelUp(2))]
        );

        assert!(bus.unsubscribe(second));
        assert!(!bus.unsubscribe(second));
        log.borrow_mut().clear();
        bus.emit(GameEvent::LevelUp(3));
        bus.emit(GameEvent::ScoreChanged(10));
        assert_eq!(*log.borrow(), vec![("a", GameEvent::LevelUp(3))]);
        assert_eq!(bus.subscriber_count(EventKind::LevelUp), 1);
    }
}
