//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only (one `advance()` = one nominal 60 Hz tick)
//! - One seeded RNG per engine
//! - Outbound notifications go through an injected sink
//! - No platform dependencies; drawing goes through the `Surface` trait

pub mod autopilot;
pub mod boss;
pub mod collision;
pub mod enemy;
pub mod engine;
pub mod events;
pub mod factory;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use boss::{BossPattern, BossVariant};
pub use enemy::{Behavior, Enemy, EnemyCommand, EnemyId, EnemyKind, TickContext};
pub use engine::Engine;
pub use events::{EventBus, EventKind, EventQueue, EventSink, GameEvent, SoundCue, SubscriptionId};
pub use schedule::FrameTicket;
pub use state::{GameState, Player, WeaponMode};
pub use upgrade::{UPGRADE_POOL, UpgradeBook, UpgradeKind, UpgradeOption, UpgradeTag};
