//! Enemy construction from archetype stats

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::boss::{BOSS_INITIAL_COOLDOWN, BossBrain, BossVariant};
use super::enemy::{
    Behavior, Enemy, EnemyId, EnemyKind, KamikazeState, SUMMON_INTERVAL, SniperState,
};
use crate::tuning::{archetype, enemy_hp};

/// Where a boss enters the field
pub const BOSS_ENTRY_Y: f32 = -150.0;

/// Splitter children
pub const MINION_HP_FACTOR: f32 = 0.7;
pub const MINION_SIZE: f32 = 24.0;
pub const MINION_SPEED: f32 = 4.0;

/// Random extra speed added to every regular spawn
const SPEED_JITTER: f32 = 2.0;
/// Shooters fire their first shot within this many ticks
const SHOOTER_FIRST_SHOT: f32 = 50.0;

fn behavior_for(kind: EnemyKind, variant: Option<BossVariant>) -> Behavior {
    let stats = archetype(kind);
    match kind {
        EnemyKind::Basic => Behavior::Basic,
        EnemyKind::Charger => Behavior::Charger {
            charge_mult: stats.charge_speed_mult,
        },
        EnemyKind::Splitter => Behavior::Splitter,
        EnemyKind::Shooter => Behavior::Shooter {
            interval: stats.shoot_interval as f32,
        },
        EnemyKind::Healer => Behavior::Healer,
        EnemyKind::Shielder => Behavior::Shielder,
        EnemyKind::Kamikaze => Behavior::Kamikaze {
            state: KamikazeState::Tracking,
            vel: Vec2::ZERO,
        },
        EnemyKind::Sniper => Behavior::Sniper {
            state: SniperState::Moving,
            aim_timer: 0,
            aim: Vec2::ZERO,
        },
        EnemyKind::Summoner => Behavior::Summoner {
            summon_cooldown: SUMMON_INTERVAL,
        },
        EnemyKind::Boss => Behavior::Boss(BossBrain::new(variant.unwrap_or(BossVariant::Core))),
    }
}

/// Build an enemy of `kind` at an explicit position
pub fn create_enemy_at(kind: EnemyKind, level: u32, pos: Vec2, id: EnemyId, rng: &mut Pcg32) -> Enemy {
    let stats = archetype(kind);
    let hp = enemy_hp(kind, level);
    let boss_variant = (kind == EnemyKind::Boss).then(|| BossVariant::for_level(level));

    let (color, sides, speed, cooldown) = match boss_variant {
        Some(variant) => (variant.color(), variant.sides(), stats.speed_base, BOSS_INITIAL_COOLDOWN),
        None => (
            stats.color,
            stats.sides,
            stats.speed_base + rng.random::<f32>() * SPEED_JITTER,
            match kind {
                EnemyKind::Shooter => rng.random_range(0.0..SHOOTER_FIRST_SHOT),
                _ => stats.shoot_interval as f32,
            },
        ),
    };

    Enemy {
        id,
        kind,
        pos,
        hp,
        max_hp: hp,
        size: stats.size,
        color,
        sides,
        shake: Vec2::ZERO,
        hit_flash: 0.0,
        speed,
        cooldown,
        boss_variant,
        behavior: behavior_for(kind, boss_variant),
    }
}

/// Build an enemy at its natural entry point above the field
pub fn create_enemy(kind: EnemyKind, level: u32, field_width: f32, id: EnemyId, rng: &mut Pcg32) -> Enemy {
    let size = archetype(kind).size;
    let pos = if kind == EnemyKind::Boss {
        Vec2::new(field_width / 2.0, BOSS_ENTRY_Y)
    } else {
        let span = (field_width - 2.0 * size).max(0.0);
        Vec2::new(size + rng.random::<f32>() * span, -size)
    };
    create_enemy_at(kind, level, pos, id, rng)
}

/// A reduced-stat basic enemy beside a splitter's death point
pub fn create_splitter_minion(origin: Vec2, offset: f32, level: u32, id: EnemyId, rng: &mut Pcg32) -> Enemy {
    let mut minion = create_enemy_at(EnemyKind::Basic, level, origin + Vec2::new(offset, 0.0), id, rng);
    let hp = enemy_hp(EnemyKind::Basic, level) * MINION_HP_FACTOR;
    minion.hp = hp;
    minion.max_hp = hp;
    minion.size = MINION_SIZE;
    minion.speed = MINION_SPEED;
    minion
}
