//! Data-driven game balance
//!
//! Pure functions and static tables: experience curve, enemy hit points,
//! number formatting, the unlock roster and spawn cadence, plus the
//! per-archetype, per-weapon and environment parameters.

use crate::consts::INITIAL_BULLET_SIZE;
use crate::sim::{EnemyKind, WeaponMode};

/// RGBA color, components in 0..=1
pub type Rgba = [f32; 4];

/// Build an opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Shared palette
pub mod palette {
    use super::{Rgba, rgb};

    pub const BACKGROUND: Rgba = rgb(0x0a0a0a);
    pub const PLAYER: Rgba = rgb(0x00d4ff);
    pub const PLAYER_EVOLVED: Rgba = rgb(0xbf00ff);
    pub const BULLET: Rgba = rgb(0x00ff00);
    pub const BULLET_TRAIL: Rgba = [0.0, 1.0, 0.0, 0.4];
    pub const ENEMY_BULLET: Rgba = rgb(0xff3366);
    pub const EXP: Rgba = rgb(0x00ff00);
    pub const OBSTACLE: Rgba = rgb(0x1a1a1a);
    pub const OBSTACLE_HP: Rgba = rgb(0xffaa00);
    pub const GRAVITY: Rgba = [0.75, 0.0, 1.0, 0.15];
    pub const ENERGY: Rgba = rgb(0x00d4ff);
    pub const BLAST: Rgba = rgb(0xff6600);
    pub const HEART: Rgba = rgb(0xff0044);
    pub const HEART_EMPTY: Rgba = rgb(0x333333);
    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const CRIT: Rgba = rgb(0xff0000);
    pub const DAMAGE: Rgba = rgb(0xffff00);
    pub const MERCY: Rgba = rgb(0xff0000);
}

/// Stat profile for an enemy archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Archetype {
    pub hp_multiplier: f32,
    pub speed_base: f32,
    pub size: f32,
    pub color: Rgba,
    /// Polygon side count used for drawing
    pub sides: u32,
    /// Speed multiplier while charging (chargers only)
    pub charge_speed_mult: f32,
    /// Ticks between shots (0 = never shoots)
    pub shoot_interval: u32,
}

const BASIC: Archetype = Archetype {
    hp_multiplier: 4.0,
    speed_base: 2.5,
    size: 35.0,
    color: rgb(0xbf00ff),
    sides: 6,
    charge_speed_mult: 1.0,
    shoot_interval: 0,
};

const CHARGER: Archetype = Archetype {
    hp_multiplier: 3.5,
    speed_base: 2.5,
    size: 35.0,
    color: rgb(0xffcc00),
    sides: 3,
    charge_speed_mult: 3.0,
    shoot_interval: 0,
};

const SPLITTER: Archetype = Archetype {
    hp_multiplier: 6.0,
    speed_base: 2.0,
    size: 40.0,
    color: rgb(0x00ff00),
    sides: 6,
    charge_speed_mult: 1.0,
    shoot_interval: 0,
};

const SHOOTER: Archetype = Archetype {
    hp_multiplier: 5.0,
    speed_base: 1.5,
    size: 40.0,
    color: rgb(0x00d4ff),
    sides: 4,
    charge_speed_mult: 1.0,
    shoot_interval: 90,
};

const HEALER: Archetype = Archetype {
    hp_multiplier: 4.0,
    speed_base: 1.5,
    size: 30.0,
    color: rgb(0x33ff99),
    sides: 4,
    charge_speed_mult: 1.0,
    shoot_interval: 0,
};

const SHIELDER: Archetype = Archetype {
    hp_multiplier: 12.0,
    speed_base: 0.8,
    size: 45.0,
    color: rgb(0x8888ff),
    sides: 5,
    charge_speed_mult: 1.0,
    shoot_interval: 0,
};

const KAMIKAZE: Archetype = Archetype {
    hp_multiplier: 2.0,
    speed_base: 5.0,
    size: 28.0,
    color: rgb(0xff3300),
    sides: 3,
    charge_speed_mult: 1.0,
    shoot_interval: 0,
};

const SNIPER: Archetype = Archetype {
    hp_multiplier: 3.5,
    speed_base: 1.8,
    size: 32.0,
    color: rgb(0xff0055),
    sides: 3,
    charge_speed_mult: 1.0,
    shoot_interval: 120,
};

const SUMMONER: Archetype = Archetype {
    hp_multiplier: 7.0,
    speed_base: 1.0,
    size: 42.0,
    color: rgb(0xffaa00),
    sides: 7,
    charge_speed_mult: 1.0,
    shoot_interval: 0,
};

const BOSS: Archetype = Archetype {
    hp_multiplier: 120.0,
    speed_base: 1.5,
    size: 85.0,
    color: rgb(0xffffff),
    sides: 8,
    charge_speed_mult: 1.0,
    shoot_interval: 110,
};

/// Look up the stat profile for an archetype
pub fn archetype(kind: EnemyKind) -> &'static Archetype {
    match kind {
        EnemyKind::Basic => &BASIC,
        EnemyKind::Charger => &CHARGER,
        EnemyKind::Splitter => &SPLITTER,
        EnemyKind::Shooter => &SHOOTER,
        EnemyKind::Healer => &HEALER,
        EnemyKind::Shielder => &SHIELDER,
        EnemyKind::Kamikaze => &KAMIKAZE,
        EnemyKind::Sniper => &SNIPER,
        EnemyKind::Summoner => &SUMMONER,
        EnemyKind::Boss => &BOSS,
    }
}

/// Last level on the exponential XP curve; later levels grow linearly
pub const XP_CURVE_CAP: u32 = 100;

fn xp_curve(level: u32) -> u64 {
    (100.0 * 1.15f64.powi(level as i32 - 1)).floor() as u64
}

/// Experience needed to clear `level`: `floor(100 * 1.15^(level-1))` up to
/// [`XP_CURVE_CAP`], then the curve's final step repeated per level
pub fn xp_required(level: u32) -> u64 {
    let level = level.max(1);
    if level <= XP_CURVE_CAP {
        return xp_curve(level);
    }
    let top = xp_curve(XP_CURVE_CAP);
    let step = top - xp_curve(XP_CURVE_CAP - 1);
    top + step * u64::from(level - XP_CURVE_CAP)
}

/// Level-dependent hit point growth: a linear term blended with a
/// gentle super-linear one
fn hp_growth(level: u32) -> f64 {
    let n = (level.max(1) - 1) as f64;
    1.0 + 0.35 * n + 0.06 * n.powf(1.6)
}

/// Bosses get this on top of the regular curve
pub const BOSS_HP_MULTIPLIER: f64 = 2.5;

/// Hit points for a freshly spawned enemy of `kind` at `level`
pub fn enemy_hp(kind: EnemyKind, level: u32) -> f32 {
    let base = archetype(kind).hp_multiplier as f64 * 5.0;
    let mut hp = base * hp_growth(level);
    if kind == EnemyKind::Boss {
        hp *= BOSS_HP_MULTIPLIER;
    }
    hp.floor() as f32
}

/// Compact magnitude string: `1.5K`, `2.5M`, `3.0G`, or a rounded-up integer below 1000
pub fn format_value(n: f64) -> String {
    if !n.is_finite() || n <= 0.0 {
        return "0".to_string();
    }
    if n >= 1_000_000_000.0 {
        format!("{:.1}G", n / 1_000_000_000.0)
    } else if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{}", n.ceil() as u64)
    }
}

/// Level at which each archetype joins the spawn roster
const ROSTER_UNLOCKS: [(u32, EnemyKind); 9] = [
    (1, EnemyKind::Basic),
    (2, EnemyKind::Charger),
    (3, EnemyKind::Splitter),
    (4, EnemyKind::Shooter),
    (6, EnemyKind::Kamikaze),
    (7, EnemyKind::Healer),
    (8, EnemyKind::Sniper),
    (9, EnemyKind::Shielder),
    (11, EnemyKind::Summoner),
];

/// Archetypes eligible for regular spawns at `level` (never includes bosses)
pub fn available_enemies(level: u32) -> Vec<EnemyKind> {
    ROSTER_UNLOCKS
        .iter()
        .filter(|(unlock, _)| level.max(1) >= *unlock)
        .map(|(_, kind)| *kind)
        .collect()
}

/// Regular spawn cadence at level 1 (frames)
pub const BASE_SPAWN_INTERVAL: u64 = 45;
/// Densest spawn cadence
pub const MIN_SPAWN_INTERVAL: u64 = 20;

/// Frames between regular enemy spawns at `level`
pub fn spawn_interval(level: u32) -> u64 {
    let step = 2 * (level.max(1) as u64 - 1);
    BASE_SPAWN_INTERVAL
        .saturating_sub(step)
        .max(MIN_SPAWN_INTERVAL)
}

/// Firing parameters for a weapon mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponConfig {
    /// Vertical velocity (negative = up)
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub trail_length: usize,
    /// How far above the player bullets appear
    pub spawn_offset: f32,
    /// Multiplier on the computed player damage
    pub damage_factor: f32,
    /// Enemies inside this radius get pulled (black hole only)
    pub pull_radius: f32,
    pub pull_strength: f32,
}

const STANDARD_WEAPON: WeaponConfig = WeaponConfig {
    bullet_speed: -20.0,
    bullet_radius: INITIAL_BULLET_SIZE,
    trail_length: 6,
    spawn_offset: 20.0,
    damage_factor: 1.0,
    pull_radius: 0.0,
    pull_strength: 0.0,
};

const BLACK_HOLE_WEAPON: WeaponConfig = WeaponConfig {
    bullet_speed: -4.0,
    bullet_radius: 32.0,
    trail_length: 10,
    spawn_offset: 40.0,
    damage_factor: 1.5,
    pull_radius: 180.0,
    pull_strength: 3.5,
};

pub fn weapon_config(mode: WeaponMode) -> &'static WeaponConfig {
    match mode {
        WeaponMode::Standard => &STANDARD_WEAPON,
        WeaponMode::BlackHole => &BLACK_HOLE_WEAPON,
    }
}

/// Combat tuning
pub mod combat {
    pub const CRIT_CHANCE: f64 = 0.12;
    pub const CRIT_MULTIPLIER: f32 = 1.6;

    pub const CHAIN_CHANCE: f64 = 0.35;
    pub const CHAIN_CHANCE_SYNERGY: f64 = 0.6;
    pub const CHAIN_RANGE: f32 = 300.0;
    pub const CHAIN_RANGE_SYNERGY: f32 = 450.0;
    pub const CHAIN_DAMAGE_FACTOR: f32 = 1.1;

    pub const BLAST_RADIUS: f32 = 90.0;
    pub const BLAST_DAMAGE_FACTOR: f32 = 0.8;

    /// Tag count needed to unlock a tag synergy
    pub const SYNERGY_THRESHOLD: u32 = 3;

    /// Evolution: this many CANNON stacks ...
    pub const EVOLVE_CANNON_STACKS: u32 = 5;
    /// ... plus this many RANGE_BOOST stacks
    pub const EVOLVE_RANGE_STACKS: u32 = 1;
    pub const EVOLVE_DAMAGE_MULTIPLIER: f32 = 2.0;

    /// Side guns are spaced this far apart
    pub const SIDE_GUN_SPACING: f32 = 35.0;

    pub const CONTACT_DAMAGE: u32 = 1;
    pub const BOSS_CONTACT_DAMAGE: u32 = 2;
    /// Fraction of enemy size that counts for player contact
    pub const CONTACT_SIZE_FACTOR: f32 = 0.7;
    /// Fraction of player radius that counts for enemy bullet hits
    pub const PLAYER_HITBOX_FACTOR: f32 = 0.6;
}

/// Kill rewards
pub mod rewards {
    pub const ENEMY_SCORE: u64 = 25;
    pub const BOSS_SCORE: u64 = 2000;
    pub const OBSTACLE_SCORE: u64 = 50;

    pub const GEM_VALUE: u32 = 30;
    pub const GEM_SIZE: f32 = 9.0;
    pub const BOSS_GEM_COUNT: usize = 15;
    pub const BOSS_GEM_VALUE: u32 = 70;
    pub const BOSS_GEM_SIZE: f32 = 10.0;
    pub const BOSS_GEM_SCATTER: f32 = 180.0;

    pub const HEART_DROP_CHANCE: f64 = 0.05;
    pub const HEART_SIZE: f32 = 12.0;
    /// Half-hearts restored by a heart pickup
    pub const HEART_HEAL: u32 = 2;
}

/// Environmental hazards
pub mod environment {
    pub const GRAVITY_FIELD_RADIUS: f32 = 110.0;
    pub const GRAVITY_FIELD_STRENGTH: f32 = 2.5;
    pub const GRAVITY_FIELD_DESCENT: f32 = 1.2;
    /// Player interpolation factor while inside a field
    pub const GRAVITY_FIELD_SLOWDOWN: f32 = 0.5;

    pub const OBSTACLE_HP: f32 = 25.0;
    pub const OBSTACLE_WIDTH: f32 = 90.0;
    pub const OBSTACLE_HEIGHT: f32 = 45.0;
    pub const OBSTACLE_DESCENT: f32 = 1.5;
    pub const OBSTACLE_CONTACT_DAMAGE: u32 = 1;
}
