//! Boss variants, movement and attack patterns
//!
//! The variant is picked from the level the boss spawns at. Each variant has
//! a movement style and a small pool of attack patterns; on every attack the
//! boss draws one pattern at random and waits out that pattern's follow-up.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{EnemyKind, TickContext};
use super::events::SoundCue;
use crate::consts::TICK_MS;
use crate::polar;
use crate::tuning::{Rgba, rgb};

/// Ticks before a fresh boss attacks for the first time
pub const BOSS_INITIAL_COOLDOWN: f32 = 60.0;
/// Depth a boss descends to before its movement style kicks in
pub const HOVER_DEPTH: f32 = 140.0;
pub const DESCENT_SPEED: f32 = 0.8;

pub const TELEPORT_INTERVAL: u32 = 180;
pub const DASH_INTERVAL: u32 = 150;
pub const DASH_SPEED: f32 = 9.0;
pub const TRACK_SPEED: f32 = 1.5;
/// Deepest a slow-approach boss will sink
pub const APPROACH_FLOOR: f32 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossVariant {
    Core,
    Sentinel,
    Hive,
    Phantom,
    Colossus,
    Tempest,
    Weaver,
    Singularity,
}

impl BossVariant {
    pub const ALL: [BossVariant; 8] = [
        BossVariant::Core,
        BossVariant::Sentinel,
        BossVariant::Hive,
        BossVariant::Phantom,
        BossVariant::Colossus,
        BossVariant::Tempest,
        BossVariant::Weaver,
        BossVariant::Singularity,
    ];

    /// Variant for a boss spawned at `level`
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=10 => BossVariant::Core,
            11..=15 => BossVariant::Sentinel,
            16..=20 => BossVariant::Hive,
            21..=25 => BossVariant::Phantom,
            26..=30 => BossVariant::Colossus,
            31..=35 => BossVariant::Tempest,
            36..=40 => BossVariant::Weaver,
            _ => BossVariant::Singularity,
        }
    }

    /// 1-based tier
    pub fn tier(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            BossVariant::Core => "CORE",
            BossVariant::Sentinel => "SENTINEL",
            BossVariant::Hive => "HIVE",
            BossVariant::Phantom => "PHANTOM",
            BossVariant::Colossus => "COLOSSUS",
            BossVariant::Tempest => "TEMPEST",
            BossVariant::Weaver => "WEAVER",
            BossVariant::Singularity => "SINGULARITY",
        }
    }

    pub fn sides(self) -> u32 {
        match self {
            BossVariant::Core => 8,
            BossVariant::Sentinel => 4,
            BossVariant::Hive => 6,
            BossVariant::Phantom => 3,
            BossVariant::Colossus => 10,
            BossVariant::Tempest => 5,
            BossVariant::Weaver => 7,
            BossVariant::Singularity => 12,
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            BossVariant::Core => rgb(0xff8800),
            BossVariant::Sentinel => rgb(0x00ffff),
            BossVariant::Hive => rgb(0xaa00aa),
            BossVariant::Phantom => rgb(0xcccccc),
            BossVariant::Colossus => rgb(0xff0000),
            BossVariant::Tempest => rgb(0x000088),
            BossVariant::Weaver => rgb(0x00ff00),
            BossVariant::Singularity => rgb(0x000000),
        }
    }

    pub fn movement(self) -> Movement {
        match self {
            BossVariant::Core => Movement::Hover { sway: 6.0 },
            BossVariant::Sentinel => Movement::Hover { sway: 3.0 },
            BossVariant::Hive => Movement::Drift,
            BossVariant::Phantom => Movement::Teleport,
            BossVariant::Colossus => Movement::SlowApproach,
            BossVariant::Tempest => Movement::Dash,
            BossVariant::Weaver => Movement::Drift,
            BossVariant::Singularity => Movement::Track,
        }
    }

    pub fn patterns(self) -> &'static [BossPattern] {
        match self {
            BossVariant::Core => &CORE_PATTERNS,
            BossVariant::Sentinel => &SENTINEL_PATTERNS,
            BossVariant::Hive => &HIVE_PATTERNS,
            BossVariant::Phantom => &PHANTOM_PATTERNS,
            BossVariant::Colossus => &COLOSSUS_PATTERNS,
            BossVariant::Tempest => &TEMPEST_PATTERNS,
            BossVariant::Weaver => &WEAVER_PATTERNS,
            BossVariant::Singularity => &SINGULARITY_PATTERNS,
        }
    }
}

/// How a boss moves once it has descended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Horizontal sine sway at a fixed depth
    Hover { sway: f32 },
    /// Slow figure-eight around the hover point
    Drift,
    /// Jumps to a random spot every [`TELEPORT_INTERVAL`] ticks
    Teleport,
    /// Keeps sinking slowly toward [`APPROACH_FLOOR`]
    SlowApproach,
    /// Rests, then dashes sideways to a random column
    Dash,
    /// Follows the player's column at a capped speed
    Track,
}

/// One attack. `follow_up` is the cooldown (ticks) set after firing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossPattern {
    /// Rotating ring whose phase follows the clock
    Spiral { count: u32, speed: f32, follow_up: f32 },
    NovaRing { count: u32, speed: f32, follow_up: f32 },
    /// Two concentric rings of heavy shots
    HeavyRing { count: u32, follow_up: f32 },
    /// Fan aimed at the player
    TargetedBurst { shots: i32, spread: f32, speed: f32, follow_up: f32 },
    /// Stretched column dropped on the player's x
    LaserColumn { length: u32, follow_up: f32 },
    SummonWave { minions: u32, follow_up: f32 },
    /// Drops from the top edge at random columns
    FallingRain { drops: u32, follow_up: f32 },
    /// Slow-drifting grid of mines
    StaticWeb { rows: u32, cols: u32, follow_up: f32 },
}

impl BossPattern {
    pub fn follow_up(&self) -> f32 {
        match *self {
            BossPattern::Spiral { follow_up, .. }
            | BossPattern::NovaRing { follow_up, .. }
            | BossPattern::HeavyRing { follow_up, .. }
            | BossPattern::TargetedBurst { follow_up, .. }
            | BossPattern::LaserColumn { follow_up, .. }
            | BossPattern::SummonWave { follow_up, .. }
            | BossPattern::FallingRain { follow_up, .. }
            | BossPattern::StaticWeb { follow_up, .. } => follow_up,
        }
    }
}

const CORE_PATTERNS: [BossPattern; 3] = [
    BossPattern::Spiral { count: 12, speed: 5.0, follow_up: 40.0 },
    BossPattern::NovaRing { count: 20, speed: 6.0, follow_up: 120.0 },
    BossPattern::TargetedBurst { shots: 5, spread: 0.15, speed: 9.0, follow_up: 90.0 },
];

const SENTINEL_PATTERNS: [BossPattern; 3] = [
    BossPattern::NovaRing { count: 24, speed: 6.0, follow_up: 110.0 },
    BossPattern::LaserColumn { length: 12, follow_up: 150.0 },
    BossPattern::TargetedBurst { shots: 5, spread: 0.12, speed: 10.0, follow_up: 80.0 },
];

const HIVE_PATTERNS: [BossPattern; 2] = [
    BossPattern::SummonWave { minions: 3, follow_up: 200.0 },
    BossPattern::Spiral { count: 16, speed: 5.0, follow_up: 60.0 },
];

const PHANTOM_PATTERNS: [BossPattern; 3] = [
    BossPattern::TargetedBurst { shots: 7, spread: 0.1, speed: 10.0, follow_up: 70.0 },
    BossPattern::NovaRing { count: 16, speed: 7.0, follow_up: 100.0 },
    BossPattern::Spiral { count: 12, speed: 6.0, follow_up: 50.0 },
];

const COLOSSUS_PATTERNS: [BossPattern; 3] = [
    BossPattern::HeavyRing { count: 24, follow_up: 180.0 },
    BossPattern::FallingRain { drops: 10, follow_up: 120.0 },
    BossPattern::TargetedBurst { shots: 5, spread: 0.2, speed: 8.0, follow_up: 90.0 },
];

const TEMPEST_PATTERNS: [BossPattern; 3] = [
    BossPattern::FallingRain { drops: 14, follow_up: 60.0 },
    BossPattern::Spiral { count: 18, speed: 6.0, follow_up: 35.0 },
    BossPattern::NovaRing { count: 20, speed: 6.5, follow_up: 100.0 },
];

const WEAVER_PATTERNS: [BossPattern; 3] = [
    BossPattern::StaticWeb { rows: 3, cols: 6, follow_up: 160.0 },
    BossPattern::SummonWave { minions: 2, follow_up: 220.0 },
    BossPattern::TargetedBurst { shots: 5, spread: 0.15, speed: 9.0, follow_up: 80.0 },
];

const SINGULARITY_PATTERNS: [BossPattern; 5] = [
    BossPattern::Spiral { count: 24, speed: 5.5, follow_up: 30.0 },
    BossPattern::StaticWeb { rows: 3, cols: 7, follow_up: 140.0 },
    BossPattern::LaserColumn { length: 16, follow_up: 120.0 },
    BossPattern::NovaRing { count: 32, speed: 6.0, follow_up: 100.0 },
    BossPattern::SummonWave { minions: 3, follow_up: 220.0 },
];

/// Per-boss movement state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossBrain {
    pub variant: BossVariant,
    /// Finished the entry descent
    pub arrived: bool,
    /// Ticks since the last teleport or dash
    pub move_timer: u32,
    /// Column a dashing boss is heading for
    pub dash_target: Option<f32>,
}

impl BossBrain {
    pub fn new(variant: BossVariant) -> Self {
        Self {
            variant,
            arrived: false,
            move_timer: 0,
            dash_target: None,
        }
    }

    fn steer(&mut self, pos: &mut Vec2, size: f32, ctx: &mut TickContext) {
        let t = ctx.frame as f32;
        let (lo, hi) = (size * 0.5, ctx.field.x - size * 0.5);

        if !self.arrived {
            pos.y = (pos.y + DESCENT_SPEED).min(HOVER_DEPTH);
            self.arrived = pos.y >= HOVER_DEPTH;
            pos.x = pos.x.clamp(lo, hi);
            return;
        }

        match self.variant.movement() {
            Movement::Hover { sway } => {
                pos.x += (t * 0.035).sin() * sway;
            }
            Movement::Drift => {
                pos.x += (t * 0.02).sin() * 3.0;
                pos.y += (t * 0.04).cos() * 1.2;
            }
            Movement::Teleport => {
                self.move_timer += 1;
                if self.move_timer >= TELEPORT_INTERVAL {
                    self.move_timer = 0;
                    pos.x = ctx.rng.random_range(lo..hi);
                    pos.y = ctx.rng.random_range(100.0..220.0);
                }
            }
            Movement::SlowApproach => {
                pos.x += (t * 0.02).sin() * 1.5;
                pos.y = (pos.y + 0.3).min(APPROACH_FLOOR);
            }
            Movement::Dash => match self.dash_target {
                Some(target) => {
                    let dx = target - pos.x;
                    if dx.abs() <= DASH_SPEED {
                        pos.x = target;
                        self.dash_target = None;
                    } else {
                        pos.x += DASH_SPEED * dx.signum();
                    }
                }
                None => {
                    self.move_timer += 1;
                    if self.move_timer >= DASH_INTERVAL {
                        self.move_timer = 0;
                        self.dash_target = Some(ctx.rng.random_range(lo..hi));
                    }
                }
            },
            Movement::Track => {
                pos.x += (ctx.player.pos.x - pos.x).clamp(-TRACK_SPEED, TRACK_SPEED);
            }
        }
        pos.x = pos.x.clamp(lo, hi);
    }
}

/// One boss tick: move, count down, and attack when the cooldown runs out
pub fn update(brain: &mut BossBrain, pos: &mut Vec2, cooldown: &mut f32, size: f32, ctx: &mut TickContext) {
    brain.steer(pos, size, ctx);

    *cooldown -= 1.0;
    if *cooldown > 0.0 {
        return;
    }
    let patterns = brain.variant.patterns();
    let pattern = patterns[ctx.rng.random_range(0..patterns.len())];
    fire_pattern(pattern, *pos, ctx);
    ctx.play(SoundCue::BossFire);
    *cooldown = pattern.follow_up();
}

fn ring(ctx: &mut TickContext, origin: Vec2, count: u32, speed: f32, phase: f32, radius: f32, damage: u32) {
    let step = TAU / count.max(1) as f32;
    for i in 0..count {
        let vel = polar(speed, phase + step * i as f32);
        ctx.spawn_projectile(origin, vel, radius, damage);
    }
}

fn fire_pattern(pattern: BossPattern, origin: Vec2, ctx: &mut TickContext) {
    match pattern {
        BossPattern::Spiral { count, speed, .. } => {
            let phase = ctx.frame as f32 * TICK_MS / 200.0;
            ring(ctx, origin, count, speed, phase, 8.0, 2);
        }
        BossPattern::NovaRing { count, speed, .. } => {
            ring(ctx, origin, count, speed, 0.0, 10.0, 2);
        }
        BossPattern::HeavyRing { count, .. } => {
            let half_step = TAU / count.max(1) as f32 * 0.5;
            ring(ctx, origin, count, 4.0, half_step, 12.0, 2);
            ring(ctx, origin, count, 6.5, 0.0, 12.0, 2);
        }
        BossPattern::TargetedBurst { shots, spread, speed, .. } => {
            let to_player = ctx.player.pos - origin;
            let base = to_player.y.atan2(to_player.x);
            for i in -(shots / 2)..=(shots / 2) {
                let vel = polar(speed, base + i as f32 * spread);
                ctx.spawn_projectile(origin, vel, 12.0, 3);
            }
        }
        BossPattern::LaserColumn { length, .. } => {
            let start = Vec2::new(ctx.player.pos.x, origin.y);
            for k in 0..length {
                ctx.spawn_projectile(start, Vec2::new(0.0, 6.0 + k as f32 * 0.5), 7.0, 2);
            }
        }
        BossPattern::SummonWave { minions, .. } => {
            let centre = (minions as f32 - 1.0) * 0.5;
            for k in 0..minions {
                let pos = Vec2::new(origin.x + (k as f32 - centre) * 60.0, origin.y + 60.0);
                ctx.spawn_enemy(EnemyKind::Basic, pos);
            }
        }
        BossPattern::FallingRain { drops, .. } => {
            for _ in 0..drops {
                let x = ctx.rng.random_range(0.0..ctx.field.x);
                let vel = Vec2::new(ctx.rng.random_range(-0.5..0.5), 5.0 + ctx.rng.random_range(0.0..2.0));
                ctx.spawn_projectile(Vec2::new(x, -20.0), vel, 7.0, 1);
            }
        }
        BossPattern::StaticWeb { rows, cols, .. } => {
            let spacing = ctx.field.x / (cols + 1) as f32;
            for r in 0..rows {
                let shift = if r % 2 == 1 { spacing * 0.5 } else { 0.0 };
                for c in 0..cols {
                    let pos = Vec2::new(spacing * (c + 1) as f32 - shift, origin.y + 100.0 + r as f32 * 80.0);
                    ctx.spawn_projectile(pos, Vec2::new(0.0, 0.8), 6.0, 1);
                }
            }
        }
    }
}
