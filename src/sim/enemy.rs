//! Enemy records and per-archetype behavior
//!
//! Each live [`Enemy`] carries its archetype's private state inline in a
//! [`Behavior`] tagged union, so data and behavior share one lifetime and the
//! whole roster sits in a single `Vec`. Behaviors never touch the engine
//! directly: anything that reaches outside the enemy itself (projectiles,
//! minions, heals) goes out as an [`EnemyCommand`] through the [`TickContext`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{self, BossBrain, BossVariant};
use super::events::SoundCue;
use super::state::EnemyBullet;
use crate::direction_to;
use crate::tuning::Rgba;

pub type EnemyId = u32;

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Charger,
    Splitter,
    Shooter,
    Boss,
    Healer,
    Shielder,
    Kamikaze,
    Sniper,
    Summoner,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 10] = [
        EnemyKind::Basic,
        EnemyKind::Charger,
        EnemyKind::Splitter,
        EnemyKind::Shooter,
        EnemyKind::Boss,
        EnemyKind::Healer,
        EnemyKind::Shielder,
        EnemyKind::Kamikaze,
        EnemyKind::Sniper,
        EnemyKind::Summoner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "BASIC",
            EnemyKind::Charger => "CHARGER",
            EnemyKind::Splitter => "SPLITTER",
            EnemyKind::Shooter => "SHOOTER",
            EnemyKind::Boss => "BOSS",
            EnemyKind::Healer => "HEALER",
            EnemyKind::Shielder => "SHIELDER",
            EnemyKind::Kamikaze => "KAMIKAZE",
            EnemyKind::Sniper => "SNIPER",
            EnemyKind::Summoner => "SUMMONER",
        }
    }

    /// Parse an archetype name. Unknown names become `Basic`.
    pub fn from_name(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "CHARGER" => EnemyKind::Charger,
            "SPLITTER" => EnemyKind::Splitter,
            "SHOOTER" => EnemyKind::Shooter,
            "BOSS" => EnemyKind::Boss,
            "HEALER" => EnemyKind::Healer,
            "SHIELDER" => EnemyKind::Shielder,
            "KAMIKAZE" => EnemyKind::Kamikaze,
            "SNIPER" => EnemyKind::Sniper,
            "SUMMONER" => EnemyKind::Summoner,
            _ => EnemyKind::Basic,
        }
    }
}

/// Charger speeds up inside this distance of the player
pub const CHARGE_TRIGGER_DIST: f32 = 280.0;

/// Shooter stops descending at this depth and starts strafing
pub const SHOOTER_DEPTH: f32 = 180.0;

pub const HEAL_INTERVAL: u64 = 60;
pub const HEAL_RADIUS: f32 = 250.0;
pub const HEAL_AMOUNT: f32 = 50.0;

pub const KAMIKAZE_STEER: f32 = 0.5;
pub const KAMIKAZE_TRIGGER_DIST: f32 = 180.0;
pub const KAMIKAZE_CHARGE_SPEED: f32 = 10.0;

pub const SNIPER_MIN_DEPTH: f32 = 100.0;
pub const SNIPER_AIM_CHANCE: f64 = 0.05;
pub const SNIPER_AIM_TICKS: u32 = 60;
/// Fraction of the remaining gap the aim point closes each tick
pub const SNIPER_AIM_LAG: f32 = 0.1;
pub const SNIPER_SHOT_SPEED: f32 = 15.0;
pub const SNIPER_COOLDOWN: f32 = 120.0;
pub const SNIPER_BACKOFF: f32 = 0.5;

pub const SUMMONER_FLEE_DIST: f32 = 200.0;
pub const SUMMONER_FLEE_SPEED: f32 = 1.5;
pub const SUMMON_INTERVAL: u32 = 300;
pub const SUMMONER_MARGIN: f32 = 20.0;
pub const SUMMON_OFFSET: f32 = 30.0;

/// Lateral offset of splitter children from the death point
pub const SPLIT_OFFSET: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KamikazeState {
    Tracking,
    /// Irreversible straight-line dive
    Charging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SniperState {
    Moving,
    Aiming,
    Cooldown,
}

/// Per-archetype behavior state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Basic,
    Charger { charge_mult: f32 },
    Splitter,
    Shooter { interval: f32 },
    Healer,
    Shielder,
    Kamikaze { state: KamikazeState, vel: Vec2 },
    Sniper {
        state: SniperState,
        aim_timer: u32,
        /// Lagged aim point
        aim: Vec2,
    },
    Summoner { summon_cooldown: u32 },
    Boss(BossBrain),
}

/// What an enemy needs to know about the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTarget {
    pub pos: Vec2,
    pub radius: f32,
}

/// Read-only snapshot of a sibling, for heal-seeking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllyView {
    pub id: EnemyId,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
}

impl From<&Enemy> for AllyView {
    fn from(e: &Enemy) -> Self {
        Self {
            id: e.id,
            pos: e.pos,
            hp: e.hp,
            max_hp: e.max_hp,
        }
    }
}

/// Side effects requested by a behavior, applied by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyCommand {
    Fire(EnemyBullet),
    /// Fresh enemy of `kind` at `pos`
    Summon { kind: EnemyKind, pos: Vec2 },
    /// Reduced-stat minion beside a death point
    Split { origin: Vec2, offset: f32 },
    Heal { target: EnemyId, amount: f32 },
    Sound(SoundCue),
}

/// Per-tick inputs handed to a behavior
pub struct TickContext<'a> {
    pub player: PlayerTarget,
    pub frame: u64,
    /// Playfield size
    pub field: Vec2,
    /// Live siblings (snapshot taken at the start of the enemy pass)
    pub allies: &'a [AllyView],
    pub rng: &'a mut Pcg32,
    commands: &'a mut Vec<EnemyCommand>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        player: PlayerTarget,
        frame: u64,
        field: Vec2,
        allies: &'a [AllyView],
        rng: &'a mut Pcg32,
        commands: &'a mut Vec<EnemyCommand>,
    ) -> Self {
        Self {
            player,
            frame,
            field,
            allies,
            rng,
            commands,
        }
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, radius: f32, damage: u32) {
        self.commands
            .push(EnemyCommand::Fire(EnemyBullet::new(pos, vel, radius, damage)));
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) {
        self.commands.push(EnemyCommand::Summon { kind, pos });
    }

    pub fn heal(&mut self, target: EnemyId, amount: f32) {
        self.commands.push(EnemyCommand::Heal { target, amount });
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.commands.push(EnemyCommand::Sound(cue));
    }
}

/// A live enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub size: f32,
    pub color: Rgba,
    pub sides: u32,
    /// Transient hit-shake offset (draw only)
    pub shake: Vec2,
    /// 0..1, white flash when hit
    pub hit_flash: f32,
    pub speed: f32,
    /// Ticks until the next attack
    pub cooldown: f32,
    pub boss_variant: Option<BossVariant>,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    pub fn is_damaged(&self) -> bool {
        self.hp < self.max_hp
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Relax shake and hit-flash cues
    pub fn decay_cues(&mut self) {
        self.shake *= 0.8;
        if self.hit_flash > 0.0 {
            self.hit_flash = (self.hit_flash - 0.15).max(0.0);
        }
    }

    /// Sniper aim point while it is lining up a shot
    pub fn aim_point(&self) -> Option<Vec2> {
        match &self.behavior {
            Behavior::Sniper {
                state: SniperState::Aiming,
                aim,
                ..
            } => Some(*aim),
            _ => None,
        }
    }

    /// Run one tick of motion and attacks
    pub fn update(&mut self, ctx: &mut TickContext) {
        let frame = ctx.frame as f32;
        match &mut self.behavior {
            Behavior::Basic | Behavior::Splitter => {
                self.pos.y += self.speed;
            }

            Behavior::Charger { charge_mult } => {
                let dsq = self.pos.distance_squared(ctx.player.pos);
                self.pos.y += if dsq < CHARGE_TRIGGER_DIST * CHARGE_TRIGGER_DIST {
                    self.speed * *charge_mult
                } else {
                    self.speed
                };
            }

            Behavior::Shooter { interval } => {
                if self.pos.y < SHOOTER_DEPTH {
                    self.pos.y += self.speed;
                } else {
                    self.pos.x += (frame * 0.02).sin() * 2.5;
                }
                self.cooldown -= 1.0;
                if self.cooldown <= 0.0 {
                    ctx.spawn_projectile(self.pos, Vec2::new(0.0, 6.5), 8.0, 1);
                    self.cooldown = *interval;
                }
            }

            Behavior::Healer => {
                self.pos.y += self.speed;
                if ctx.frame % HEAL_INTERVAL == 0 {
                    let mut best: Option<(EnemyId, f32)> = None;
                    for ally in ctx.allies {
                        if ally.id == self.id || ally.hp >= ally.max_hp {
                            continue;
                        }
                        let dsq = self.pos.distance_squared(ally.pos);
                        let limit = best.map(|(_, d)| d).unwrap_or(HEAL_RADIUS * HEAL_RADIUS);
                        if dsq < limit {
                            best = Some((ally.id, dsq));
                        }
                    }
                    if let Some((target, _)) = best {
                        ctx.heal(target, HEAL_AMOUNT);
                    }
                }
            }

            Behavior::Shielder => {
                self.pos.y += self.speed;
                self.pos.x += (frame * 0.01).sin() * 0.5;
            }

            Behavior::Kamikaze { state, vel } => match state {
                KamikazeState::Tracking => {
                    let (dir, dist) = direction_to(self.pos, ctx.player.pos);
                    *vel += dir * KAMIKAZE_STEER;
                    let speed = vel.length();
                    if speed > self.speed {
                        *vel = *vel / speed * self.speed;
                    }
                    self.pos += *vel;

                    if dist < KAMIKAZE_TRIGGER_DIST {
                        *state = KamikazeState::Charging;
                        let current = vel.length();
                        let denom = if current > 0.0 { current } else { 1.0 };
                        *vel *= KAMIKAZE_CHARGE_SPEED / denom;
                    }
                }
                KamikazeState::Charging => {
                    self.pos += *vel;
                }
            },

            Behavior::Sniper {
                state,
                aim_timer,
                aim,
            } => match state {
                SniperState::Moving => {
                    self.pos.y += self.speed;
                    if self.pos.y > SNIPER_MIN_DEPTH && ctx.rng.random_bool(SNIPER_AIM_CHANCE) {
                        *state = SniperState::Aiming;
                        *aim_timer = SNIPER_AIM_TICKS;
                        *aim = ctx.player.pos;
                    }
                }
                SniperState::Aiming => {
                    *aim_timer = aim_timer.saturating_sub(1);
                    *aim += (ctx.player.pos - *aim) * SNIPER_AIM_LAG;
                    if *aim_timer == 0 {
                        let (dir, _) = direction_to(self.pos, *aim);
                        ctx.spawn_projectile(self.pos, dir * SNIPER_SHOT_SPEED, 6.0, 2);
                        *state = SniperState::Cooldown;
                        self.cooldown = SNIPER_COOLDOWN;
                    }
                }
                SniperState::Cooldown => {
                    self.pos.y -= SNIPER_BACKOFF;
                    self.cooldown -= 1.0;
                    if self.cooldown <= 0.0 {
                        *state = SniperState::Moving;
                    }
                }
            },

            Behavior::Summoner { summon_cooldown } => {
                let (away, dist) = direction_to(ctx.player.pos, self.pos);
                if dist < SUMMONER_FLEE_DIST {
                    self.pos += away * SUMMONER_FLEE_SPEED;
                } else {
                    self.pos.x += (frame * 0.02).sin();
                }
                self.pos.x = self
                    .pos
                    .x
                    .clamp(SUMMONER_MARGIN, ctx.field.x - SUMMONER_MARGIN);

                *summon_cooldown = summon_cooldown.saturating_sub(1);
                if *summon_cooldown == 0 {
                    let left = Vec2::new(self.pos.x - SUMMON_OFFSET, self.pos.y);
                    let right = Vec2::new(self.pos.x + SUMMON_OFFSET, self.pos.y);
                    ctx.spawn_enemy(EnemyKind::Basic, left);
                    ctx.spawn_enemy(EnemyKind::Basic, right);
                    *summon_cooldown = SUMMON_INTERVAL;
                }
            }

            Behavior::Boss(brain) => {
                boss::update(brain, &mut self.pos, &mut self.cooldown, self.size, ctx);
            }
        }
    }

    /// One-time hook when the enemy dies
    pub fn on_death(&self, commands: &mut Vec<EnemyCommand>) {
        if let Behavior::Splitter = self.behavior {
            for offset in [-SPLIT_OFFSET, SPLIT_OFFSET] {
                commands.push(EnemyCommand::Split {
                    origin: self.pos,
                    offset,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::factory;
    use rand::SeedableRng;

    fn ctx_parts() -> (Pcg32, Vec<EnemyCommand>) {
        (Pcg32::seed_from_u64(7), Vec::new())
    }

    fn target(x: f32, y: f32) -> PlayerTarget {
        PlayerTarget {
            pos: Vec2::new(x, y),
            radius: 20.0,
        }
    }

    fn field() -> Vec2 {
        Vec2::new(450.0, 800.0)
    }

    #[test]
    fn test_unknown_kind_falls_back_to_basic() {
        assert_eq!(EnemyKind::from_name("dragon"), EnemyKind::Basic);
        assert_eq!(EnemyKind::from_name("sniper"), EnemyKind::Sniper);
    }

    #[test]
    fn test_charger_speeds_up_near_player() {
        let (mut rng, mut cmds) = ctx_parts();
        let mut e = factory::create_enemy_at(EnemyKind::Charger, 1, Vec2::new(200.0, 0.0), 1, &mut rng);
        e.speed = 2.0;

        let mut ctx = TickContext::new(target(200.0, 700.0), 1, field(), &[], &mut rng, &mut cmds);
        e.update(&mut ctx);
        assert!((e.pos.y - 2.0).abs() < 1e-4);

        let mut ctx = TickContext::new(target(200.0, 100.0), 2, field(), &[], &mut rng, &mut cmds);
        e.update(&mut ctx);
        assert!((e.pos.y - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_kamikaze_charges_irreversibly() {
        let (mut rng, mut cmds) = ctx_parts();
        let mut e = factory::create_enemy_at(EnemyKind::Kamikaze, 1, Vec2::new(200.0, 300.0), 1, &mut rng);

        // Far away: keeps tracking with a capped speed
        let mut ctx = TickContext::new(target(200.0, 700.0), 1, field(), &[], &mut rng, &mut cmds);
        e.update(&mut ctx);
        match &e.behavior {
            Behavior::Kamikaze { state, vel } => {
                assert_eq!(*state, KamikazeState::Tracking);
                assert!(vel.length() <= e.speed + 1e-4);
            }
            other => panic!("unexpected behavior {other:?}"),
        }

        // Close: switches to charging at the fixed magnitude
        let near = e.pos + Vec2::new(0.0, 100.0);
        let mut ctx = TickContext::new(target(near.x, near.y), 2, field(), &[], &mut rng, &mut cmds);
        e.update(&mut ctx);
        let charge_vel = match &e.behavior {
            Behavior::Kamikaze { state, vel } => {
                assert_eq!(*state, KamikazeState::Charging);
                assert!((vel.length() - KAMIKAZE_CHARGE_SPEED).abs() < 1e-3);
                *vel
            }
            other => panic!("unexpected behavior {other:?}"),
        };

        // Player moves away: the dive ignores it
        let before = e.pos;
        let mut ctx = TickContext::new(target(0.0, 0.0), 3, field(), &[], &mut rng, &mut cmds);
        e.update(&mut ctx);
        assert!((e.pos - (before + charge_vel)).length() < 1e-4);
    }

    #[test]
    fn test_sniper_cycle() {
        let (mut rng, mut cmds) = ctx_parts();
        let mut e = factory::create_enemy_at(EnemyKind::Sniper, 1, Vec2::new(200.0, 150.0), 1, &mut rng);
        let player = target(300.0, 600.0);

        // Moving until the aim roll succeeds
        let mut frame = 0;
        while e.aim_point().is_none() {
            frame += 1;
            assert!(frame < 2000, "sniper never started aiming");
            let mut ctx = TickContext::new(player, frame, field(), &[], &mut rng, &mut cmds);
            e.update(&mut ctx);
        }
        assert!(cmds.is_empty());

        for _ in 0..SNIPER_AIM_TICKS {
            frame += 1;
            let mut ctx = TickContext::new(player, frame, field(), &[], &mut rng, &mut cmds);
            e.update(&mut ctx);
        }
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            EnemyCommand::Fire(b) => assert!((b.vel.length() - SNIPER_SHOT_SPEED).abs() < 1e-3),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(matches!(
            e.behavior,
            Behavior::Sniper {
                state: SniperState::Cooldown,
                ..
            }
        ));

        // Backs away during cooldown, then resumes moving
        let y = e.pos.y;
        for _ in 0..SNIPER_COOLDOWN as u32 {
            frame += 1;
            let mut ctx = TickContext::new(player, frame, field(), &[], &mut rng, &mut cmds);
            e.update(&mut ctx);
        }
        assert!(e.pos.y < y);
        assert!(matches!(
            e.behavior,
            Behavior::Sniper {
                state: SniperState::Moving,
                ..
            }
        ));
    }

    #[test]
    fn test_healer_picks_nearest_damaged_ally() {
        let (mut rng, mut cmds) = ctx_parts();
        let mut healer = factory::create_enemy_at(EnemyKind::Healer, 1, Vec2::new(200.0, 200.0), 1, &mut rng);
        let allies = [
            AllyView { id: 1, pos: healer.pos, hp: 1.0, max_hp: 100.0 },
            AllyView { id: 2, pos: Vec2::new(200.0, 400.0), hp: 10.0, max_hp: 100.0 },
            AllyView { id: 3, pos: Vec2::new(250.0, 220.0), hp: 10.0, max_hp: 100.0 },
            AllyView { id: 4, pos: Vec2::new(210.0, 210.0), hp: 100.0, max_hp: 100.0 },
        ];
        let mut ctx = TickContext::new(target(0.0, 0.0), HEAL_INTERVAL, field(), &allies, &mut rng, &mut cmds);
        healer.update(&mut ctx);
        assert_eq!(cmds, vec![EnemyCommand::Heal { target: 3, amount: HEAL_AMOUNT }]);
        // No behavior-visible flash on the healer side
        assert_eq!(healer.hit_flash, 0.0);
    }

    #[test]
    fn test_summoner_flees_and_summons() {
        let (mut rng, mut cmds) = ctx_parts();
        let mut e = factory::create_enemy_at(EnemyKind::Summoner, 1, Vec2::new(200.0, 300.0), 1, &mut rng);
        let before = e.pos;
        for frame in 1..=SUMMON_INTERVAL as u64 {
            let mut ctx = TickContext::new(target(200.0, 400.0), frame, field(), &[], &mut rng, &mut cmds);
            e.update(&mut ctx);
        }
        assert!(e.pos.y < before.y);
        let summons: Vec<_> = cmds
            .iter()
            .filter(|c| matches!(c, EnemyCommand::Summon { kind: EnemyKind::Basic, .. }))
            .collect();
        assert_eq!(summons.len(), 2);
    }

    #[test]
    fn test_shooter_fires_on_interval() {
        let (mut rng, mut cmds) = ctx_parts();
        let mut e = factory::create_enemy_at(EnemyKind::Shooter, 1, Vec2::new(200.0, 300.0), 1, &mut rng);
        e.cooldown = 1.0;
        let mut ctx = TickContext::new(target(0.0, 0.0), 1, field(), &[], &mut rng, &mut cmds);
        e.update(&mut ctx);
        assert_eq!(cmds.len(), 1);
        assert_eq!(e.cooldown, 90.0);
    }

    #[test]
    fn test_splitter_death_requests_two_children() {
        let (mut rng, _) = ctx_parts();
        let e = factory::create_enemy_at(EnemyKind::Splitter, 1, Vec2::new(200.0, 300.0), 1, &mut rng);
        let mut cmds = Vec::new();
        e.on_death(&mut cmds);
        assert_eq!(
            cmds,
            vec![
                EnemyCommand::Split { origin: e.pos, offset: -SPLIT_OFFSET },
                EnemyCommand::Split { origin: e.pos, offset: SPLIT_OFFSET },
            ]
        );

        let basic = factory::create_enemy_at(EnemyKind::Basic, 1, Vec2::ZERO, 2, &mut rng);
        let mut cmds = Vec::new();
        basic.on_death(&mut cmds);
        assert!(cmds.is_empty());
    }
}
