//! Game state and core simulation types
//!
//! Everything a run owns lives in [`GameState`]. A reset replaces the whole
//! value rather than patching fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::upgrade::UpgradeBook;
use crate::consts::*;
use crate::tuning::{self, Rgba, WeaponConfig, environment, weapon_config};

/// Player firing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    #[default]
    Standard,
    /// Evolved mode: slow, huge, persistent bullets that pull enemies in
    BlackHole,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Where the pointer wants the ship to be
    pub target: Vec2,
    pub radius: f32,
    /// Milliseconds between shots
    pub fire_rate: f32,
    /// Simulation time (ms) of the last shot
    pub last_fired: Option<f32>,
    pub side_guns: u32,
    pub bullet_scale: f32,
    pub damage_base: f32,
    pub damage_additive: f32,
    pub damage_multiplicative: f32,
    pub weapon_mode: WeaponMode,
    pub max_hearts: u32,
    /// Health in half-heart units, `0..=max_hearts * 2`
    pub health: u32,
    /// Remaining invincibility (ms)
    pub invincible_timer: f32,
    /// Per-heart bounce animation scale (1.0 = neutral)
    pub heart_scales: Vec<f32>,
}

impl Default for Player {
    fn default() -> Self {
        let start = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        Self {
            pos: start,
            target: start,
            radius: PLAYER_RADIUS,
            fire_rate: INITIAL_FIRE_RATE,
            last_fired: None,
            side_guns: 0,
            bullet_scale: 1.0,
            damage_base: INITIAL_DAMAGE,
            damage_additive: 0.0,
            damage_multiplicative: 1.0,
            weapon_mode: WeaponMode::Standard,
            max_hearts: INITIAL_HEARTS,
            health: INITIAL_HEARTS * 2,
            invincible_timer: 0.0,
            heart_scales: vec![1.0; INITIAL_HEARTS as usize],
        }
    }
}

impl Player {
    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn max_health(&self) -> u32 {
        self.max_hearts * 2
    }

    /// Damage of a standard shot, including the mercy boost
    pub fn shot_damage(&self, mercy: f32) -> f32 {
        self.damage_base
            * (1.0 + self.damage_additive)
            * self.damage_multiplicative
            * (1.0 + mercy)
    }

    /// Whether enough simulation time passed since the last shot
    pub fn ready_to_fire(&self, now_ms: f32) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now_ms - last > self.fire_rate,
        }
    }

    /// Ease toward the movement target, then clamp inside the field
    pub fn follow_target(&mut self, move_scale: f32) {
        self.pos += (self.target - self.pos) * move_scale;
        self.pos.x = self.pos.x.clamp(self.radius, FIELD_WIDTH - self.radius);
        self.pos.y = self.pos.y.clamp(self.radius, FIELD_HEIGHT - self.radius);
    }

    /// Relax heart bounce animations toward neutral
    pub fn decay_heart_scales(&mut self) {
        for scale in &mut self.heart_scales {
            if *scale > 1.0 {
                *scale -= 0.02;
            } else {
                *scale = 1.0;
            }
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(self.max_health());
    }
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
    pub black_hole: bool,
}

impl Bullet {
    /// Bullet leaving the ship at a lateral `offset`
    pub fn fired(player: &Player, offset: f32, mode: WeaponMode, damage: f32) -> Self {
        let cfg = weapon_config(mode);
        Self {
            pos: Vec2::new(player.pos.x + offset, player.pos.y - cfg.spawn_offset),
            vel: Vec2::new(0.0, cfg.bullet_speed),
            radius: cfg.bullet_radius * player.bullet_scale,
            damage: damage * cfg.damage_factor,
            trail: Vec::with_capacity(cfg.trail_length + 1),
            black_hole: mode == WeaponMode::BlackHole,
        }
    }

    pub fn config(&self) -> &'static WeaponConfig {
        weapon_config(if self.black_hole {
            WeaponMode::BlackHole
        } else {
            WeaponMode::Standard
        })
    }

    /// Record current position to trail (call each tick)
    pub fn record_trail(&mut self) {
        let max = self.config().trail_length;
        self.trail.insert(0, self.pos);
        self.trail.truncate(max);
    }

    pub fn off_field(&self) -> bool {
        self.pos.y < -120.0 || self.pos.y > FIELD_HEIGHT + 120.0
    }
}

/// A hostile projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Damage in half-hearts
    pub damage: u32,
}

impl EnemyBullet {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, damage: u32) -> Self {
        Self {
            pos,
            vel,
            radius,
            damage,
        }
    }

    pub fn off_field(&self) -> bool {
        const MARGIN: f32 = 100.0;
        self.pos.x < -MARGIN
            || self.pos.x > FIELD_WIDTH + MARGIN
            || self.pos.y < -MARGIN * 2.0
            || self.pos.y > FIELD_HEIGHT + MARGIN
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Rgba,
    /// Ticks remaining
    pub life: f32,
    pub max_life: f32,
    pub glow: bool,
}

/// Floating damage readout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub vel: Vec2,
    pub text: String,
    pub color: Rgba,
    pub life: f32,
    pub max_life: f32,
    pub crit: bool,
}

/// Experience pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpGem {
    pub pos: Vec2,
    pub value: u32,
    pub size: f32,
}

/// Health pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartItem {
    pub pos: Vec2,
    pub size: f32,
    pub pulse: f32,
}

/// Destructible wall that damages the player on contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub hp: f32,
    pub max_hp: f32,
}

impl Obstacle {
    pub fn new(x: f32, level: u32) -> Self {
        let hp = environment::OBSTACLE_HP * (1.0 + level as f32 / 10.0);
        Self {
            pos: Vec2::new(x, -100.0),
            width: environment::OBSTACLE_WIDTH,
            height: environment::OBSTACLE_HEIGHT,
            hp,
            max_hp: hp,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        super::collision::point_in_rect(point, self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }
}

/// Field that slows the player and drags the movement target toward its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityField {
    pub pos: Vec2,
    pub radius: f32,
    pub strength: f32,
}

impl GravityField {
    pub fn new(x: f32) -> Self {
        Self {
            pos: Vec2::new(x, -150.0),
            radius: environment::GRAVITY_FIELD_RADIUS,
            strength: environment::GRAVITY_FIELD_STRENGTH,
        }
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    /// Live enemies, oldest first
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub gravity_fields: Vec<GravityField>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub damage_numbers: Vec<DamageNumber>,
    pub gems: Vec<ExpGem>,
    pub hearts: Vec<HeartItem>,
    pub upgrades: UpgradeBook,
    pub score: u64,
    pub level: u32,
    pub exp: u64,
    pub max_exp: u64,
    /// Kills this run
    pub kills: u64,
    /// Simulation tick counter
    pub frame: u64,
    pub shake_timer: f32,
    pub boss_active: bool,
    pub last_kill_frame: u64,
    /// Damage bonus accumulated during kill-less stretches
    pub mercy: f32,
    pub camera_zoom: f32,
    pub zoom_target: f32,
    pub game_over: bool,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh run: full health, level 1, empty collections
    pub fn new() -> Self {
        Self {
            player: Player::default(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            gravity_fields: Vec::new(),
            particles: Vec::new(),
            damage_numbers: Vec::new(),
            gems: Vec::new(),
            hearts: Vec::new(),
            upgrades: UpgradeBook::default(),
            score: 0,
            level: 1,
            exp: 0,
            max_exp: tuning::xp_required(1),
            kills: 0,
            frame: 0,
            shake_timer: 0.0,
            boss_active: false,
            last_kill_frame: 0,
            mercy: 0.0,
            camera_zoom: 1.0,
            zoom_target: 1.0,
            game_over: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation clock in milliseconds
    pub fn now_ms(&self) -> f32 {
        self.frame as f32 * TICK_MS
    }

    pub fn current_damage(&self) -> f32 {
        self.player.shot_damage(self.mercy)
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults() {
        let p = Player::default();
        assert_eq!(p.health, 6);
        assert_eq!(p.max_health(), 6);
        assert_eq!(p.heart_scales.len(), 3);
        assert!(p.ready_to_fire(0.0));
        assert!((p.shot_damage(0.0) - INITIAL_DAMAGE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fire_timer() {
        let mut p = Player::default();
        p.last_fired = Some(100.0);
        assert!(!p.ready_to_fire(300.0));
        assert!(p.ready_to_fire(300.5));
    }

    #[test]
    fn test_follow_target_clamps() {
        let mut p = Player::default();
        p.target = Vec2::new(-500.0, 5000.0);
        p.follow_target(1.0);
        assert_eq!(p.pos, Vec2::new(p.radius, FIELD_HEIGHT - p.radius));
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut p = Player::default();
        p.health = 5;
        p.heal(2);
        assert_eq!(p.health, 6);
    }

    #[test]
    fn test_trail_truncates() {
        let p = Player::default();
        let mut b = Bullet::fired(&p, 0.0, WeaponMode::Standard, 2.0);
        for _ in 0..20 {
            b.pos += b.vel;
            b.record_trail();
        }
        assert_eq!(b.trail.len(), 6);
        assert_eq!(b.trail[0], b.pos);
    }

    #[test]
    fn test_standard_bullet_size_scales() {
        let mut p = Player::default();
        let b = Bullet::fired(&p, 0.0, WeaponMode::Standard, 2.0);
        assert_eq!(b.radius, crate::consts::INITIAL_BULLET_SIZE);
        p.bullet_scale = 1.5;
        let b = Bullet::fired(&p, 0.0, WeaponMode::Standard, 2.0);
        assert_eq!(b.radius, crate::consts::INITIAL_BULLET_SIZE * 1.5);
    }

    #[test]
    fn test_black_hole_bullet_stats() {
        let p = Player::default();
        let b = Bullet::fired(&p, 0.0, WeaponMode::BlackHole, 2.0);
        assert!(b.black_hole);
        assert_eq!(b.radius, 32.0);
        assert_eq!(b.damage, 3.0);
        assert_eq!(b.pos.y, p.pos.y - 40.0);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut s = GameState::new();
        let a = s.next_entity_id();
        let b = s.next_entity_id();
        assert_ne!(a, b);
    }
}
