//! Simulation engine
//!
//! [`Engine`] owns one run's [`GameState`], the seeded RNG and the outbound
//! event sink. Callers drive it through the public contract below; the
//! per-tick pipeline itself lives in `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::enemy::{EnemyCommand, EnemyKind};
use super::events::{EventQueue, EventSink, GameEvent, SoundCue};
use super::factory;
use super::schedule::{FrameSchedule, FrameTicket};
use super::state::{DamageNumber, GameState, Particle, WeaponMode};
use super::upgrade::{UpgradeKind, UpgradeOption};
use crate::consts::*;
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::tuning::{self, Rgba, combat, palette};

/// Zoom the camera eases toward while an upgrade is being picked
pub const LEVEL_UP_ZOOM: f32 = 1.15;

/// Damage numbers live this many ticks
const DAMAGE_NUMBER_LIFE: f32 = 45.0;

pub struct Engine<S: EventSink = EventQueue> {
    pub(super) seed: u64,
    pub(super) rng: Pcg32,
    pub(super) settings: Settings,
    pub(super) events: S,
    pub(super) state: GameState,
    pub(super) paused: bool,
    pub(super) schedule: FrameSchedule,
    /// Scratch buffer for behavior side effects, reused across ticks
    pub(super) commands: Vec<EnemyCommand>,
}

impl<S: EventSink> Engine<S> {
    pub fn new(seed: u64, events: S) -> Self {
        Self::with_settings(seed, Settings::default(), events)
    }

    pub fn with_settings(seed: u64, settings: Settings, events: S) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            events,
            state: GameState::new(),
            paused: false,
            schedule: FrameSchedule::new(),
            commands: Vec::new(),
        }
    }

    /// Swap settings between runs. Only the particle cap affects simulation.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        let cap = self.settings.max_particles();
        self.state.particles.truncate(cap);
    }

    /// Seed used by the next `reset()`
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    // === Lifecycle ===

    /// Throw away the current run and start from scratch. Cancels any
    /// pending frame so a stale callback cannot touch the new state.
    pub fn reset(&mut self) {
        self.schedule.cancel();
        self.state = GameState::new();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.commands.clear();
        self.paused = false;
        log::info!("Run reset (seed {})", self.seed);
    }

    /// Unpause and schedule the first frame
    pub fn start(&mut self) -> FrameTicket {
        self.paused = false;
        log::info!("Run started at level {}", self.state.level);
        self.schedule.request()
    }

    /// Continue after a pause or an upgrade pick. Clears the level-up zoom.
    /// Does nothing once the run is over.
    pub fn resume(&mut self) -> Option<FrameTicket> {
        if !self.paused || self.state.game_over {
            return None;
        }
        self.paused = false;
        self.state.zoom_target = 1.0;
        Some(self.schedule.request())
    }

    /// Flip the pause flag and return it
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.paused = true;
            self.schedule.cancel();
        }
        self.paused
    }

    // === Player actions ===

    /// Pointer position in field coordinates
    pub fn set_target(&mut self, target: Vec2) {
        self.state.player.target = target;
    }

    /// Lose `amount` half-hearts. Ignored while invincible or paused.
    pub fn take_damage(&mut self, amount: u32) {
        if self.state.player.is_invincible() || self.paused {
            return;
        }

        let player = &mut self.state.player;
        let prev = player.health;
        player.health = prev.saturating_sub(amount);
        player.invincible_timer = INVINCIBLE_TIME;

        // Bounce the heart that held the lost health
        if prev > 0 {
            let idx = ((prev - 1) / 2) as usize;
            if let Some(scale) = player.heart_scales.get_mut(idx) {
                *scale = HEART_BOUNCE_SCALE;
            }
        }

        self.shake(20.0);
        self.sound(SoundCue::Explosion);

        if self.state.player.health == 0 {
            self.game_over();
        }
    }

    /// Apply a picked upgrade, then check the evolution rule
    pub fn apply_upgrade(&mut self, option: &UpgradeOption) {
        self.state.upgrades.record(option);

        let player = &mut self.state.player;
        match option.kind {
            UpgradeKind::FireRate => {
                player.fire_rate = (player.fire_rate - 15.0).max(MIN_FIRE_RATE);
            }
            UpgradeKind::SideGuns => player.side_guns += 1,
            UpgradeKind::BigBullet => {
                player.damage_additive += 0.4;
                player.bullet_scale += 0.2;
            }
            UpgradeKind::Cannon => player.damage_additive += 0.6,
            UpgradeKind::RangeBoost => player.bullet_scale += 0.1,
            UpgradeKind::VoltShot => player.damage_additive += 0.2,
            UpgradeKind::HealthUp => {
                if player.max_hearts < MAX_HEARTS {
                    player.max_hearts += 1;
                    player.heart_scales.push(1.0);
                }
                player.health = player.max_health();
            }
        }
        log::debug!("Upgrade {} applied", option.kind.as_str());

        if self.state.upgrades.evolution_ready() && self.state.player.weapon_mode != WeaponMode::BlackHole {
            self.evolve_weapon();
        }
    }

    fn evolve_weapon(&mut self) {
        let player = &mut self.state.player;
        player.weapon_mode = WeaponMode::BlackHole;
        player.damage_multiplicative *= combat::EVOLVE_DAMAGE_MULTIPLIER;
        let origin = player.pos;

        self.sound(SoundCue::Evo);
        self.shake(60.0);
        for _ in 0..30 {
            let vel = self.random_spread(15.0);
            self.spawn_particle(origin, vel, 8.0, palette::PLAYER_EVOLVED, 40.0, true);
        }
        log::info!("Weapon evolved to black hole mode");
    }

    // === Frame driving ===

    /// Run one tick. Returns false (and does nothing) while paused.
    pub fn advance(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.tick();
        true
    }

    /// Animation callback: tick and draw if `ticket` is the live one, then
    /// hand back the ticket for the next frame unless the run paused.
    pub fn run_frame<T: Surface>(&mut self, ticket: FrameTicket, surface: &mut T) -> Option<FrameTicket> {
        if !self.schedule.consume(ticket) || self.paused {
            return None;
        }
        self.tick();
        self.draw(surface);
        if self.paused {
            None
        } else {
            Some(self.schedule.request())
        }
    }

    pub fn pending_frame(&self) -> Option<FrameTicket> {
        self.schedule.pending()
    }

    /// Draw the current state. Pure read.
    pub fn draw<T: Surface>(&self, surface: &mut T) {
        renderer::draw(&self.state, &self.settings, surface);
    }

    /// Distinct upgrade choices for the level-up screen
    pub fn roll_upgrade_offer(&mut self, count: usize) -> Vec<UpgradeOption> {
        self.state.upgrades.roll_offer(&mut self.rng, count)
    }

    /// Spawn one enemy of `kind` at its natural entry point
    pub fn spawn_enemy(&mut self, kind: EnemyKind) {
        let id = self.state.next_entity_id();
        let enemy = factory::create_enemy(kind, self.state.level, FIELD_WIDTH, id, &mut self.rng);
        if let Some(variant) = enemy.boss_variant {
            self.state.boss_active = true;
            log::info!("Boss {} spawned at level {}", variant.name(), self.state.level);
        }
        self.state.enemies.push(enemy);
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut S {
        &mut self.events
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn kills(&self) -> u64 {
        self.state.kills
    }

    pub fn frame(&self) -> u64 {
        self.state.frame
    }

    // === Internal helpers shared with the tick pipeline ===

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.emit(event);
    }

    pub(super) fn sound(&mut self, cue: SoundCue) {
        self.events.emit(GameEvent::PlaySound(cue));
    }

    pub(super) fn shake(&mut self, intensity: f32) {
        self.state.shake_timer = self.state.shake_timer.max(intensity);
        self.events.emit(GameEvent::ScreenShake(intensity));
    }

    /// Random velocity in a `span`-wide box centered on zero
    pub(super) fn random_spread(&mut self, span: f32) -> Vec2 {
        Vec2::new(
            (self.rng.random::<f32>() - 0.5) * span,
            (self.rng.random::<f32>() - 0.5) * span,
        )
    }

    /// Add a particle unless the cap is reached
    pub(super) fn spawn_particle(&mut self, pos: Vec2, vel: Vec2, size: f32, color: Rgba, life: f32, glow: bool) {
        if self.state.particles.len() >= self.settings.max_particles() {
            return;
        }
        self.state.particles.push(Particle {
            pos,
            vel,
            size,
            color,
            life,
            max_life: life,
            glow,
        });
    }

    pub(super) fn spawn_damage_number(&mut self, pos: Vec2, damage: f32, crit: bool) {
        let jitter = (self.rng.random::<f32>() - 0.5) * 20.0;
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 5.0,
            -6.0 - self.rng.random::<f32>() * 5.0,
        );
        let color = if crit {
            palette::CRIT
        } else if damage > 0.0 {
            palette::DAMAGE
        } else {
            palette::WHITE
        };
        self.state.damage_numbers.push(DamageNumber {
            pos: Vec2::new(pos.x + jitter, pos.y - 20.0),
            vel,
            text: tuning::format_value(damage as f64),
            color,
            life: DAMAGE_NUMBER_LIFE,
            max_life: DAMAGE_NUMBER_LIFE,
            crit,
        });
        if crit {
            self.shake(8.0);
        }
    }

    pub(super) fn level_up(&mut self) {
        self.paused = true;
        let state = &mut self.state;
        state.level += 1;
        state.exp = 0;
        state.max_exp = tuning::xp_required(state.level);
        state.zoom_target = LEVEL_UP_ZOOM;
        let (level, required) = (state.level, state.max_exp);

        self.sound(SoundCue::LevelUp);
        self.emit(GameEvent::LevelUp(level));
        self.emit(GameEvent::ExperienceChanged { current: 0, required });
        log::info!("Level up: {}", level);
    }

    pub(super) fn game_over(&mut self) {
        self.paused = true;
        self.state.game_over = true;
        self.emit(GameEvent::GameOver);
        log::info!(
            "Game over: score {}, kills {}, frames {}",
            self.state.score,
            self.state.kills,
            self.state.frame
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::EventKind;
    use crate::sim::upgrade::UPGRADE_POOL;
    use proptest::prelude::*;

    fn engine() -> Engine {
        Engine::new(42, EventQueue::new())
    }

    #[test]
    fn test_take_damage_bounces_heart_and_grants_invincibility() {
        let mut e = engine();
        e.take_damage(1);
        assert_eq!(e.state.player.health, 5);
        assert_eq!(e.state.player.heart_scales[2], HEART_BOUNCE_SCALE);
        assert!(e.state.player.is_invincible());
        assert_eq!(e.events.count(EventKind::ScreenShake), 1);
        assert_eq!(e.events.count(EventKind::PlaySound), 1);
    }

    #[test]
    fn test_invincible_damage_is_silent() {
        let mut e = engine();
        e.take_damage(1);
        e.events.clear();
        let health = e.state.player.health;

        e.take_damage(2);
        assert_eq!(e.state.player.health, health);
        assert!(e.events.is_empty());
    }

    #[test]
    fn test_paused_damage_ignored() {
        let mut e = engine();
        e.toggle_pause();
        e.take_damage(3);
        assert_eq!(e.state.player.health, 6);
    }

    #[test]
    fn test_lethal_damage_ends_run_once() {
        let mut e = engine();
        e.take_damage(10);
        assert_eq!(e.state.player.health, 0);
        assert!(e.is_game_over());
        assert!(e.is_paused());
        assert_eq!(e.events.count(EventKind::GameOver), 1);

        // Further damage and ticks do nothing
        e.state.player.invincible_timer = 0.0;
        e.take_damage(1);
        assert!(!e.advance());
        assert_eq!(e.events.count(EventKind::GameOver), 1);
        assert_eq!(e.resume(), None);
    }

    #[test]
    fn test_cannon_and_range_evolve_exactly_once() {
        let mut e = engine();
        let cannon = UpgradeKind::Cannon.option();
        let range = UpgradeKind::RangeBoost.option();

        for _ in 0..5 {
            e.apply_upgrade(cannon);
        }
        assert_eq!(e.state.player.weapon_mode, WeaponMode::Standard);

        e.apply_upgrade(range);
        assert_eq!(e.state.player.weapon_mode, WeaponMode::BlackHole);
        assert_eq!(e.state.player.damage_multiplicative, 2.0);

        e.apply_upgrade(cannon);
        e.apply_upgrade(range);
        assert_eq!(e.state.player.damage_multiplicative, 2.0);
        let evo = e
            .events
            .iter()
            .filter(|ev| **ev == GameEvent::PlaySound(SoundCue::Evo))
            .count();
        assert_eq!(evo, 1);
    }

    #[test]
    fn test_fire_rate_floor() {
        let mut e = engine();
        for _ in 0..20 {
            e.apply_upgrade(UpgradeKind::FireRate.option());
        }
        assert_eq!(e.state.player.fire_rate, MIN_FIRE_RATE);
    }

    #[test]
    fn test_health_up_caps_hearts() {
        let mut e = engine();
        e.state.player.health = 1;
        for _ in 0..12 {
            e.apply_upgrade(UpgradeKind::HealthUp.option());
        }
        assert_eq!(e.state.player.max_hearts, MAX_HEARTS);
        assert_eq!(e.state.player.health, MAX_HEARTS * 2);
        assert_eq!(e.state.player.heart_scales.len(), MAX_HEARTS as usize);
    }

    #[test]
    fn test_reset_replaces_state_and_cancels_frame() {
        let mut e = engine();
        let ticket = e.start();
        for _ in 0..120 {
            e.advance();
        }
        e.apply_upgrade(UpgradeKind::SideGuns.option());
        e.reset();

        assert_eq!(e.pending_frame(), None);
        assert_eq!(e.state.frame, 0);
        assert_eq!(e.state.score, 0);
        assert_eq!(e.state.level, 1);
        assert!(e.state.bullets.is_empty());
        assert_eq!(e.state.player.side_guns, 0);
        assert_eq!(e.state.upgrades.stacks(UpgradeKind::SideGuns), 0);

        // The ticket issued before the reset is stale
        let mut surface = crate::renderer::VertexSurface::new(FIELD_WIDTH, FIELD_HEIGHT);
        assert_eq!(e.run_frame(ticket, &mut surface), None);
        assert_eq!(e.state.frame, 0);
    }

    #[test]
    fn test_reset_is_reproducible() {
        let mut e = engine();
        let mut snapshots = Vec::new();
        for _ in 0..2 {
            e.reset();
            e.set_target(Vec2::new(100.0, 600.0));
            for _ in 0..400 {
                if !e.advance() {
                    e.resume();
                }
            }
            snapshots.push((
                e.state.frame,
                e.state.score,
                e.state.enemies.len(),
                e.state.player.pos,
                e.state.player.health,
            ));
        }
        assert_eq!(snapshots[0], snapshots[1]);
    }

    #[test]
    fn test_run_frame_schedules_next_until_paused() {
        let mut e = engine();
        let mut surface = crate::renderer::VertexSurface::new(FIELD_WIDTH, FIELD_HEIGHT);
        let t1 = e.start();
        let t2 = e.run_frame(t1, &mut surface);
        assert!(t2.is_some());
        assert_eq!(e.state.frame, 1);
        assert!(surface.vertex_count() > 0);

        e.toggle_pause();
        assert_eq!(e.pending_frame(), None);
        assert_eq!(e.run_frame(t2.unwrap_or(t1), &mut surface), None);
        assert_eq!(e.state.frame, 1);

        let t3 = e.toggle_pause();
        assert!(!t3);
        assert!(e.pending_frame().is_some());
    }

    #[test]
    fn test_level_up_pauses_and_zooms() {
        let mut e = engine();
        e.level_up();
        assert!(e.is_paused());
        assert_eq!(e.state.level, 2);
        assert_eq!(e.state.exp, 0);
        assert_eq!(e.state.max_exp, tuning::xp_required(2));
        assert_eq!(e.state.zoom_target, LEVEL_UP_ZOOM);
        assert_eq!(e.events.count(EventKind::LevelUp), 1);

        assert!(e.resume().is_some());
        assert_eq!(e.state.zoom_target, 1.0);
    }

    #[test]
    fn test_particle_cap() {
        let mut e = engine();
        for _ in 0..1000 {
            e.spawn_particle(Vec2::ZERO, Vec2::ZERO, 1.0, palette::WHITE, 10.0, false);
        }
        assert_eq!(e.state.particles.len(), e.settings.max_particles());
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(
            hits in proptest::collection::vec(0u32..8, 0..40),
            picks in proptest::collection::vec(0usize..UPGRADE_POOL.len(), 0..20),
        ) {
            let mut e = engine();
            for (n, amount) in hits.iter().enumerate() {
                e.state.player.invincible_timer = 0.0;
                e.take_damage(*amount);
                if let Some(&idx) = picks.get(n) {
                    e.apply_upgrade(&UPGRADE_POOL[idx]);
                }
                let p = &e.state.player;
                prop_assert!(p.health <= p.max_health());
                prop_assert!(p.max_hearts <= MAX_HEARTS);
            }
        }
    }
}
