//! Per-frame draw pass
//!
//! Reads the simulation state and issues surface calls. Nothing here
//! mutates the game; camera easing happens in the tick.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes;
use super::vertex::with_alpha;
use super::{Blend, Surface, TextAlign};
use crate::settings::Settings;
use crate::sim::state::{Bullet, GameState, WeaponMode};
use crate::sim::{Enemy, EnemyKind};
use crate::tuning::{self, Rgba, palette};

/// Hit flash above this reads as a white frame
const FLASH_THRESHOLD: f32 = 0.45;
const HEARTS_PER_ROW: usize = 5;
const HUD_HEART_SIZE: f32 = 22.0;
const HUD_HEART_SPACING: f32 = 28.0;
const HUD_ORIGIN: Vec2 = Vec2::new(24.0, 24.0);
const BLACK_HOLE_CORE: Rgba = [0.05, 0.0, 0.1, 1.0];
const AIM_LINE: Rgba = [1.0, 0.0, 0.0, 0.5];
const GRAVITY_EDGE: Rgba = [0.75, 0.0, 1.0, 0.45];

/// Deterministic value in [-0.5, 0.5) for a frame and salt
fn jitter(frame: u64, salt: u64) -> f32 {
    let mut x = frame.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ salt.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 31;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 29;
    (x >> 40) as f32 / (1u64 << 24) as f32 - 0.5
}

/// Draw one frame of `state`
pub fn draw(state: &GameState, settings: &Settings, surface: &mut impl Surface) {
    surface.clear(palette::BACKGROUND);

    let center = surface.size() * 0.5;
    surface.save();

    if state.shake_timer > 0.0 && settings.effective_screen_shake() {
        let offset = Vec2::new(jitter(state.frame, 1), jitter(state.frame, 2)) * state.shake_timer;
        surface.translate(offset);
    }
    if (state.camera_zoom - 1.0).abs() > f32::EPSILON {
        surface.translate(center);
        surface.scale(state.camera_zoom);
        surface.translate(-center);
    }

    let t = state.frame as f32;
    draw_gravity_fields(state, t, surface);
    draw_obstacles(state, surface);
    draw_particles(state, settings, surface);
    draw_pickups(state, t, surface);
    draw_enemy_bullets(state, surface);
    for bullet in &state.bullets {
        draw_bullet(bullet, settings, t, surface);
    }
    for enemy in &state.enemies {
        draw_enemy(enemy, t, surface);
    }
    if settings.damage_numbers {
        draw_damage_numbers(state, surface);
    }
    draw_player(state, settings, surface);

    surface.restore();

    // HUD stays put while the world shakes
    draw_boss_bar(state, surface);
    draw_mercy(state, surface);
    draw_hearts(state, surface);
}

fn draw_gravity_fields(state: &GameState, t: f32, surface: &mut impl Surface) {
    for field in &state.gravity_fields {
        let pulse = 1.0 + (t * 0.1).sin() * 0.05;
        let r = field.radius * pulse;
        surface.fill_circle(field.pos, r, palette::GRAVITY);
        surface.stroke_circle(field.pos, r, 2.0, GRAVITY_EDGE);
    }
}

fn draw_obstacles(state: &GameState, surface: &mut impl Surface) {
    for ob in &state.obstacles {
        let size = Vec2::new(ob.width, ob.height);
        surface.fill_rect(ob.pos, size, palette::OBSTACLE);
        let outline = [
            ob.pos,
            ob.pos + Vec2::new(ob.width, 0.0),
            ob.pos + size,
            ob.pos + Vec2::new(0.0, ob.height),
        ];
        surface.stroke_polygon(&outline, 2.0, palette::OBSTACLE_HP);

        let frac = (ob.hp / ob.max_hp).clamp(0.0, 1.0);
        surface.fill_rect(
            ob.pos + Vec2::new(0.0, ob.height - 4.0),
            Vec2::new(ob.width * frac, 4.0),
            palette::OBSTACLE_HP,
        );
    }
}

fn draw_particles(state: &GameState, settings: &Settings, surface: &mut impl Surface) {
    let glow = settings.quality.glow_enabled();
    surface.save();
    surface.set_blend(Blend::Additive);
    for p in &state.particles {
        let alpha = if p.max_life > 0.0 { p.life / p.max_life } else { 0.0 };
        surface.set_alpha(alpha);
        if glow && p.glow {
            surface.fill_circle(p.pos, p.size * 2.0, with_alpha(p.color, 0.3));
        }
        surface.fill_circle(p.pos, p.size, p.color);
    }
    surface.restore();
}

fn draw_pickups(state: &GameState, t: f32, surface: &mut impl Surface) {
    for gem in &state.gems {
        let diamond = shapes::polygon(gem.pos, gem.size, 4, t * 0.05);
        surface.fill_polygon(&diamond, palette::EXP);
    }
    for heart in &state.hearts {
        let scale = 1.0 + heart.pulse.sin() * 0.1;
        let outline = shapes::heart(heart.pos, heart.size * 2.0 * scale);
        surface.fill_polygon(&outline, palette::HEART);
    }
}

fn draw_enemy_bullets(state: &GameState, surface: &mut impl Surface) {
    for b in &state.enemy_bullets {
        surface.fill_circle(b.pos, b.radius, palette::ENEMY_BULLET);
        surface.fill_circle(b.pos, b.radius * 0.4, palette::WHITE);
    }
}

fn draw_bullet(bullet: &Bullet, settings: &Settings, t: f32, surface: &mut impl Surface) {
    if bullet.black_hole {
        surface.fill_circle(bullet.pos, bullet.radius, BLACK_HOLE_CORE);
        for i in 0..2 {
            let phase = (t * 0.15 + i as f32 * PI).sin() * 0.1;
            let r = bullet.radius * (1.0 + 0.25 * (i + 1) as f32 + phase);
            surface.stroke_circle(bullet.pos, r, 2.0, with_alpha(palette::PLAYER_EVOLVED, 0.7));
        }
        return;
    }

    let n = settings.trail_points(bullet.trail.len());
    if n > 1 {
        surface.polyline(&bullet.trail[..n], bullet.radius * 1.2, palette::BULLET_TRAIL);
    }
    surface.fill_circle(bullet.pos, bullet.radius, palette::BULLET);
}

fn draw_enemy(enemy: &Enemy, t: f32, surface: &mut impl Surface) {
    let pos = enemy.pos + enemy.shake;
    let color = if enemy.hit_flash > FLASH_THRESHOLD {
        palette::WHITE
    } else {
        enemy.color
    };

    if let Some(aim) = enemy.aim_point() {
        surface.line(pos, aim, 1.0, AIM_LINE);
    }

    let spin = if enemy.is_boss() { 0.01 } else { 0.02 };
    let outline = shapes::polygon(pos, enemy.size * 0.5, enemy.sides, t * spin + enemy.id as f32);
    surface.fill_polygon(&outline, with_alpha(color, 0.25));
    surface.stroke_polygon(&outline, 2.0, color);

    if enemy.is_boss() {
        return;
    }

    if enemy.is_damaged() {
        let frac = (enemy.hp / enemy.max_hp).clamp(0.0, 1.0);
        let origin = pos - Vec2::new(enemy.size * 0.5, enemy.size * 0.7 + 8.0);
        surface.fill_rect(origin, Vec2::new(enemy.size, 4.0), palette::HEART_EMPTY);
        surface.fill_rect(origin, Vec2::new(enemy.size * frac, 4.0), enemy.color);
    }

    let label = tuning::format_value(enemy.hp.max(0.0).ceil() as f64);
    let size = if enemy.kind == EnemyKind::Splitter { 10.0 } else { 12.0 };
    surface.text(&label, pos, size, TextAlign::Center, palette::WHITE);
}

fn draw_damage_numbers(state: &GameState, surface: &mut impl Surface) {
    for dn in &state.damage_numbers {
        let alpha = if dn.max_life > 0.0 { dn.life / dn.max_life } else { 0.0 };
        let size = if dn.crit { 22.0 } else { 16.0 };
        surface.text(&dn.text, dn.pos, size, TextAlign::Center, with_alpha(dn.color, alpha));
    }
}

fn draw_player(state: &GameState, settings: &Settings, surface: &mut impl Surface) {
    let player = &state.player;
    let mut alpha = 1.0;
    if player.is_invincible() {
        if settings.reduced_motion {
            alpha = 0.5;
        } else if (state.frame / 4) % 2 == 0 {
            return;
        }
    }

    let color = match player.weapon_mode {
        WeaponMode::Standard => palette::PLAYER,
        WeaponMode::BlackHole => palette::PLAYER_EVOLVED,
    };
    let r = player.radius;
    let ship = [
        player.pos + Vec2::new(0.0, -r),
        player.pos + Vec2::new(r * 0.8, r * 0.8),
        player.pos + Vec2::new(-r * 0.8, r * 0.8),
    ];

    surface.save();
    surface.set_alpha(alpha);
    surface.fill_polygon(&ship, with_alpha(color, 0.3));
    surface.stroke_polygon(&ship, 2.5, color);
    surface.fill_circle(player.pos, r * 0.2, palette::WHITE);
    surface.restore();
}

fn draw_boss_bar(state: &GameState, surface: &mut impl Surface) {
    let Some(boss) = state.boss() else {
        return;
    };
    let width = surface.size().x - 40.0;
    let origin = Vec2::new(20.0, 64.0);
    let frac = (boss.hp / boss.max_hp).clamp(0.0, 1.0);
    surface.fill_rect(origin, Vec2::new(width, 8.0), palette::HEART_EMPTY);
    surface.fill_rect(origin, Vec2::new(width * frac, 8.0), boss.color);
    if let Some(variant) = boss.boss_variant {
        surface.text(
            variant.name(),
            origin + Vec2::new(width * 0.5, -8.0),
            14.0,
            TextAlign::Center,
            palette::WHITE,
        );
    }
}

fn draw_mercy(state: &GameState, surface: &mut impl Surface) {
    if state.mercy <= 0.0 {
        return;
    }
    let label = format!("OVERLOAD +{}%", (state.mercy * 100.0).round() as u32);
    let pos = Vec2::new(surface.size().x - 16.0, 32.0);
    surface.text(&label, pos, 14.0, TextAlign::Right, palette::MERCY);
}

fn draw_hearts(state: &GameState, surface: &mut impl Surface) {
    let player = &state.player;
    for i in 0..player.max_hearts as usize {
        let row = i / HEARTS_PER_ROW;
        let col = i % HEARTS_PER_ROW;
        let pos = HUD_ORIGIN + Vec2::new(col as f32, row as f32) * HUD_HEART_SPACING;
        let scale = player.heart_scales.get(i).copied().unwrap_or(1.0);
        let size = HUD_HEART_SIZE * scale;

        let held = player.health.saturating_sub(i as u32 * 2).min(2);
        surface.fill_polygon(&shapes::heart(pos, size), palette::HEART_EMPTY);
        match held {
            2 => surface.fill_polygon(&shapes::heart(pos, size), palette::HEART),
            1 => surface.fill_polygon(&shapes::half_heart(pos, size), palette::HEART),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, INVINCIBLE_TIME};
    use crate::renderer::VertexSurface;

    fn render(state: &GameState, settings: &Settings) -> VertexSurface {
        let mut surface = VertexSurface::new(FIELD_WIDTH, FIELD_HEIGHT);
        draw(state, settings, &mut surface);
        surface
    }

    #[test]
    fn test_jitter_range() {
        for f in 0..500 {
            let j = jitter(f, 7);
            assert!((-0.5..0.5).contains(&j));
        }
    }

    #[test]
    fn test_fresh_state_draws_player_and_hud() {
        let s = render(&GameState::new(), &Settings::default());
        assert!(s.vertex_count() > 0);
        assert!(s.text_runs().is_empty());
        assert_eq!(s.clear_color(), palette::BACKGROUND);
    }

    #[test]
    fn test_reduced_motion_suppresses_shake() {
        let calm = GameState::new();
        let mut shaking = GameState::new();
        shaking.frame = calm.frame;
        shaking.shake_timer = 30.0;

        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(render(&calm, &settings).batches(), render(&shaking, &settings).batches());
        assert_ne!(
            render(&calm, &Settings::default()).batches(),
            render(&shaking, &Settings::default()).batches()
        );
    }

    #[test]
    fn test_mercy_label() {
        let mut state = GameState::new();
        state.mercy = 0.2;
        let s = render(&state, &Settings::default());
        assert!(s.text_runs().iter().any(|r| r.text == "OVERLOAD +20%"));
    }

    #[test]
    fn test_invincible_player_flickers() {
        let mut state = GameState::new();
        state.player.invincible_timer = INVINCIBLE_TIME;
        state.frame = 0;
        let hidden = render(&state, &Settings::default()).vertex_count();
        state.frame = 4;
        let shown = render(&state, &Settings::default()).vertex_count();
        assert!(shown > hidden);
    }

    #[test]
    fn test_damage_numbers_toggle() {
        let mut state = GameState::new();
        state.damage_numbers.push(crate::sim::state::DamageNumber {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            text: "12".to_string(),
            color: palette::DAMAGE,
            life: 45.0,
            max_life: 45.0,
            crit: false,
        });
        assert_eq!(render(&state, &Settings::default()).text_runs().len(), 1);
        let off = Settings {
            damage_numbers: false,
            ..Settings::default()
        };
        assert!(render(&state, &off).text_runs().is_empty());
    }
}
