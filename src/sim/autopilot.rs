//! Scripted pointer for demo and headless runs
//!
//! Picks a movement target from the current state: sidestep the closest
//! incoming threat, otherwise go collect the nearest pickup, otherwise drift
//! along the lower part of the field.

use glam::Vec2;

use super::state::GameState;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Threats closer than this get dodged
const DANGER_RADIUS: f32 = 140.0;
/// Sidestep distance
const DODGE_STEP: f32 = 90.0;
/// Never go above this line
const CEILING: f32 = FIELD_HEIGHT * 2.0 / 3.0;
const MARGIN: f32 = 30.0;

/// Movement target for the next tick
pub fn steer(state: &GameState) -> Vec2 {
    let me = state.player.pos;

    // Closest enemy bullet or enemy body within reach
    let threat = state
        .enemy_bullets
        .iter()
        .map(|b| b.pos)
        .chain(state.enemies.iter().map(|e| e.pos))
        .filter(|p| p.distance(me) < DANGER_RADIUS)
        .min_by(|a, b| {
            a.distance_squared(me)
                .partial_cmp(&b.distance_squared(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target = if let Some(threat) = threat {
        // Step sideways away from it, toward the roomier side near a wall
        let away = if threat.x <= me.x { 1.0 } else { -1.0 };
        let dir = if (me.x < MARGIN * 2.0 && away < 0.0) || (me.x > FIELD_WIDTH - MARGIN * 2.0 && away > 0.0) {
            -away
        } else {
            away
        };
        Vec2::new(me.x + dir * DODGE_STEP, me.y + 20.0)
    } else if let Some(pickup) = state
        .hearts
        .iter()
        .map(|h| h.pos)
        .chain(state.gems.iter().map(|g| g.pos))
        .min_by(|a, b| {
            a.distance_squared(me)
                .partial_cmp(&b.distance_squared(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    {
        pickup
    } else {
        // Slow patrol so shots cover the whole width
        let t = state.frame as f32 * 0.01;
        let sway = t.sin() * 0.35 + (t * 0.7).sin() * 0.1;
        Vec2::new(FIELD_WIDTH * (0.5 + sway), FIELD_HEIGHT * 0.8)
    };

    Vec2::new(
        target.x.clamp(MARGIN, FIELD_WIDTH - MARGIN),
        target.y.clamp(CEILING, FIELD_HEIGHT - MARGIN),
    )
}
