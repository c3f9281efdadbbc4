//! Obstacle generation policy

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, Obstacle, Session};
use crate::config::GameConfig;

/// True on ticks where a new obstacle is due
pub fn spawn_due(frame_count: u64, config: &GameConfig) -> bool {
    let interval = config.spawn.interval_ticks.max(1);
    frame_count > config.spawn.warmup_ticks && frame_count.is_multiple_of(interval)
}

/// Spawn one obstacle at the right world edge if the policy says so.
///
/// The kind is picked uniformly from the configured set, the size from that
/// kind's range. With no configured kinds nothing spawns.
pub fn maybe_spawn(session: &mut Session, config: &GameConfig) -> Option<GameEvent> {
    if !spawn_due(session.world.frame_count, config) || config.spawn.obstacles.is_empty() {
        return None;
    }

    let index = session.rng.random_range(0..config.spawn.obstacles.len());
    let spec = &config.spawn.obstacles[index];
    let width = draw(&mut session.rng, spec.min_width, spec.max_width);
    let height = draw(&mut session.rng, spec.min_height, spec.max_height);

    let id = session.next_entity_id();
    let obstacle = Obstacle {
        id,
        kind: spec.kind,
        pos: Vec2::new(config.world.canvas_width, config.ground_line(height)),
        size: Vec2::new(width, height),
    };
    log::debug!(
        "Spawned {} #{} ({:.0}x{:.0}) at frame {}",
        spec.kind.as_str(),
        id,
        width,
        height,
        session.world.frame_count
    );
    session.obstacles.push(obstacle);

    Some(GameEvent::ObstacleSpawned { id, kind: spec.kind })
}

/// Uniform draw from `[lo, hi]`; an inverted range is read the right way round
fn draw(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    lo + rng.random::<f32>() * (hi - lo)
}
