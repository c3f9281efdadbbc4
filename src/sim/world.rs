//! World scroll: landmark positions, speed ramp and background offset

use super::state::{Session, WorldState};
use crate::config::GameConfig;
use crate::wrap_offset;

/// Scroll every landmark left by the game speed, then trigger the first
/// untriggered one whose span now overlaps the player's. Returns its index.
pub fn advance_landmarks(session: &mut Session) -> Option<usize> {
    let speed = session.world.game_speed;
    for marker in &mut session.landmarks {
        marker.world_x -= speed;
    }

    let left = session.player.pos.x;
    let right = left + session.player.size.x;
    let marker = session
        .landmarks
        .iter_mut()
        .find(|m| !m.triggered && m.overlaps_span(left, right))?;
    marker.triggered = true;
    Some(marker.index)
}

/// Every `speed_ramp_interval` ticks bump the speed toward the ceiling.
/// Returns the new speed when it changed.
pub fn ramp_speed(world: &mut WorldState, config: &GameConfig) -> Option<f32> {
    let interval = config.world.speed_ramp_interval.max(1);
    if !world.frame_count.is_multiple_of(interval) {
        return None;
    }
    let next = (world.game_speed + config.world.speed_increment).min(config.world.max_speed);
    if next > world.game_speed {
        world.game_speed = next;
        Some(next)
    } else {
        None
    }
}

/// Move the background by the damped speed, wrapping once its width is known
pub fn scroll_background(world: &mut WorldState, config: &GameConfig) {
    world.background_offset -= world.game_speed * config.world.background_damping;
    if let Some(width) = world.background_width {
        world.background_offset = wrap_offset(world.background_offset, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmarks_scroll_by_speed() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 1);
        let before: Vec<f32> = session.landmarks.iter().map(|m| m.world_x).collect();

        assert_eq!(advance_landmarks(&mut session), None);
        for (marker, x) in session.landmarks.iter().zip(before) {
            assert!((marker.world_x - (x - config.world.start_speed)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_first_overlapping_landmark_triggers_once() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 1);
        let player_right = session.player.pos.x + session.player.size.x;
        session.landmarks[0].world_x = player_right + session.world.game_speed - 1.0;

        assert_eq!(advance_landmarks(&mut session), Some(0));
        assert!(session.landmarks[0].triggered);

        // Still overlapping but already triggered
        assert_eq!(advance_landmarks(&mut session), None);
        assert!(session.landmarks[0].triggered);
    }

    #[test]
    fn test_speed_ramp_and_cap() {
        let config = GameConfig::default();
        let mut world = WorldState::new(&config);

        world.frame_count = 239;
        assert_eq!(ramp_speed(&mut world, &config), None);

        world.frame_count = 240;
        let speed = ramp_speed(&mut world, &config).unwrap();
        assert!((speed - 2.27).abs() < 1e-4);

        world.game_speed = config.world.max_speed - 0.01;
        world.frame_count = 480;
        assert_eq!(ramp_speed(&mut world, &config), Some(config.world.max_speed));
        world.frame_count = 720;
        assert_eq!(ramp_speed(&mut world, &config), None);
        assert_eq!(world.game_speed, config.world.max_speed);
    }

    #[test]
    fn test_background_wraps_only_with_width() {
        let config = GameConfig::default();
        let mut world = WorldState::new(&config);
        world.background_offset = -799.0;
        scroll_background(&mut world, &config);
        assert!((world.background_offset - (-800.1)).abs() < 1e-3);

        world.background_width = Some(800.0);
        world.background_offset = -799.0;
        scroll_background(&mut world, &config);
        assert!((world.background_offset - (-0.1)).abs() < 1e-3);
    }
}
