//! Fixed-step simulation tick
//!
//! One call advances a running session by exactly one frame. The order of the
//! phases matters: each one reads what the previous one wrote.

use super::collision::{Contact, classify_contact, overlaps};
use super::spawner::maybe_spawn;
use super::state::{GameEvent, GameStatus, Session};
use super::world::{advance_landmarks, ramp_speed, scroll_background};
use crate::config::GameConfig;

/// Level-triggered input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump is physically held (selects the ascent gravity multiplier)
    pub jump_held: bool,
}

/// Where a tick stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Ran to the end of the tick
    Completed,
    /// A landmark was triggered; score and speed were skipped
    LandmarkReached { index: usize },
    /// Last life lost; the rest of the tick was skipped
    GameOver,
    /// Session was not running, nothing happened
    Inert,
}

/// Outcome plus the events emitted along the way
#[derive(Debug, Clone)]
pub struct StepReport {
    pub outcome: StepOutcome,
    pub events: Vec<GameEvent>,
}

impl StepReport {
    fn new(outcome: StepOutcome, events: Vec<GameEvent>) -> Self {
        Self { outcome, events }
    }
}

/// Start a jump if the player is standing on the ground
pub fn jump(session: &mut Session, config: &GameConfig) -> bool {
    if !session.player.grounded {
        return false;
    }
    session.player.vy = config.physics.jump_strength;
    session.player.grounded = false;
    true
}

/// Advance the session by one tick. Does nothing unless `Running`.
pub fn step(session: &mut Session, config: &GameConfig, input: &TickInput) -> StepReport {
    if !session.status.is_running() {
        return StepReport::new(StepOutcome::Inert, Vec::new());
    }
    let mut events = Vec::new();
    let physics = &config.physics;

    // 1. Clock and recovery window
    session.world.frame_count += 1;
    let recovery = &mut session.world.recovery;
    if recovery.active {
        recovery.remaining = recovery.remaining.saturating_sub(1);
        if recovery.remaining == 0 {
            recovery.active = false;
            session.player.invincible = false;
        }
    }

    // 2. Gravity with variable jump height
    let player = &mut session.player;
    let multiplier = if player.vy < 0.0 {
        if input.jump_held {
            physics.held_gravity_multiplier
        } else {
            physics.released_gravity_multiplier
        }
    } else {
        1.0
    };
    player.vy += physics.gravity * multiplier;

    // 3. Integrate and clamp to the ground line
    let previous_bottom = player.bottom();
    player.pos.y += player.vy;
    let ground_line = config.ground_line(player.size.y);
    if player.pos.y >= ground_line {
        player.pos.y = ground_line;
        player.vy = 0.0;
        player.grounded = true;
    } else {
        player.grounded = false;
    }

    // 4. Spawner
    if let Some(event) = maybe_spawn(session, config) {
        events.push(event);
    }

    // 5. Scroll obstacles and drop the ones that left the world
    let speed = session.world.game_speed;
    for obstacle in &mut session.obstacles {
        obstacle.pos.x -= speed;
    }
    session.obstacles.retain(|o| o.right() >= 0.0);

    // 6. Collisions, newest obstacle first
    if !session.player.invincible {
        let descending = session.player.vy > 0.0;
        let mut i = session.obstacles.len();
        while i > 0 {
            i -= 1;
            let obstacle = &session.obstacles[i];
            if !overlaps(&session.player.rect(), &obstacle.rect()) {
                continue;
            }

            match classify_contact(descending, previous_bottom, obstacle.top(), physics.stomp_tolerance) {
                Contact::Stomp => {
                    let obstacle = session.obstacles.remove(i);
                    let player = &mut session.player;
                    player.vy = physics.stomp_bounce;
                    player.pos.y = obstacle.top() - player.size.y;
                    player.grounded = false;
                    session.world.score += config.score.stomp_bonus;
                    log::debug!("Stomped {} #{}", obstacle.kind.as_str(), obstacle.id);
                    events.push(GameEvent::Stomped {
                        id: obstacle.id,
                        kind: obstacle.kind,
                    });
                }
                Contact::Hit => {
                    let kind = obstacle.kind;
                    let world = &mut session.world;
                    world.lives = world.lives.saturating_sub(1);
                    world.score = world.score.saturating_sub(config.score.hit_penalty);
                    world.recovery.remaining = physics.invincibility_ticks;
                    world.recovery.active = true;

                    let player = &mut session.player;
                    player.invincible = true;
                    player.vy = physics.knockback;
                    player.grounded = false;

                    let lives_left = world.lives;
                    log::debug!("Hit {} ({} lives left)", kind.as_str(), lives_left);
                    events.push(GameEvent::Hit { kind, lives_left });

                    if lives_left == 0 {
                        session.status = GameStatus::GameOver;
                        log::info!(
                            "Game over at frame {} with score {}",
                            session.world.frame_count,
                            session.world.displayed_score(config.score.divisor)
                        );
                        events.push(GameEvent::GameOver {
                            score: session.world.displayed_score(config.score.divisor),
                        });
                        return StepReport::new(StepOutcome::GameOver, events);
                    }
                    break;
                }
            }
        }
    }

    // 7. Landmarks
    if let Some(index) = advance_landmarks(session) {
        let marker = &session.landmarks[index];
        let is_final = marker.is_final;
        session.status = if is_final {
            GameStatus::Win { revealed: false }
        } else {
            GameStatus::Paused { landmark: index }
        };
        log::info!("Reached landmark {:?} (final: {})", marker.name, is_final);
        events.push(GameEvent::LandmarkReached { index, is_final });
        return StepReport::new(StepOutcome::LandmarkReached { index }, events);
    }

    // 8. Score
    session.world.score += config.score.per_tick;

    // 9. Speed ramp
    if let Some(speed) = ramp_speed(&mut session.world, config) {
        log::debug!("Speed up to {:.2}", speed);
        events.push(GameEvent::SpeedUp { speed });
    }

    // 10. Background
    scroll_background(&mut session.world, config);

    StepReport::new(StepOutcome::Completed, events)
}
