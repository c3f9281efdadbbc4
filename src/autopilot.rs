//! Demo mode - a simple bot that plays from the rendered state
//!
//! The autopilot only sees what a player sees (a [`RenderState`]) and answers
//! with the same [`Intents`] a human would produce. It never restarts: end
//! screens wait for a real player.

use crate::game::Intents;
use crate::sim::{GameStatus, RenderState};

/// Frames a landmark popup stays up before the bot continues
pub const READ_DELAY_FRAMES: u32 = 150;

/// Jump when the next obstacle is this many ticks of travel away
const LEAD_TICKS: f32 = 6.0;
/// Extra slack on top of the lead distance
const LEAD_MARGIN: f32 = 4.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    /// Frames the current popup has been visible
    reading: u32,
    /// A jump was started and is still being held
    holding: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this frame's intents from the last rendered state
    pub fn intents(&mut self, state: &RenderState) -> Intents {
        match state.status {
            GameStatus::Paused { .. } | GameStatus::Win { revealed: false } => {
                self.holding = false;
                self.reading += 1;
                if self.reading >= READ_DELAY_FRAMES {
                    self.reading = 0;
                    return Intents {
                        dismiss: true,
                        ..Default::default()
                    };
                }
                Intents::default()
            }
            GameStatus::Running => {
                self.reading = 0;
                self.drive(state)
            }
            _ => {
                self.reading = 0;
                self.holding = false;
                Intents::default()
            }
        }
    }

    fn drive(&mut self, state: &RenderState) -> Intents {
        let player = &state.player;

        // Hold through the ascent for maximum height, let go at the apex
        if self.holding {
            self.holding = player.vy < 0.0;
            return Intents {
                jump_held: self.holding,
                ..Default::default()
            };
        }

        if !player.grounded {
            return Intents::default();
        }

        // Nearest obstacle that is not yet behind the player
        let next = state
            .obstacles
            .iter()
            .filter(|o| o.rect.right() > player.rect.left())
            .min_by(|a, b| {
                a.rect
                    .left()
                    .partial_cmp(&b.rect.left())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(obstacle) = next else {
            return Intents::default();
        };

        let gap = obstacle.rect.left() - player.rect.right();
        let trigger = state.game_speed * LEAD_TICKS + LEAD_MARGIN;
        if gap <= trigger {
            self.holding = true;
            return Intents {
                jump_pressed: true,
                jump_held: true,
                ..Default::default()
            };
        }
        Intents::default()
    }
}
