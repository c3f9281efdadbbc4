//! Game state machine
//!
//! Owns the single [`Session`] and decides, per status, what a frame's
//! intents mean. One raw trigger (space/tap) jumps while running, dismisses a
//! landmark popup while paused, and restarts from an end screen.

use crate::assets::AssetAvailability;
use crate::config::GameConfig;
use crate::next_seed;
use crate::sim::{GameEvent, GameStatus, RenderState, Session, TickInput, jump, step};

/// Player intents for one frame, produced by the input adapter or autopilot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    /// Edge-triggered: a new press happened since the last frame
    pub jump_pressed: bool,
    /// Level-triggered: the trigger is currently held down
    pub jump_held: bool,
    /// Continue past a landmark popup
    pub dismiss: bool,
    /// Start a new session from an end screen
    pub restart: bool,
}

/// The game: configuration, the current session and its status
pub struct Game {
    config: GameConfig,
    session: Session,
    /// Scaled background width once assets are known
    background_width: Option<f32>,
}

impl Game {
    /// Create a game waiting for assets (`Loading`)
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut session = Session::new(&config, seed);
        session.status = GameStatus::Loading;
        log::info!("Game created with seed {}", seed);
        Self {
            config,
            session,
            background_width: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    /// Leave `Loading` once the asset loader has settled. Returns false if the
    /// game was not loading.
    pub fn finish_loading(&mut self, assets: &AssetAvailability) -> bool {
        if self.session.status != GameStatus::Loading {
            return false;
        }
        self.background_width = assets.background_width(self.config.world.canvas_height);
        self.session.world.background_width = self.background_width;
        self.session.status = GameStatus::Running;
        log::info!(
            "Assets ready ({} of {} available), running",
            assets.available_count(),
            assets.len()
        );
        true
    }

    /// Throw away the current session and start a fresh one. Callable in any
    /// status; a game still loading stays loading.
    pub fn restart(&mut self) -> GameEvent {
        let seed = next_seed(self.session.seed);
        let loading = self.session.status == GameStatus::Loading;
        self.session = Session::new(&self.config, seed).with_background_width(self.background_width);
        if loading {
            self.session.status = GameStatus::Loading;
        }
        log::info!("Restarted with seed {}", seed);
        GameEvent::Restarted { seed }
    }

    /// Drive one display frame: interpret intents for the current status,
    /// step the simulation if running, and project the result.
    pub fn frame(&mut self, intents: &Intents) -> RenderState {
        let mut events = Vec::new();

        match self.session.status {
            GameStatus::Loading => {}
            GameStatus::Running => {
                if intents.jump_pressed && jump(&mut self.session, &self.config) {
                    events.push(GameEvent::Jumped);
                }
                let input = TickInput {
                    jump_held: intents.jump_held,
                };
                let report = step(&mut self.session, &self.config, &input);
                events.extend(report.events);
            }
            GameStatus::Paused { landmark } => {
                if intents.jump_pressed || intents.dismiss {
                    self.session.status = GameStatus::Running;
                    log::info!("Resumed after landmark {}", landmark);
                    events.push(GameEvent::Resumed);
                }
            }
            GameStatus::Win { revealed: false } => {
                if intents.restart {
                    events.push(self.restart());
                } else if intents.jump_pressed || intents.dismiss {
                    self.session.status = GameStatus::Win { revealed: true };
                    log::info!(
                        "Tour complete with score {}",
                        self.session.world.displayed_score(self.config.score.divisor)
                    );
                    events.push(GameEvent::WinRevealed);
                }
            }
            GameStatus::Win { revealed: true } | GameStatus::GameOver => {
                if intents.jump_pressed || intents.restart {
                    events.push(self.restart());
                }
            }
        }

        RenderState::capture(&self.session, &self.config, events)
    }

    /// Projection of the current state without advancing anything
    pub fn render_state(&self) -> RenderState {
        RenderState::capture(&self.session, &self.config, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetAvailability, AssetKey};
    use crate::sim::{Obstacle, ObstacleKind};
    use glam::Vec2;

    fn press() -> Intents {
        Intents {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        }
    }

    fn dismiss() -> Intents {
        Intents {
            dismiss: true,
            ..Default::default()
        }
    }

    fn restart() -> Intents {
        Intents {
            restart: true,
            ..Default::default()
        }
    }

    fn running_game() -> Game {
        let mut game = Game::new(GameConfig::default(), 2024);
        assert!(game.finish_loading(&AssetAvailability::default()));
        game
    }

    /// Put the next landmark right in front of the player
    fn approach_landmark(game: &mut Game, index: usize) {
        let right = game.session.player.pos.x + game.session.player.size.x;
        for marker in &mut game.session.landmarks[..index] {
            marker.triggered = true;
        }
        game.session.landmarks[index].world_x = right + 1.0;
    }

    /// Kill the player with a side hit on the last life
    fn lose(game: &mut Game) {
        game.session.world.lives = 1;
        let speed = game.session.world.game_speed;
        let x = game.session.player.pos.x + 10.0 + speed;
        let id = game.session.next_entity_id();
        game.session.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Barrier,
            pos: Vec2::new(x, game.config.ground_line(30.0)),
            size: Vec2::new(60.0, 30.0),
        });
        game.frame(&Intents::default());
        assert_eq!(game.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_loading_is_inert() {
        let mut game = Game::new(GameConfig::default(), 1);
        assert_eq!(game.status(), GameStatus::Loading);
        for _ in 0..10 {
            game.frame(&press());
        }
        assert_eq!(game.session().world.frame_count, 0);
        assert_eq!(game.status(), GameStatus::Loading);

        assert!(game.finish_loading(&AssetAvailability::default()));
        assert_eq!(game.status(), GameStatus::Running);
        assert!(!game.finish_loading(&AssetAvailability::default()));
    }

    #[test]
    fn test_finish_loading_scales_background_width() {
        let mut assets = AssetAvailability::default();
        assets.mark_available(AssetKey::Background, Some((1600, 800)));
        let mut game = Game::new(GameConfig::default(), 1);
        game.finish_loading(&assets);
        // 800px high image drawn 400 units high
        assert_eq!(game.session().world.background_width, Some(800.0));
    }

    #[test]
    fn test_jump_press_while_running() {
        let mut game = running_game();
        let state = game.frame(&press());
        assert!(state.events.contains(&GameEvent::Jumped));
        assert!(!state.player.grounded);
        assert!(state.player.vy < 0.0);
    }

    #[test]
    fn test_pause_and_continue() {
        let mut game = running_game();
        approach_landmark(&mut game, 0);

        let state = game.frame(&Intents::default());
        assert_eq!(state.status, GameStatus::Paused { landmark: 0 });
        assert!(state.popup.is_some());

        // Nothing moves while paused
        let score = game.session().world.score;
        let speed = game.session().world.game_speed;
        let frame = game.session().world.frame_count;
        for _ in 0..50 {
            game.frame(&Intents::default());
        }
        assert_eq!(game.session().world.score, score);
        assert_eq!(game.session().world.game_speed, speed);
        assert_eq!(game.session().world.frame_count, frame);

        // Restart is not accepted while paused
        game.frame(&restart());
        assert_eq!(game.status(), GameStatus::Paused { landmark: 0 });

        let state = game.frame(&dismiss());
        assert_eq!(state.status, GameStatus::Running);
        assert!(state.events.contains(&GameEvent::Resumed));
        assert!(game.session().landmarks[0].triggered);

        // Steps again
        game.frame(&Intents::default());
        assert_eq!(game.session().world.frame_count, frame + 1);
    }

    #[test]
    fn test_space_dismisses_popup() {
        let mut game = running_game();
        approach_landmark(&mut game, 0);
        game.frame(&Intents::default());

        let state = game.frame(&press());
        assert_eq!(state.status, GameStatus::Running);
        // The dismissing press does not also jump
        assert!(game.session().player.grounded);
    }

    #[test]
    fn test_win_reveal_is_deferred_until_continue() {
        let mut game = running_game();
        let last = game.session().landmarks.len() - 1;
        approach_landmark(&mut game, last);

        let state = game.frame(&Intents::default());
        assert_eq!(state.status, GameStatus::Win { revealed: false });
        assert!(!state.show_win_screen);
        assert!(state.popup.as_ref().is_some_and(|p| p.is_final));

        let state = game.frame(&dismiss());
        assert_eq!(state.status, GameStatus::Win { revealed: true });
        assert!(state.show_win_screen);
        assert!(state.events.contains(&GameEvent::WinRevealed));

        // Dismiss again is a no-op
        let state = game.frame(&dismiss());
        assert_eq!(state.status, GameStatus::Win { revealed: true });
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_from_game_over_matches_fresh_session() {
        let mut game = running_game();
        // Still inside the spawn warmup
        for _ in 0..60 {
            game.frame(&Intents::default());
        }
        lose(&mut game);

        let state = game.frame(&restart());
        assert_eq!(state.status, GameStatus::Running);
        let seed = game.session().seed;
        assert!(matches!(state.events.as_slice(), [GameEvent::Restarted { seed: s }] if *s == seed));

        let fresh = Session::new(game.config(), seed);
        assert_eq!(game.session(), &fresh);
        assert_eq!(game.session().world.lives, game.config().player.lives);
        assert!(game.session().obstacles.is_empty());
        assert!(game.session().landmarks.iter().all(|m| !m.triggered));
    }

    #[test]
    fn test_jump_restarts_from_end_screens() {
        let mut game = running_game();
        lose(&mut game);
        game.frame(&press());
        assert_eq!(game.status(), GameStatus::Running);

        let mut game = running_game();
        let last = game.session().landmarks.len() - 1;
        approach_landmark(&mut game, last);
        game.frame(&Intents::default());
        game.frame(&dismiss());
        game.frame(&press());
        assert_eq!(game.status(), GameStatus::Running);
        assert!(game.session().landmarks.iter().all(|m| !m.triggered));
    }

    #[test]
    fn test_restart_intent_ignored_while_running() {
        let mut game = running_game();
        for _ in 0..10 {
            game.frame(&Intents::default());
        }
        let seed = game.session().seed;
        game.frame(&restart());
        assert_eq!(game.session().seed, seed);
        assert_eq!(game.session().world.frame_count, 11);
    }

    #[test]
    fn test_restart_keeps_background_width() {
        let mut assets = AssetAvailability::default();
        assets.mark_available(AssetKey::Background, Some((800, 400)));
        let mut game = Game::new(GameConfig::default(), 9);
        game.finish_loading(&assets);
        game.restart();
        assert_eq!(game.session().world.background_width, Some(800.0));
        assert_eq!(game.status(), GameStatus::Running);
    }

    #[test]
    fn test_restart_while_loading_stays_loading() {
        let mut game = Game::new(GameConfig::default(), 9);
        game.restart();
        assert_eq!(game.status(), GameStatus::Loading);
    }
}
