//! Session state and core simulation types
//!
//! Everything a running game owns lives in [`Session`]. The state machine in
//! `crate::game` is its only mutator; presentation reads a [`RenderState`]
//! projection instead of these fields.
//!
//! [`RenderState`]: super::snapshot::RenderState

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::{GameConfig, LandmarkSpec};
use crate::settings::Language;

/// Current status of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the asset loader to settle
    Loading,
    /// Active gameplay; the only status that steps the simulation
    Running,
    /// A landmark popup is showing (index into `Session::landmarks`)
    Paused { landmark: usize },
    /// Lives exhausted
    GameOver,
    /// Final landmark reached; `revealed` once its popup has been dismissed
    Win { revealed: bool },
}

impl GameStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, GameStatus::Running)
    }

    /// Terminal for the current session (only a restart leaves these)
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Win { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Loading => "loading",
            GameStatus::Running => "running",
            GameStatus::Paused { .. } => "paused",
            GameStatus::GameOver => "game-over",
            GameStatus::Win { .. } => "win",
        }
    }
}

/// Obstacle types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ObstacleKind {
    #[default]
    Cone,
    Crate,
    Barrier,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Cone, ObstacleKind::Crate, ObstacleKind::Barrier];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Cone => "cone",
            ObstacleKind::Crate => "crate",
            ObstacleKind::Barrier => "barrier",
        }
    }
}

/// The player's body. Only `pos.y` is simulated; `pos.x` is fixed in the
/// world-scroll frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub grounded: bool,
    /// Collisions are ignored while set (cleared when recovery runs out)
    pub invincible: bool,
}

impl PlayerBody {
    /// Start pose: standing on the ground line
    pub fn new(config: &GameConfig) -> Self {
        let size = Vec2::new(config.player.width, config.player.height);
        Self {
            pos: Vec2::new(config.player.x, config.ground_line(size.y)),
            size,
            vy: 0.0,
            grounded: true,
            invincible: false,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// An obstacle scrolling toward the player at the shared game speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A narrative checkpoint in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkMarker {
    pub index: usize,
    pub name: String,
    /// Left edge; decreases by the game speed every tick
    pub world_x: f32,
    pub width: f32,
    pub height: f32,
    pub description_en: String,
    pub description_de: String,
    pub is_final: bool,
    /// One-shot; never resets within a session
    pub triggered: bool,
}

impl LandmarkMarker {
    pub fn from_spec(index: usize, spec: &LandmarkSpec) -> Self {
        Self {
            index,
            name: spec.name.clone(),
            world_x: spec.world_x,
            width: spec.width,
            height: spec.height,
            description_en: spec.description_en.clone(),
            description_de: spec.description_de.clone(),
            is_final: spec.is_final,
            triggered: false,
        }
    }

    /// True if the marker's horizontal span overlaps `[left, right)`
    pub fn overlaps_span(&self, left: f32, right: f32) -> bool {
        self.world_x < right && self.world_x + self.width > left
    }

    pub fn description(&self, language: Language) -> &str {
        match language {
            Language::English => &self.description_en,
            Language::German => &self.description_de,
        }
    }
}

/// Post-hit recovery window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recovery {
    /// Ticks left in the window
    pub remaining: u32,
    pub active: bool,
}

/// Scalar world state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Shared scroll speed; non-decreasing within a session
    pub game_speed: f32,
    /// Score accumulator (never below 0)
    pub score: u64,
    pub lives: u32,
    /// Simulation tick counter
    pub frame_count: u64,
    /// Background scroll offset, wrapped by `background_width` when known
    pub background_offset: f32,
    /// Width of the loaded background image, if any
    pub background_width: Option<f32>,
    pub recovery: Recovery,
}

impl WorldState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            game_speed: config.world.start_speed,
            score: 0,
            lives: config.player.lives,
            frame_count: 0,
            background_offset: 0.0,
            background_width: None,
            recovery: Recovery::default(),
        }
    }

    /// Score as shown to the player
    pub fn displayed_score(&self, divisor: u64) -> u64 {
        self.score / divisor.max(1)
    }
}

/// Things that happened during a frame (presentation/logging only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    ObstacleSpawned { id: u32, kind: ObstacleKind },
    Stomped { id: u32, kind: ObstacleKind },
    Hit { kind: ObstacleKind, lives_left: u32 },
    LandmarkReached { index: usize, is_final: bool },
    SpeedUp { speed: f32 },
    GameOver { score: u64 },
    Resumed,
    WinRevealed,
    Restarted { seed: u64 },
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawner RNG
    pub rng: Pcg32,
    pub player: PlayerBody,
    /// Active obstacles (spawn order, oldest first)
    pub obstacles: Vec<Obstacle>,
    pub landmarks: Vec<LandmarkMarker>,
    pub world: WorldState,
    pub status: GameStatus,
    /// Next entity ID
    next_id: u32,
}

impl Session {
    /// Build a fresh session: start pose, no obstacles, landmarks re-derived
    /// from configuration, status `Running`.
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: PlayerBody::new(config),
            obstacles: Vec::new(),
            landmarks: config
                .landmarks
                .iter()
                .enumerate()
                .map(|(i, spec)| LandmarkMarker::from_spec(i, spec))
                .collect(),
            world: WorldState::new(config),
            status: GameStatus::Running,
            next_id: 1,
        }
    }

    /// Same as [`Session::new`] with a known background width
    pub fn with_background_width(mut self, width: Option<f32>) -> Self {
        self.world.background_width = width.filter(|w| *w > 0.0);
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The landmark a paused/won session is showing, if any
    pub fn active_landmark(&self) -> Option<&LandmarkMarker> {
        match self.status {
            GameStatus::Paused { landmark } => self.landmarks.get(landmark),
            GameStatus::Win { .. } => self.landmarks.iter().find(|m| m.is_final && m.triggered),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let config = GameConfig::default();
        let session = Session::new(&config, 7);

        assert_eq!(session.status, GameStatus::Running);
        assert!(session.obstacles.is_empty());
        assert_eq!(session.world.lives, config.player.lives);
        assert_eq!(session.world.score, 0);
        assert!((session.world.game_speed - config.world.start_speed).abs() < f32::EPSILON);
        assert!(session.player.grounded);
        assert_eq!(session.player.pos.y, config.ground_line(config.player.height));
        assert_eq!(session.landmarks.len(), config.landmarks.len());
        assert!(session.landmarks.iter().all(|m| !m.triggered));
    }

    #[test]
    fn test_landmarks_rederived_from_config() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 1);
        session.landmarks[0].world_x -= 500.0;
        session.landmarks[0].triggered = true;

        let fresh = Session::new(&config, 1);
        assert_eq!(fresh.landmarks[0].world_x, config.landmarks[0].world_x);
        assert!(!fresh.landmarks[0].triggered);
    }

    #[test]
    fn test_displayed_score() {
        let config = GameConfig::default();
        let mut world = WorldState::new(&config);
        world.score = 104;
        assert_eq!(world.displayed_score(5), 20);
        assert_eq!(world.displayed_score(0), 104);
    }

    #[test]
    fn test_landmark_span_overlap_is_strict() {
        let config = GameConfig::default();
        let mut marker = LandmarkMarker::from_spec(0, &config.landmarks[0]);
        marker.world_x = 128.0;
        // Player span 80..128: touching edge does not count
        assert!(!marker.overlaps_span(80.0, 128.0));
        marker.world_x = 127.0;
        assert!(marker.overlaps_span(80.0, 128.0));
    }

    #[test]
    fn test_background_width_filters_non_positive() {
        let config = GameConfig::default();
        let session = Session::new(&config, 1).with_background_width(Some(0.0));
        assert_eq!(session.world.background_width, None);
        let session = Session::new(&config, 1).with_background_width(Some(1600.0));
        assert_eq!(session.world.background_width, Some(1600.0));
    }
}
