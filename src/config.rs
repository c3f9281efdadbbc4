//! Game balance and content configuration
//!
//! Defaults reproduce the shipped game. A JSON override can be supplied to the
//! native binary; it is validated before a session is ever built from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::{AssetKey, AssetManifest};
use crate::consts::*;
use crate::sim::ObstacleKind;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("obstacle {kind:?}: {what} range is invalid ({min}..{max})")]
    InvalidRange {
        kind: ObstacleKind,
        what: &'static str,
        min: f32,
        max: f32,
    },

    #[error("ground height {ground} leaves no room for the player on a {canvas} high canvas")]
    GroundTooHigh { ground: f32, canvas: f32 },

    #[error("max speed {max} is below start speed {start}")]
    SpeedCeiling { start: f32, max: f32 },

    #[error("at least one landmark is required")]
    NoLandmarks,

    #[error("exactly one final landmark is required (found {0})")]
    FinalLandmarkCount(usize),

    #[error("final landmark {0:?} must be the furthest one")]
    FinalNotLast(String),
}

/// Canvas and scrolling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub ground_height: f32,
    pub start_speed: f32,
    pub speed_increment: f32,
    /// Ticks between speed increments
    pub speed_ramp_interval: u64,
    pub max_speed: f32,
    /// Background scrolls at `game_speed * background_damping`
    pub background_damping: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            ground_height: GROUND_HEIGHT,
            start_speed: START_SPEED,
            speed_increment: SPEED_INCREMENT,
            speed_ramp_interval: SPEED_RAMP_INTERVAL_TICKS,
            max_speed: MAX_SPEED,
            background_damping: BACKGROUND_DAMPING,
        }
    }
}

/// Player body and lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub lives: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            lives: STARTING_LIVES,
        }
    }
}

/// Vertical physics and collision response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_strength: f32,
    pub stomp_bounce: f32,
    pub held_gravity_multiplier: f32,
    pub released_gravity_multiplier: f32,
    pub stomp_tolerance: f32,
    pub knockback: f32,
    pub invincibility_ticks: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            stomp_bounce: STOMP_BOUNCE,
            held_gravity_multiplier: HELD_GRAVITY_MULTIPLIER,
            released_gravity_multiplier: RELEASED_GRAVITY_MULTIPLIER,
            stomp_tolerance: STOMP_TOLERANCE,
            knockback: KNOCKBACK,
            invincibility_ticks: INVINCIBILITY_TICKS,
        }
    }
}

/// Size range and sprite for one obstacle kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub image: String,
}

impl ObstacleSpec {
    fn new(kind: ObstacleKind, width: (f32, f32), height: (f32, f32)) -> Self {
        Self {
            kind,
            min_width: width.0,
            max_width: width.1,
            min_height: height.0,
            max_height: height.1,
            image: format!("images/{}.png", kind.as_str()),
        }
    }
}

/// Obstacle generation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// No spawns until `frame_count` exceeds this
    pub warmup_ticks: u64,
    pub interval_ticks: u64,
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            warmup_ticks: SPAWN_WARMUP_TICKS,
            interval_ticks: SPAWN_INTERVAL_TICKS,
            obstacles: vec![
                ObstacleSpec::new(ObstacleKind::Cone, (24.0, 32.0), (32.0, 44.0)),
                ObstacleSpec::new(ObstacleKind::Crate, (36.0, 48.0), (36.0, 48.0)),
                ObstacleSpec::new(ObstacleKind::Barrier, (56.0, 72.0), (28.0, 36.0)),
            ],
        }
    }
}

/// Score accumulator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub per_tick: u64,
    /// Displayed score = accumulator / divisor
    pub divisor: u64,
    pub stomp_bonus: u64,
    pub hit_penalty: u64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            per_tick: SCORE_PER_TICK,
            divisor: SCORE_DIVISOR,
            stomp_bonus: STOMP_BONUS,
            hit_penalty: HIT_PENALTY,
        }
    }
}

/// One entry of the landmark content feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSpec {
    pub name: String,
    pub world_x: f32,
    pub width: f32,
    pub height: f32,
    pub description_en: String,
    pub description_de: String,
    pub is_final: bool,
    #[serde(default)]
    pub image: Option<String>,
}

/// Sprites not tied to an obstacle or landmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpritePaths {
    pub player: String,
    pub background: String,
}

impl Default for SpritePaths {
    fn default() -> Self {
        Self {
            player: "images/player.png".to_string(),
            background: "images/background.png".to_string(),
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub physics: PhysicsConfig,
    pub spawn: SpawnConfig,
    pub score: ScoreConfig,
    pub landmarks: Vec<LandmarkSpec>,
    pub sprites: SpritePaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            physics: PhysicsConfig::default(),
            spawn: SpawnConfig::default(),
            score: ScoreConfig::default(),
            landmarks: crate::landmarks::default_landmarks(),
            sprites: SpritePaths::default(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON override (missing fields fall back to defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Y coordinate of the ground surface
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.world.canvas_height - self.world.ground_height
    }

    /// Resting Y (top edge) for a body of the given height
    #[inline]
    pub fn ground_line(&self, height: f32) -> f32 {
        self.ground_y() - height
    }

    /// Every sprite the presentation layer may ask for
    pub fn asset_manifest(&self) -> AssetManifest {
        let mut manifest = AssetManifest::default();
        manifest.insert(AssetKey::Player, &self.sprites.player);
        manifest.insert(AssetKey::Background, &self.sprites.background);
        for spec in &self.spawn.obstacles {
            manifest.insert(AssetKey::Obstacle(spec.kind), &spec.image);
        }
        for (i, landmark) in self.landmarks.iter().enumerate() {
            if let Some(image) = &landmark.image {
                manifest.insert(AssetKey::Landmark(i), image);
            }
        }
        manifest
    }

    /// Check invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.canvas_width", self.world.canvas_width)?;
        positive("world.canvas_height", self.world.canvas_height)?;
        positive("player.width", self.player.width)?;
        positive("player.height", self.player.height)?;
        positive("player.lives", self.player.lives as f64)?;
        positive("spawn.interval_ticks", self.spawn.interval_ticks as f64)?;
        positive("world.speed_ramp_interval", self.world.speed_ramp_interval as f64)?;
        positive("score.divisor", self.score.divisor as f64)?;

        if self.world.ground_height < 0.0
            || self.ground_line(self.player.height) < 0.0
        {
            return Err(ConfigError::GroundTooHigh {
                ground: self.world.ground_height,
                canvas: self.world.canvas_height,
            });
        }

        if self.world.start_speed < 0.0 || self.world.max_speed < self.world.start_speed {
            return Err(ConfigError::SpeedCeiling {
                start: self.world.start_speed,
                max: self.world.max_speed,
            });
        }

        for spec in &self.spawn.obstacles {
            check_range(spec.kind, "width", spec.min_width, spec.max_width)?;
            check_range(spec.kind, "height", spec.min_height, spec.max_height)?;
        }

        if self.landmarks.is_empty() {
            return Err(ConfigError::NoLandmarks);
        }
        let finals: Vec<&LandmarkSpec> = self.landmarks.iter().filter(|l| l.is_final).collect();
        if finals.len() != 1 {
            return Err(ConfigError::FinalLandmarkCount(finals.len()));
        }
        let last = finals[0];
        if self.landmarks.iter().any(|l| !l.is_final && l.world_x >= last.world_x) {
            return Err(ConfigError::FinalNotLast(last.name.clone()));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: impl Into<f64>) -> Result<(), ConfigError> {
    let value = value.into();
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn check_range(kind: ObstacleKind, what: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min < 0.0 || max < min || !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::InvalidRange { kind, what, min, max });
    }
    Ok(())
}
