//! Landmark Runner - a side-scrolling runner through a city of landmarks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scrolling)
//! - `game`: Game state machine driving the simulation one frame at a time
//! - `config`: Data-driven game balance and landmark content
//! - `assets`: Sprite loading with per-key availability
//! - `renderer`: Draw list construction and WebGPU pipeline
//! - `platform`: Browser/native input abstraction

pub mod assets;
pub mod autopilot;
pub mod config;
pub mod game;
pub mod landmarks;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use game::{Game, Intents};
pub use settings::{Language, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second (one step per display frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Canvas dimensions in world units
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;
    pub const GROUND_HEIGHT: f32 = 60.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Physics (per tick)
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_STRENGTH: f32 = -12.5;
    pub const STOMP_BOUNCE: f32 = -8.0;
    /// Gravity multiplier while ascending with jump held
    pub const HELD_GRAVITY_MULTIPLIER: f32 = 0.55;
    /// Gravity multiplier while ascending after jump was released
    pub const RELEASED_GRAVITY_MULTIPLIER: f32 = 1.9;
    /// How far below an obstacle top the previous bottom edge may be and still stomp
    pub const STOMP_TOLERANCE: f32 = 8.0;
    pub const KNOCKBACK: f32 = -6.0;
    pub const INVINCIBILITY_TICKS: u32 = 90;

    /// Spawner
    pub const SPAWN_WARMUP_TICKS: u64 = 120;
    pub const SPAWN_INTERVAL_TICKS: u64 = 90;

    /// World scroll
    pub const START_SPEED: f32 = 2.2;
    pub const SPEED_INCREMENT: f32 = 0.07;
    pub const SPEED_RAMP_INTERVAL_TICKS: u64 = 240;
    pub const MAX_SPEED: f32 = 7.0;
    pub const BACKGROUND_DAMPING: f32 = 0.5;

    /// Scoring (accumulator units; displayed score = accumulator / SCORE_DIVISOR)
    pub const SCORE_PER_TICK: u64 = 1;
    pub const SCORE_DIVISOR: u64 = 5;
    pub const STOMP_BONUS: u64 = 100;
    pub const HIT_PENALTY: u64 = 250;

    /// Landmark markers
    pub const LANDMARK_WIDTH: f32 = 140.0;
    pub const LANDMARK_HEIGHT: f32 = 180.0;
}

/// Deterministic seed derivation (splitmix64), used to reseed on restart
#[inline]
pub fn next_seed(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Wrap a scroll offset into (-width, 0]; widths <= 0 leave the offset untouched
#[inline]
pub fn wrap_offset(offset: f32, width: f32) -> f32 {
    if width > 0.0 { offset % width } else { offset }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_seed_differs() {
        let a = next_seed(1);
        let b = next_seed(a);
        assert_ne!(a, 1);
        assert_ne!(a, b);
        assert_eq!(next_seed(1), a);
    }

    #[test]
    fn test_wrap_offset() {
        assert!((wrap_offset(-810.0, 800.0) - (-10.0)).abs() < 1e-4);
        assert_eq!(wrap_offset(-5.0, 0.0), -5.0);
        assert_eq!(wrap_offset(-800.0, 800.0), 0.0);
    }
}
