//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Contact, Rect, classify_contact, overlaps};
pub use snapshot::{LandmarkPopup, LandmarkView, ObstacleView, PlayerView, RenderState};
pub use state::{
    GameEvent, GameStatus, LandmarkMarker, Obstacle, ObstacleKind, PlayerBody, Recovery, Session,
    WorldState,
};
pub use tick::{StepOutcome, StepReport, TickInput, jump, step};
