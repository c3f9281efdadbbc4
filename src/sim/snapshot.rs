//! Read-only projection of a session for presentation

use serde::Serialize;

use super::collision::Rect;
use super::state::{GameEvent, GameStatus, LandmarkMarker, ObstacleKind, Session};
use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub vy: f32,
    pub grounded: bool,
    pub invincible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkView {
    pub index: usize,
    pub name: String,
    /// Standing on the ground at its current scroll position
    pub rect: Rect,
    pub triggered: bool,
    pub is_final: bool,
}

/// Content of the landmark info popup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkPopup {
    pub index: usize,
    pub name: String,
    pub description_en: String,
    pub description_de: String,
    pub is_final: bool,
}

impl LandmarkPopup {
    fn from_marker(marker: &LandmarkMarker) -> Self {
        Self {
            index: marker.index,
            name: marker.name.clone(),
            description_en: marker.description_en.clone(),
            description_de: marker.description_de.clone(),
            is_final: marker.is_final,
        }
    }

    pub fn description(&self, language: crate::Language) -> &str {
        match language {
            crate::Language::English => &self.description_en,
            crate::Language::German => &self.description_de,
        }
    }
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub status: GameStatus,
    pub frame: u64,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Y of the ground surface
    pub ground_y: f32,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    /// Landmarks currently intersecting the canvas
    pub landmarks: Vec<LandmarkView>,
    /// Displayed (scaled) score
    pub score: u64,
    pub lives: u32,
    pub game_speed: f32,
    pub background_offset: f32,
    pub background_width: Option<f32>,
    /// Landmark info to show while paused or before the win screen
    pub popup: Option<LandmarkPopup>,
    pub show_win_screen: bool,
    pub show_game_over: bool,
    /// Events raised during the frame that produced this state
    pub events: Vec<GameEvent>,
}

impl RenderState {
    pub fn capture(session: &Session, config: &GameConfig, events: Vec<GameEvent>) -> Self {
        let ground_y = config.ground_y();
        let canvas_width = config.world.canvas_width;

        let popup = match session.status {
            GameStatus::Paused { .. } | GameStatus::Win { revealed: false } => {
                session.active_landmark().map(LandmarkPopup::from_marker)
            }
            _ => None,
        };

        Self {
            status: session.status,
            frame: session.world.frame_count,
            canvas_width,
            canvas_height: config.world.canvas_height,
            ground_y,
            player: PlayerView {
                rect: session.player.rect(),
                vy: session.player.vy,
                grounded: session.player.grounded,
                invincible: session.player.invincible,
            },
            obstacles: session
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    rect: o.rect(),
                })
                .collect(),
            landmarks: session
                .landmarks
                .iter()
                .filter(|m| m.overlaps_span(0.0, canvas_width))
                .map(|m| LandmarkView {
                    index: m.index,
                    name: m.name.clone(),
                    rect: Rect::from_xywh(m.world_x, ground_y - m.height, m.width, m.height),
                    triggered: m.triggered,
                    is_final: m.is_final,
                })
                .collect(),
            score: session.world.displayed_score(config.score.divisor),
            lives: session.world.lives,
            game_speed: session.world.game_speed,
            background_offset: session.world.background_offset,
            background_width: session.world.background_width,
            popup,
            show_win_screen: session.status == GameStatus::Win { revealed: true },
            show_game_over: session.status == GameStatus::GameOver,
            events,
        }
    }
}
