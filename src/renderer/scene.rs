//! Draw list construction
//!
//! Turns a [`RenderState`] into back-to-front [`DrawCommand`]s in world units.
//! This is where missing sprites become solid fills, so the GPU side never
//! has to know about asset availability.

use crate::assets::{AssetAvailability, AssetKey};
use crate::settings::Settings;
use crate::sim::{ObstacleKind, RenderState, Rect};

use super::vertex::colors;

/// The player flickers in phases of this many frames while invincible
pub const BLINK_PHASE_FRAMES: u64 = 6;

const GROUND_EDGE_HEIGHT: f32 = 4.0;
const HITBOX_STROKE: f32 = 1.0;

/// One rectangle to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub rect: Rect,
    /// Sprite to stretch over `rect`; `None` draws `fill`
    pub sprite: Option<AssetKey>,
    /// Solid color, also used if the GPU has no texture for `sprite`
    pub fill: [f32; 4],
}

impl DrawCommand {
    pub fn solid(rect: Rect, fill: [f32; 4]) -> Self {
        Self {
            rect,
            sprite: None,
            fill,
        }
    }

    /// Sprite if it loaded, otherwise the fallback fill
    pub fn sprite_or_fill(assets: &AssetAvailability, key: AssetKey, rect: Rect, fill: [f32; 4]) -> Self {
        Self {
            rect,
            sprite: assets.is_available(key).then_some(key),
            fill,
        }
    }
}

pub fn obstacle_color(kind: ObstacleKind) -> [f32; 4] {
    match kind {
        ObstacleKind::Cone => colors::CONE,
        ObstacleKind::Crate => colors::CRATE,
        ObstacleKind::Barrier => colors::BARRIER,
    }
}

/// Whether the player is drawn this frame
pub fn player_visible(state: &RenderState, settings: &Settings) -> bool {
    if !state.player.invincible || settings.reduced_motion {
        return true;
    }
    (state.frame / BLINK_PHASE_FRAMES).is_multiple_of(2)
}

/// Build the full draw list for one frame
pub fn build(state: &RenderState, assets: &AssetAvailability, settings: &Settings) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(8 + state.obstacles.len() * 5 + state.landmarks.len());
    let (width, height) = (state.canvas_width, state.canvas_height);

    // Background
    match (assets.is_available(AssetKey::Background), state.background_width) {
        (true, Some(tile)) if tile > 0.0 => {
            let mut x = state.background_offset;
            while x < width {
                commands.push(DrawCommand::sprite_or_fill(
                    assets,
                    AssetKey::Background,
                    Rect::from_xywh(x, 0.0, tile, height),
                    colors::SKY,
                ));
                x += tile;
            }
        }
        (true, _) => commands.push(DrawCommand::sprite_or_fill(
            assets,
            AssetKey::Background,
            Rect::from_xywh(0.0, 0.0, width, height),
            colors::SKY,
        )),
        (false, _) => commands.push(DrawCommand::solid(
            Rect::from_xywh(0.0, 0.0, width, height),
            colors::SKY,
        )),
    }

    // Ground
    commands.push(DrawCommand::solid(
        Rect::from_xywh(0.0, state.ground_y, width, height - state.ground_y),
        colors::GROUND,
    ));
    commands.push(DrawCommand::solid(
        Rect::from_xywh(0.0, state.ground_y, width, GROUND_EDGE_HEIGHT),
        colors::GROUND_EDGE,
    ));

    for landmark in &state.landmarks {
        let fill = if landmark.is_final {
            colors::LANDMARK_FINAL
        } else {
            colors::LANDMARK
        };
        commands.push(DrawCommand::sprite_or_fill(
            assets,
            AssetKey::Landmark(landmark.index),
            landmark.rect,
            fill,
        ));
    }

    for obstacle in &state.obstacles {
        commands.push(DrawCommand::sprite_or_fill(
            assets,
            AssetKey::Obstacle(obstacle.kind),
            obstacle.rect,
            obstacle_color(obstacle.kind),
        ));
    }

    if player_visible(state, settings) {
        commands.push(DrawCommand::sprite_or_fill(
            assets,
            AssetKey::Player,
            state.player.rect,
            colors::PLAYER,
        ));
    }

    if settings.show_hitboxes {
        outline(&mut commands, &state.player.rect);
        for obstacle in &state.obstacles {
            outline(&mut commands, &obstacle.rect);
        }
    }

    commands
}

/// Four thin strips along the edges of `rect`
fn outline(commands: &mut Vec<DrawCommand>, rect: &Rect) {
    let s = HITBOX_STROKE;
    let (x, y, w, h) = (rect.left(), rect.top(), rect.size.x, rect.size.y);
    for edge in [
        Rect::from_xywh(x, y, w, s),
        Rect::from_xywh(x, y + h - s, w, s),
        Rect::from_xywh(x, y, s, h),
        Rect::from_xywh(x + w - s, y, s, h),
    ] {
        commands.push(DrawCommand::solid(edge, colors::HITBOX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{Obstacle, Session};
    use glam::Vec2;

    fn scene_state() -> (GameConfig, RenderState) {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 8).with_background_width(Some(300.0));
        session.world.background_offset = -100.0;
        session.landmarks[0].world_x = 400.0;
        session.obstacles.push(Obstacle {
            id: 1,
            kind: ObstacleKind::Cone,
            pos: Vec2::new(500.0, config.ground_line(30.0)),
            size: Vec2::new(24.0, 30.0),
        });
        let state = RenderState::capture(&session, &config, Vec::new());
        (config, state)
    }

    fn all_available(config: &GameConfig) -> AssetAvailability {
        let manifest = config.asset_manifest();
        let mut assets = AssetAvailability::none(&manifest);
        for (key, _) in manifest.iter() {
            assets.mark_available(key, Some((600, 800)));
        }
        assets
    }

    #[test]
    fn test_missing_assets_fall_back_to_solid() {
        let (config, state) = scene_state();
        let assets = AssetAvailability::none(&config.asset_manifest());
        let commands = build(&state, &assets, &Settings::default());

        assert!(commands.iter().all(|c| c.sprite.is_none()));
        // sky, ground, edge, landmark, obstacle, player
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[0].fill, colors::SKY);
        assert_eq!(commands[5].fill, colors::PLAYER);
    }

    #[test]
    fn test_draw_order_with_sprites() {
        let (config, state) = scene_state();
        let commands = build(&state, &all_available(&config), &Settings::default());

        let sprites: Vec<Option<AssetKey>> = commands.iter().map(|c| c.sprite).collect();
        // Tiles at -100, 200, 500 cover the 800 wide canvas
        assert_eq!(
            sprites,
            vec![
                Some(AssetKey::Background),
                Some(AssetKey::Background),
                Some(AssetKey::Background),
                None,
                None,
                Some(AssetKey::Landmark(0)),
                Some(AssetKey::Obstacle(ObstacleKind::Cone)),
                Some(AssetKey::Player),
            ]
        );
        assert_eq!(commands[0].rect.left(), -100.0);
        assert_eq!(commands[2].rect.left(), 500.0);
    }

    #[test]
    fn test_partial_availability() {
        let (config, state) = scene_state();
        let mut assets = all_available(&config);
        assets.mark_missing(AssetKey::Obstacle(ObstacleKind::Cone));
        let commands = build(&state, &assets, &Settings::default());

        let cone = commands
            .iter()
            .find(|c| c.fill == colors::CONE)
            .expect("cone drawn");
        assert_eq!(cone.sprite, None);
        assert!(commands.iter().any(|c| c.sprite == Some(AssetKey::Player)));
    }

    #[test]
    fn test_player_blinks_while_invincible() {
        let (_, mut state) = scene_state();
        let settings = Settings::default();
        state.player.invincible = true;

        state.frame = 0;
        assert!(player_visible(&state, &settings));
        state.frame = BLINK_PHASE_FRAMES;
        assert!(!player_visible(&state, &settings));
        state.frame = BLINK_PHASE_FRAMES * 2 + 1;
        assert!(player_visible(&state, &settings));

        let reduced = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        state.frame = BLINK_PHASE_FRAMES;
        assert!(player_visible(&state, &reduced));
    }

    #[test]
    fn test_hitboxes_outline_player_and_obstacles() {
        let (config, state) = scene_state();
        let assets = AssetAvailability::none(&config.asset_manifest());
        let settings = Settings {
            show_hitboxes: true,
            ..Settings::default()
        };
        let commands = build(&state, &assets, &settings);
        let outlines = commands.iter().filter(|c| c.fill == colors::HITBOX).count();
        assert_eq!(outlines, 8);
    }
}
