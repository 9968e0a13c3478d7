//! Scrolling viewport projection centered on the player.

use rlkit_core::{Glyph, Point};

use crate::colors::BLACK;
use crate::game::Game;
use crate::terrain::{SHROUD, tile_kind};

/// Render-ready projection of the world around the player.
///
/// `cells` is a row-major grid of the viewport interior; `entities` are the
/// visible entities in draw order, with viewport-relative positions.
pub struct Projection {
    /// World position of the viewport's top-left interior cell.
    pub origin: Point,
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Glyph>,
    pub entities: Vec<(Point, Glyph)>,
}

/// Compute the clamped viewport origin for a frame of the given outer size.
///
/// Two cells of each frame dimension are reserved for the border. The player
/// is centered, then the origin is clamped so the viewport never extends
/// outside the map.
pub fn viewport_origin(
    player: Point,
    frame_width: i32,
    frame_height: i32,
    map_width: i32,
    map_height: i32,
) -> Point {
    let vw = frame_width - 2;
    let vh = frame_height - 2;
    Point::new(
        (player.x - vw / 2).clamp(0, (map_width - vw).max(0)),
        (player.y - vh / 2).clamp(0, (map_height - vh).max(0)),
    )
}

/// Project the session state into a frame of the given outer size.
pub fn project(game: &Game, frame_width: i32, frame_height: i32) -> Projection {
    let map = &game.map;
    let origin = viewport_origin(
        game.player_pos(),
        frame_width,
        frame_height,
        map.width,
        map.height,
    );
    let width = (frame_width - 2).min(map.width);
    let height = (frame_height - 2).min(map.height);

    let mut cells = Vec::with_capacity((width * height).max(0) as usize);
    for sy in 0..height {
        for sx in 0..width {
            let p = origin.shift(sx, sy);
            let glyph = if map.is_visible(p) {
                tile_kind(map.tile(p)).lit
            } else if map.is_explored(p) {
                tile_kind(map.tile(p)).dark
            } else {
                SHROUD
            };
            cells.push(glyph);
        }
    }

    // Visible entities only, lowest render order drawn first.
    let mut visible: Vec<&crate::entity::Entity> = game
        .entities()
        .filter(|e| {
            map.is_visible(e.pos)
                && e.pos.x >= origin.x
                && e.pos.x < origin.x + width
                && e.pos.y >= origin.y
                && e.pos.y < origin.y + height
        })
        .collect();
    visible.sort_by_key(|e| e.render_order);
    let entities = visible
        .into_iter()
        .map(|e| (e.pos - origin, Glyph::new(e.ch, e.color, BLACK)))
        .collect();

    Projection {
        origin,
        width,
        height,
        cells,
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use crate::gamemap::GameWorld;

    #[test]
    fn origin_clamps_to_map_edges() {
        // 60-wide frame leaves a 58-wide interior on an 80-wide map.
        let o = viewport_origin(Point::new(0, 10), 60, 40, 80, 43);
        assert_eq!(o.x, 0);
        let o = viewport_origin(Point::new(79, 10), 60, 40, 80, 43);
        assert_eq!(o.x, 22);
        // Centered when far from both edges.
        let o = viewport_origin(Point::new(40, 21), 60, 40, 80, 43);
        assert_eq!(o.x, 40 - 29);
    }

    #[test]
    fn origin_never_negative_on_small_maps() {
        let o = viewport_origin(Point::new(2, 2), 60, 40, 20, 10);
        assert_eq!(o, Point::ZERO);
    }

    #[test]
    fn projection_contains_the_player() {
        let game = Game::new(GameWorld::default(), 11).unwrap();
        let proj = project(&game, 60, 40);
        assert_eq!(proj.width, 58);
        assert_eq!(proj.height, 38);
        assert_eq!(proj.cells.len(), 58 * 38);
        // The player is visible and therefore projected.
        let player_glyphs: Vec<_> = proj
            .entities
            .iter()
            .filter(|(_, g)| g.ch == '@')
            .collect();
        assert_eq!(player_glyphs.len(), 1);
        let (screen, _) = player_glyphs[0];
        assert_eq!(*screen + proj.origin, game.player_pos());
    }

    #[test]
    fn shrouded_cells_use_the_shroud_glyph() {
        let game = Game::new(GameWorld::default(), 11).unwrap();
        let proj = project(&game, 60, 40);
        for sy in 0..proj.height {
            for sx in 0..proj.width {
                let p = proj.origin.shift(sx, sy);
                let glyph = proj.cells[(sy * proj.width + sx) as usize];
                if !game.map.is_explored(p) {
                    assert_eq!(glyph, SHROUD);
                }
            }
        }
    }
}
