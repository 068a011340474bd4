//! The bump of a struck block
//!
//! One `Brick` is reused for every strike. While it plays, the struck tile
//! is drawn raised and anything standing on it gets hit from below.

use macroquad::prelude::Rect;
use crate::game::tween::{Ease, Tween};
use crate::game::{Body, Entity};
use crate::level::TileMap;

const BUMP_HEIGHT: f32 = 4.0;
const BUMP_TIME: f32 = 0.1;
/// Reach above the raised tile, so bodies resting on it count
const REACH: f32 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct Brick {
    cell: Option<(i32, i32)>,
    tween: Option<Tween>,
    /// Entities already hit by the current bump
    struck: Vec<Entity>,
}

impl Brick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&mut self, col: i32, row: i32) {
        self.cell = Some((col, row));
        self.tween = Some(Tween::new(0.0, BUMP_HEIGHT, BUMP_TIME, Ease::QuadOut).yoyo());
        self.struck.clear();
    }

    pub fn is_active(&self) -> bool {
        self.tween.is_some()
    }

    /// Cell being bumped, if any.
    pub fn cell(&self) -> Option<(i32, i32)> {
        self.cell.filter(|_| self.is_active())
    }

    /// How far the tile is currently raised, in pixels.
    pub fn offset(&self) -> f32 {
        self.tween.map_or(0.0, |t| t.value())
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(tween) = self.tween.as_mut() {
            tween.update(dt);
            if tween.is_done() {
                self.tween = None;
                self.cell = None;
            }
        }
    }

    /// Area that hits things from below.
    pub fn rect(&self) -> Option<Rect> {
        let (col, row) = self.cell()?;
        let tile = TileMap::tile_rect(col, row);
        let lift = self.offset() + REACH;
        Some(Rect::new(tile.x, tile.y - lift, tile.w, lift))
    }

    /// Whether the bump hits `entity` now. Each entity is hit at most once
    /// per bump.
    pub fn strikes(&mut self, entity: Entity, body: &Body) -> bool {
        let Some(area) = self.rect() else {
            return false;
        };
        if !body.enabled || self.struck.contains(&entity) || !area.overlaps(&body.rect()) {
            return false;
        }
        self.struck.push(entity);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_rises_and_settles() {
        let mut brick = Brick::new();
        brick.bump(3, 5);
        assert_eq!(brick.cell(), Some((3, 5)));

        brick.update(0.1);
        assert!((brick.offset() - BUMP_HEIGHT).abs() < 0.01);

        brick.update(0.11);
        assert!(!brick.is_active());
        assert_eq!(brick.offset(), 0.0);
        assert_eq!(brick.cell(), None);
    }

    #[test]
    fn test_strikes_body_standing_on_tile_once() {
        let mut brick = Brick::new();
        brick.bump(3, 5);
        // standing on top of the tile at row 5 (y = 80)
        let enemy = Body::standing(56.0, 80.0, 16.0, 16.0);
        let far = Body::standing(120.0, 80.0, 16.0, 16.0);
        let e = Entity::new(1, 0);

        assert!(brick.strikes(e, &enemy));
        assert!(!brick.strikes(e, &enemy));
        assert!(!brick.strikes(Entity::new(2, 0), &far));
    }

    #[test]
    fn test_inactive_brick_strikes_nothing() {
        let mut brick = Brick::new();
        let body = Body::standing(56.0, 80.0, 16.0, 16.0);
        assert!(!brick.strikes(Entity::new(1, 0), &body));
    }
}
