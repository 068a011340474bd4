//! End of stage flag pole

use macroquad::prelude::Rect;
use crate::game::{Body, Events, Sfx};
use crate::level::{TileKind, TileMap, TILE_SIZE};

/// Width of the grabbable part of the pole
const POLE_WIDTH: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    /// Pole area, from the flag top down to the last pole tile
    pub rect: Rect,
    reached: bool,
}

impl Flag {
    /// The flag stands at the level's flag-top tile.
    pub fn from_map(map: &TileMap) -> Option<Self> {
        let (col, row) = map.find_by_kind(TileKind::FlagTop)?;
        let mut bottom = row;
        while map.get(col, bottom + 1).is_some_and(|t| t.kind == TileKind::Pole) {
            bottom += 1;
        }
        let top = TileMap::tile_rect(col, row);
        let height = (bottom - row + 1) as f32 * TILE_SIZE;
        Some(Self {
            rect: Rect::new(top.center().x - POLE_WIDTH / 2.0, top.y, POLE_WIDTH, height),
            reached: false,
        })
    }

    pub fn reached(&self) -> bool {
        self.reached
    }

    /// Returns true the first time the player touches the pole.
    pub fn overlap(&mut self, player: &Body, events: &mut Events) -> bool {
        if self.reached || !self.rect.overlaps(&player.rect()) {
            return false;
        }
        self.reached = true;
        events.sounds.send(crate::game::SoundEvent::StopAll);
        events.play(Sfx::StageClear);
        log::info!("Stage clear");
        true
    }
}
