//! Tile grid

use macroquad::prelude::Rect;
use super::tile::{Tile, TileKind};

pub const TILE_SIZE: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Build a map from character rows. Rows must all be the same length.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, String> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut tiles = Vec::with_capacity(width * height);

        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(format!(
                    "row {} is {} tiles wide, expected {}",
                    row_idx, row.chars().count(), width
                ));
            }
            for (col_idx, c) in row.chars().enumerate() {
                let kind = TileKind::from_char(c)
                    .ok_or_else(|| format!("unknown tile '{}' at ({}, {})", c, col_idx, row_idx))?;
                tiles.push(Tile::new(kind));
            }
        }

        Ok(Self { width, height, tiles })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<&Tile> {
        self.index(col, row).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut Tile> {
        self.index(col, row).map(move |i| &mut self.tiles[i])
    }

    /// Tile cell containing a world-space point.
    pub fn world_to_tile(x: f32, y: f32) -> (i32, i32) {
        ((x / TILE_SIZE).floor() as i32, (y / TILE_SIZE).floor() as i32)
    }

    pub fn tile_rect(col: i32, row: i32) -> Rect {
        Rect::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE)
    }

    /// First cell (row-major) holding a tile of this kind.
    pub fn find_by_kind(&self, kind: TileKind) -> Option<(i32, i32)> {
        self.tiles
            .iter()
            .position(|t| t.kind == kind)
            .map(|i| ((i % self.width) as i32, (i / self.width) as i32))
    }

    /// Clear a cell (broken bricks).
    pub fn remove(&mut self, col: i32, row: i32) {
        if let Some(tile) = self.get_mut(col, row) {
            *tile = Tile::empty();
        }
    }

    /// Iterate visible cells in a pixel rectangle, for drawing.
    pub fn cells_in(&self, area: Rect) -> impl Iterator<Item = (i32, i32, &Tile)> + '_ {
        let (c0, r0) = Self::world_to_tile(area.x, area.y);
        let (c1, r1) = Self::world_to_tile(area.x + area.w, area.y + area.h);
        (r0.max(0)..=r1).flat_map(move |row| {
            (c0.max(0)..=c1).filter_map(move |col| self.get(col, row).map(|t| (col, row, t)))
        })
    }
}
