//! Level data
//!
//! Levels are RON files: character rows for the tile layer, an enemy
//! spawn list, and an object layer of modifiers that decorate tiles and
//! describe rooms and pipe destinations.
//!
//! Modifier coordinates follow the object-layer convention the levels were
//! laid out with: an object's `y` is its bottom edge, so a power-up marker
//! placed on top of a block refers to the tile one row above `y / 16`.

mod tile;
mod map;
mod animated;

pub use tile::*;
pub use map::{TileMap, TILE_SIZE};
pub use animated::AnimatedTiles;

use std::collections::HashMap;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::enemies::EnemyKind;

/// Bundled fallback level, used when the level file can't be read.
const BUILTIN_LEVEL: &str = include_str!("../../assets/levels/world-1-1.ron");

/// Room every level starts in
pub const START_ROOM: &str = "room1";

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Enemy placement from the enemies layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
}

/// Object-layer entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    PowerUp { name: String, x: f32, y: f32 },
    Pipe { name: String, x: f32, y: f32, direction: Direction },
    Dest { name: String, x: f32, y: f32, #[serde(default)] direction: Option<Direction> },
    Room { name: String, x: f32, y: f32, width: f32, height: f32 },
}

/// On-disk level layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    pub rows: Vec<String>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

/// Where a pipe leads.
#[derive(Debug, Clone, PartialEq)]
pub struct Dest {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Direction the player slides out of the exit pipe, if any
    pub direction: Option<Direction>,
}

/// Camera/physics bounds region.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Room {
    pub fn rect(&self) -> macroquad::prelude::Rect {
        macroquad::prelude::Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A parsed level ready to play.
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub map: TileMap,
    pub enemies: Vec<EnemySpawn>,
    pub dests: HashMap<String, Dest>,
    pub rooms: HashMap<String, Room>,
}

impl Level {
    pub fn from_file(file: LevelFile) -> Result<Self, LevelError> {
        let map = TileMap::from_rows(&file.rows).map_err(LevelError::Validation)?;
        let mut level = Level {
            name: file.name,
            map,
            enemies: file.enemies,
            dests: HashMap::new(),
            rooms: HashMap::new(),
        };
        for modifier in &file.modifiers {
            level.apply_modifier(modifier)?;
        }
        level.validate()?;
        Ok(level)
    }

    fn apply_modifier(&mut self, modifier: &Modifier) -> Result<(), LevelError> {
        match modifier {
            Modifier::PowerUp { name, x, y } => {
                let (col, row) = ((x / TILE_SIZE) as i32, (y / TILE_SIZE) as i32 - 1);
                let tile = self.map.get_mut(col, row).ok_or_else(|| {
                    LevelError::Validation(format!(
                        "power-up '{}' outside the map at ({}, {})",
                        name, col, row
                    ))
                })?;
                tile.props.power_up = Some(name.clone());
                match name.as_str() {
                    "1up" => {
                        tile.props.callback = Some(TileCallback::QuestionMark);
                        tile.props.collide = true;
                        tile.props.faces = TileFaces::BOTTOM_ONLY;
                    }
                    "coin" => tile.props.hit_number = Some(4),
                    _ => {}
                }
            }
            Modifier::Pipe { name, x, y, direction } => {
                let (col, row) = ((x / TILE_SIZE) as i32, (y / TILE_SIZE) as i32);
                let tile = self.map.get_mut(col, row).ok_or_else(|| {
                    LevelError::Validation(format!(
                        "pipe '{}' outside the map at ({}, {})",
                        name, col, row
                    ))
                })?;
                tile.props.dest = Some(name.clone());
                tile.props.direction = Some(*direction);
            }
            Modifier::Dest { name, x, y, direction } => {
                self.dests.insert(name.clone(), Dest {
                    name: name.clone(),
                    x: *x,
                    y: *y,
                    direction: *direction,
                });
            }
            Modifier::Room { name, x, y, width, height } => {
                self.rooms.insert(name.clone(), Room {
                    name: name.clone(),
                    x: *x,
                    y: *y,
                    width: *width,
                    height: *height,
                });
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), LevelError> {
        if !self.rooms.contains_key(START_ROOM) {
            return Err(LevelError::Validation(format!("missing room '{}'", START_ROOM)));
        }
        let (map_w, map_h) = (self.map.pixel_width(), self.map.pixel_height());
        for room in self.rooms.values() {
            if room.x + room.width > map_w || room.y + room.height > map_h {
                log::warn!("Room '{}' reaches past the {}x{} map", room.name, map_w, map_h);
            }
        }
        for row in 0..self.map.height() as i32 {
            for col in 0..self.map.width() as i32 {
                let Some(dest) = self.map.get(col, row).and_then(|t| t.props.dest.as_ref()) else {
                    continue;
                };
                if !self.dests.contains_key(dest) {
                    return Err(LevelError::Validation(format!(
                        "pipe at ({}, {}) leads to unknown dest '{}'", col, row, dest
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rooms sorted left to right.
    pub fn rooms_by_x(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.x.total_cmp(&b.x));
        rooms
    }

    pub fn start_room(&self) -> &Room {
        // validate() guarantees the start room exists
        &self.rooms[START_ROOM]
    }
}

/// Parse a level from RON text.
pub fn parse_level(text: &str) -> Result<Level, LevelError> {
    let file: LevelFile = ron::from_str(text)?;
    Level::from_file(file)
}

/// Load and validate a level file.
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Level, LevelError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let level = parse_level(&text)?;
    log::info!("Loaded level '{}' from {}", level.name, path.as_ref().display());
    Ok(level)
}

/// The level shipped inside the binary.
pub fn builtin_level() -> Result<Level, LevelError> {
    parse_level(BUILTIN_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINI: &str = r###########"(
        name: "mini",
        rows: [
            "..........",
            "...?..h...",
            "..........",
            "......[]..",
            "##########",
        ],
        enemies: [(kind: Goomba, x: 120.0, y: 64.0)],
        modifiers: [
            PowerUp(name: "coin", x: 48.0, y: 32.0),
            PowerUp(name: "1up", x: 96.0, y: 32.0),
            Pipe(name: "under", x: 96.0, y: 48.0, direction: down),
            Dest(name: "under", x: 16.0, y: 16.0),
            Room(name: "room1", x: 0.0, y: 0.0, width: 160.0, height: 80.0),
        ],
    )"###########;

    #[test]
    fn test_parse_applies_modifiers() {
        let level = parse_level(MINI).unwrap();

        let coin_block = level.map.get(3, 1).unwrap();
        assert_eq!(coin_block.props.power_up.as_deref(), Some("coin"));
        assert_eq!(coin_block.props.hit_number, Some(4));

        let hidden = level.map.get(6, 1).unwrap();
        assert_eq!(hidden.props.callback, Some(TileCallback::QuestionMark));
        assert_eq!(hidden.props.faces, TileFaces::BOTTOM_ONLY);

        let pipe = level.map.get(6, 3).unwrap();
        assert_eq!(pipe.props.dest.as_deref(), Some("under"));
        assert_eq!(pipe.props.direction, Some(Direction::Down));

        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.start_room().width, 160.0);
        assert!(level.dests["under"].direction.is_none());
    }

    #[test]
    fn test_missing_start_room_rejected() {
        let text = MINI.replace("room1", "lobby");
        assert!(matches!(parse_level(&text), Err(LevelError::Validation(_))));
    }

    #[test]
    fn test_pipe_to_unknown_dest_rejected() {
        let text = MINI.replace("Dest(name: \"under\"", "Dest(name: \"elsewhere\"");
        let err = parse_level(&text).unwrap_err();
        assert!(err.to_string().contains("unknown dest"));
    }

    #[test]
    fn test_rooms_sorted_by_x() {
        let text = MINI.replace(
            "Room(name: \"room1\"",
            concat!(
                "Room(name: \"room2\", x: 400.0, y: 0.0, width: 100.0, height: 80.0),\n",
                "Room(name: \"room1\"",
            ),
        );
        let level = parse_level(&text).unwrap();
        let names: Vec<_> = level.rooms_by_x().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["room1", "room2"]);
    }

    #[test]
    fn test_load_level_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINI.as_bytes()).unwrap();
        let level = load_level(file.path()).unwrap();
        assert_eq!(level.name, "mini");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(load_level("/nonexistent/level.ron"), Err(LevelError::Io(_))));
    }

    #[test]
    fn test_builtin_level_is_valid() {
        let level = builtin_level().unwrap();
        assert!(level.map.find_by_kind(TileKind::FlagTop).is_some());
        assert!(level.rooms.len() >= 2);
        assert!(!level.enemies.is_empty());
        assert_eq!(level.dests["exit"].direction, Some(Direction::Up));
    }
}
