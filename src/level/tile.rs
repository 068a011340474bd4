//! Tiles and their properties
//!
//! Levels are authored as rows of characters, one per 16×16 tile. The
//! object layer then decorates individual tiles with extra properties
//! (what a question block holds, where a pipe leads).

use serde::{Serialize, Deserialize};

/// Visual/physical type of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Ground,
    /// Hard block (stairs)
    Block,
    /// Breakable brick
    Brick,
    Question,
    /// Question block that has been emptied
    Used,
    /// Invisible block, only solid from below until struck
    Hidden,
    PipeTopLeft,
    PipeTopRight,
    PipeLeft,
    PipeRight,
    /// Mouth of a sideways pipe (upper and lower half)
    PipeSideTop,
    PipeSideBottom,
    Pole,
    /// End point of the stage
    FlagTop,
    Bush,
    Hill,
}

impl TileKind {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            ' ' | '.' => TileKind::Empty,
            '#' => TileKind::Ground,
            'X' => TileKind::Block,
            'B' => TileKind::Brick,
            '?' => TileKind::Question,
            'U' => TileKind::Used,
            'h' => TileKind::Hidden,
            '[' => TileKind::PipeTopLeft,
            ']' => TileKind::PipeTopRight,
            '(' => TileKind::PipeLeft,
            ')' => TileKind::PipeRight,
            'S' => TileKind::PipeSideTop,
            's' => TileKind::PipeSideBottom,
            '|' => TileKind::Pole,
            'F' => TileKind::FlagTop,
            'b' => TileKind::Bush,
            'm' => TileKind::Hill,
            _ => return None,
        })
    }

    pub fn is_solid(self) -> bool {
        !matches!(
            self,
            TileKind::Empty | TileKind::Pole | TileKind::FlagTop | TileKind::Bush | TileKind::Hill
        )
    }

    /// Whether the renderer should draw anything for this tile.
    pub fn is_visible(self) -> bool {
        !matches!(self, TileKind::Empty | TileKind::Hidden)
    }

    fn default_callback(self) -> Option<TileCallback> {
        match self {
            TileKind::Question => Some(TileCallback::QuestionMark),
            TileKind::Brick => Some(TileCallback::Breakable),
            _ => None,
        }
    }
}

/// What happens when the player strikes the tile from below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileCallback {
    QuestionMark,
    Breakable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step along the axis, in screen coordinates (y grows downward).
    pub fn unit(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Which faces of a tile stop bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFaces {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl TileFaces {
    pub const ALL: TileFaces = TileFaces { top: true, bottom: true, left: true, right: true };
    pub const NONE: TileFaces = TileFaces { top: false, bottom: false, left: false, right: false };
    pub const BOTTOM_ONLY: TileFaces =
        TileFaces { top: false, bottom: true, left: false, right: false };
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileProps {
    pub collide: bool,
    pub faces: TileFaces,
    pub callback: Option<TileCallback>,
    /// Name of the power-up hidden in the block
    pub power_up: Option<String>,
    /// Remaining hits for multi-coin blocks
    pub hit_number: Option<u32>,
    /// Pipe destination name
    pub dest: Option<String>,
    /// Key the player must hold to enter the pipe
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    pub props: TileProps,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        let faces = match kind {
            TileKind::Hidden => TileFaces::BOTTOM_ONLY,
            k if k.is_solid() => TileFaces::ALL,
            _ => TileFaces::NONE,
        };
        Self {
            kind,
            props: TileProps {
                collide: kind.is_solid(),
                faces,
                callback: kind.default_callback(),
                power_up: None,
                hit_number: None,
                dest: None,
                direction: None,
            },
        }
    }

    pub fn empty() -> Self {
        Self::new(TileKind::Empty)
    }

    pub fn collides_top(&self) -> bool { self.props.collide && self.props.faces.top }
    pub fn collides_bottom(&self) -> bool { self.props.collide && self.props.faces.bottom }
    pub fn collides_left(&self) -> bool { self.props.collide && self.props.faces.left }
    pub fn collides_right(&self) -> bool { self.props.collide && self.props.faces.right }

    /// Turn this tile into an emptied block that is solid on every side.
    pub fn make_used(&mut self) {
        self.kind = TileKind::Used;
        self.props.collide = true;
        self.props.faces = TileFaces::ALL;
        self.props.callback = None;
        self.props.power_up = None;
        self.props.hit_number = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_char_maps_to_its_own_kind() {
        let kinds: Vec<TileKind> =
            ".#XB?Uh[]()Ss|Fbm".chars().map(|c| TileKind::from_char(c).unwrap()).collect();
        for (i, kind) in kinds.iter().enumerate().skip(1) {
            assert!(!kinds[..i].contains(kind), "{:?} mapped twice", kind);
        }
        assert_eq!(TileKind::from_char(' '), Some(TileKind::Empty));
        assert_eq!(TileKind::from_char('~'), None);
    }

    #[test]
    fn test_default_props() {
        let brick = Tile::new(TileKind::Brick);
        assert!(brick.collides_top() && brick.collides_bottom());
        assert_eq!(brick.props.callback, Some(TileCallback::Breakable));

        let hidden = Tile::new(TileKind::Hidden);
        assert!(hidden.collides_bottom());
        assert!(!hidden.collides_top());
        assert!(!hidden.collides_left());

        let pole = Tile::new(TileKind::Pole);
        assert!(!pole.props.collide);
    }

    #[test]
    fn test_make_used_clears_contents() {
        let mut tile = Tile::new(TileKind::Hidden);
        tile.props.power_up = Some("1up".into());
        tile.make_used();
        assert_eq!(tile.kind, TileKind::Used);
        assert!(tile.collides_top());
        assert!(tile.props.power_up.is_none());
        assert!(tile.props.callback.is_none());
    }
}
