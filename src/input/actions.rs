//! Game action definitions

/// Everything the player can ask for, independent of the device.
///
/// Keyboard:
/// - Arrows or WASD = move (Up/W also jumps, Down/S crouches and enters pipes)
/// - Space = fire
/// - Enter = confirm, F1 = debug overlay
///
/// Gamepad (Xbox/PlayStation):
/// - D-pad / left stick = move
/// - A/X = jump, X/Square or B/O = fire, Start = confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Fire,
    Confirm,
    ToggleDebug,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Fire,
        Action::Confirm,
        Action::ToggleDebug,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of held actions for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn set(&mut self, action: Action, down: bool) {
        if down {
            self.insert(action);
        }
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn union(self, other: ActionSet) -> ActionSet {
        ActionSet(self.0 | other.0)
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}
