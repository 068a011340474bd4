//! Input state management
//!
//! Polls keyboard (macroquad) and gamepad, merges them into one held
//! `ActionSet`, and edge-detects against the previous frame so both
//! devices get "just pressed" for free.

use macroquad::prelude::*;
use super::{Action, ActionSet, Gamepad};

/// What the simulation sees of the input devices for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    held: ActionSet,
    pressed: ActionSet,
}

impl Controls {
    /// Snapshot from this frame's held actions and last frame's snapshot.
    pub fn next(prev: &Controls, held: ActionSet) -> Self {
        let pressed = Action::ALL
            .into_iter()
            .filter(|&a| held.contains(a) && !prev.held.contains(a))
            .collect();
        Self { held, pressed }
    }

    /// Controls with the given actions held and freshly pressed.
    pub fn holding(actions: &[Action]) -> Self {
        let held: ActionSet = actions.iter().copied().collect();
        Self { held, pressed: held }
    }

    pub fn held(&self) -> ActionSet {
        self.held
    }

    pub fn down(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.pressed.contains(action)
    }

    pub fn left(&self) -> bool { self.down(Action::Left) }
    pub fn right(&self) -> bool { self.down(Action::Right) }
    pub fn up(&self) -> bool { self.down(Action::Up) }
}

/// Unified input state that handles both keyboard and gamepad
pub struct InputState {
    gamepad: Gamepad,
    last: Controls,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
            last: Controls::default(),
        }
    }

    /// Call once per frame.
    pub fn poll(&mut self) -> Controls {
        self.gamepad.poll();
        let held = self.keyboard_held().union(self.gamepad.held());
        self.last = Controls::next(&self.last, held);
        self.last
    }

    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }

    fn keyboard_held(&self) -> ActionSet {
        let any = |keys: &[KeyCode]| keys.iter().any(|&k| is_key_down(k));
        let mut set = ActionSet::EMPTY;
        set.set(Action::Left, any(&[KeyCode::Left, KeyCode::A]));
        set.set(Action::Right, any(&[KeyCode::Right, KeyCode::D]));
        set.set(Action::Up, any(&[KeyCode::Up, KeyCode::W]));
        set.set(Action::Down, any(&[KeyCode::Down, KeyCode::S]));
        set.set(Action::Jump, any(&[KeyCode::Up, KeyCode::W]));
        set.set(Action::Fire, any(&[KeyCode::Space]));
        set.set(Action::Confirm, any(&[KeyCode::Enter, KeyCode::KpEnter]));
        set.set(Action::ToggleDebug, any(&[KeyCode::F1]));
        set
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_only_on_first_frame() {
        let first = Controls::next(&Controls::default(), [Action::Jump].into_iter().collect());
        assert!(first.down(Action::Jump));
        assert!(first.pressed(Action::Jump));

        let second = Controls::next(&first, [Action::Jump].into_iter().collect());
        assert!(second.down(Action::Jump));
        assert!(!second.pressed(Action::Jump));
    }

    #[test]
    fn test_release_and_repress() {
        let held: ActionSet = [Action::Fire].into_iter().collect();
        let a = Controls::next(&Controls::default(), held);
        let b = Controls::next(&a, ActionSet::EMPTY);
        let c = Controls::next(&b, held);
        assert!(!b.down(Action::Fire));
        assert!(c.pressed(Action::Fire));
    }

    #[test]
    fn test_merged_sources() {
        let kb: ActionSet = [Action::Left].into_iter().collect();
        let pad: ActionSet = [Action::Jump].into_iter().collect();
        let controls = Controls::next(&Controls::default(), kb.union(pad));
        assert!(controls.left() && controls.down(Action::Jump));
        assert!(!controls.right());
    }
}
