//! Gamepad support
//!
//! Native: gilrs, first connected pad only. Face buttons and the d-pad
//! map straight onto actions; the left stick counts as a d-pad once it
//! is pushed past half way.
//! WASM: no gamepad backend; nothing is ever held.

use macroquad::prelude::Vec2;
use super::{Action, ActionSet};

/// Stick deflection that counts as a d-pad press
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
const STICK_THRESHOLD: f32 = 0.5;
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
const DEADZONE: f32 = 0.15;

/// Direction actions for a (deadzoned) stick, y down.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub(crate) fn stick_actions(stick: Vec2) -> ActionSet {
    let mut set = ActionSet::EMPTY;
    set.set(Action::Left, stick.x < -STICK_THRESHOLD);
    set.set(Action::Right, stick.x > STICK_THRESHOLD);
    set.set(Action::Up, stick.y < -STICK_THRESHOLD);
    set.set(Action::Down, stick.y > STICK_THRESHOLD);
    set
}

/// Radial deadzone; what is left is rescaled back to 0..1.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub(crate) fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let len = (x * x + y * y).sqrt();
    if len < deadzone {
        return Vec2::ZERO;
    }
    let scale = (len - deadzone) / (1.0 - deadzone) / len;
    Vec2::new(x * scale, y * scale)
}

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;

    #[derive(Default)]
    pub struct Gamepad;

    impl Gamepad {
        pub fn new() -> Self {
            Self
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn held(&self) -> ActionSet {
            ActionSet::EMPTY
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use gilrs::{Axis, Button, Gilrs};

    /// South is A on Xbox pads and Cross on PlayStation ones.
    const BINDINGS: [(Button, Action); 9] = [
        (Button::DPadLeft, Action::Left),
        (Button::DPadRight, Action::Right),
        (Button::DPadUp, Action::Up),
        (Button::DPadDown, Action::Down),
        (Button::South, Action::Jump),
        (Button::West, Action::Fire),
        (Button::East, Action::Fire),
        (Button::Start, Action::Confirm),
        (Button::Select, Action::ToggleDebug),
    ];

    pub struct Gamepad {
        /// None when the platform backend failed to start
        gilrs: Option<Gilrs>,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(e) => {
                    log::warn!("Gamepad support unavailable: {}", e);
                    None
                }
            };
            Self { gilrs }
        }

        /// Drain gilrs events so pad state is current.
        pub fn poll(&mut self) {
            let Some(gilrs) = self.gilrs.as_mut() else { return };
            while let Some(event) = gilrs.next_event() {
                match event.event {
                    gilrs::EventType::Connected => {
                        log::info!("Gamepad connected: {}", gilrs.gamepad(event.id).name());
                    }
                    gilrs::EventType::Disconnected => log::info!("Gamepad disconnected"),
                    _ => {}
                }
            }
        }

        fn pad(&self) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().next().map(|(_, pad)| pad)
        }

        pub fn has_gamepad(&self) -> bool {
            self.pad().is_some()
        }

        pub fn held(&self) -> ActionSet {
            let Some(pad) = self.pad() else { return ActionSet::EMPTY };
            let buttons: ActionSet = BINDINGS
                .iter()
                .filter(|(button, _)| pad.is_pressed(*button))
                .map(|&(_, action)| action)
                .collect();
            // gilrs reports stick up as positive
            let (x, y) = (pad.value(Axis::LeftStickX), -pad.value(Axis::LeftStickY));
            let stick = apply_deadzone(x, y, DEADZONE);
            buttons.union(stick_actions(stick))
        }
    }
}

pub use platform::Gamepad;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_zeroes_small_input() {
        assert_eq!(apply_deadzone(0.1, 0.05, DEADZONE), Vec2::ZERO);
    }

    #[test]
    fn test_deadzone_rescales_full_tilt() {
        let v = apply_deadzone(1.0, 0.0, DEADZONE);
        assert!((v.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_half_tilt_is_not_a_press() {
        let set = stick_actions(Vec2::new(0.4, -0.4));
        assert_eq!(set, ActionSet::EMPTY);
    }

    #[test]
    fn test_diagonal_presses_two_directions() {
        let set = stick_actions(Vec2::new(-0.8, 0.7));
        assert!(set.contains(Action::Left));
        assert!(set.contains(Action::Down));
        assert!(!set.contains(Action::Right));
        assert!(!set.contains(Action::Up));
    }
}
