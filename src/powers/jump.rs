//! Jumping
//!
//! Pressing jump on the ground launches the player. Holding the button
//! keeps the launch speed for a short window, so a tap is a hop and a
//! hold is a full jump.

use super::{Power, PowerCtx};
use crate::game::Sfx;
use crate::input::Action;
use crate::player::Avatar;

const LAUNCH_SPEED: f32 = 260.0;
/// Seconds the launch speed can be sustained by holding jump
const HOLD_TIME: f32 = 0.15;

pub struct Jump {
    hold: f32,
}

impl Jump {
    pub fn new() -> Self {
        Self { hold: 0.0 }
    }
}

impl Power for Jump {
    fn update(&mut self, avatar: &mut Avatar, ctx: &mut PowerCtx) -> bool {
        let controls = ctx.controls;

        if controls.pressed(Action::Jump) && avatar.on_ground() {
            self.hold = HOLD_TIME;
            avatar.body.velocity.y = -LAUNCH_SPEED;
            ctx.events.play(if avatar.form.is_large() { Sfx::JumpSuper } else { Sfx::Jump });
        } else if self.hold > 0.0 {
            if controls.down(Action::Jump) && !avatar.body.blocked.up {
                avatar.body.velocity.y = -LAUNCH_SPEED;
                self.hold -= ctx.dt;
            } else {
                self.hold = 0.0;
            }
        }

        false
    }
}
