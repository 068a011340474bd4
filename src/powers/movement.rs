//! Walking and the ground/air animations

use super::{Power, PowerCtx};
use crate::input::Action;
use crate::player::{Anim, Avatar};

/// Horizontal acceleration while a direction is held, px/s²
const ACCELERATION: f32 = 500.0;
/// Deceleration with no direction held, px/s²
const DRAG: f32 = 600.0;
const MAX_SPEED: f32 = 150.0;
/// Terminal falling speed
const MAX_FALL: f32 = 500.0;

pub struct Move;

impl Move {
    pub fn new() -> Self {
        Self
    }
}

impl Power for Move {
    fn update(&mut self, avatar: &mut Avatar, ctx: &mut PowerCtx) -> bool {
        let controls = ctx.controls;
        let on_ground = avatar.on_ground();
        let crouching = on_ground && avatar.form.is_large() && controls.down(Action::Down);

        let body = &mut avatar.body;
        body.max_velocity.x = MAX_SPEED;
        body.max_velocity.y = MAX_FALL;
        body.drag_x = DRAG;

        body.acceleration.x = if crouching {
            0.0
        } else if controls.down(Action::Left) {
            avatar.facing_left = true;
            -ACCELERATION
        } else if controls.down(Action::Right) {
            avatar.facing_left = false;
            ACCELERATION
        } else {
            0.0
        };

        if avatar.posing() {
            return false;
        }

        let (vx, ax) = (avatar.body.velocity.x, avatar.body.acceleration.x);
        let anim = if !on_ground {
            Anim::Jump
        } else if crouching {
            Anim::Bend
        } else if vx == 0.0 && ax == 0.0 {
            Anim::Stand
        } else if vx != 0.0 && ax != 0.0 && vx.signum() != ax.signum() {
            Anim::Turn
        } else {
            Anim::Run
        };
        avatar.play(anim);

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Controls;
    use crate::powers::test_support::Harness;

    fn grounded() -> Avatar {
        let mut avatar = Avatar::new(40.0, 40.0);
        avatar.body.blocked.down = true;
        avatar
    }

    #[test]
    fn test_holding_right_accelerates_and_runs() {
        let mut h = Harness::new(&["...."]);
        h.controls = Controls::holding(&[Action::Right]);
        let mut avatar = grounded();
        avatar.body.velocity.x = 20.0;

        let handled = Move::new().update(&mut avatar, &mut h.ctx());

        assert!(!handled);
        assert_eq!(avatar.body.acceleration.x, ACCELERATION);
        assert!(!avatar.facing_left);
        assert_eq!(avatar.anim, Anim::Run);
    }

    #[test]
    fn test_reversing_shows_turn() {
        let mut h = Harness::new(&["...."]);
        h.controls = Controls::holding(&[Action::Left]);
        let mut avatar = grounded();
        avatar.body.velocity.x = 80.0;

        Move::new().update(&mut avatar, &mut h.ctx());

        assert!(avatar.facing_left);
        assert_eq!(avatar.anim, Anim::Turn);
    }

    #[test]
    fn test_idle_stands_and_airborne_jumps() {
        let mut h = Harness::new(&["...."]);
        let mut avatar = grounded();
        Move::new().update(&mut avatar, &mut h.ctx());
        assert_eq!(avatar.anim, Anim::Stand);
        assert_eq!(avatar.body.drag_x, DRAG);

        avatar.body.blocked.down = false;
        Move::new().update(&mut avatar, &mut h.ctx());
        assert_eq!(avatar.anim, Anim::Jump);
    }

    #[test]
    fn test_bend_only_when_large() {
        let mut h = Harness::new(&["...."]);
        h.controls = Controls::holding(&[Action::Down, Action::Right]);

        let mut small = grounded();
        Move::new().update(&mut small, &mut h.ctx());
        assert_eq!(small.anim, Anim::Run);

        let mut large = grounded();
        large.grow();
        large.pose_timer = 0.0;
        Move::new().update(&mut large, &mut h.ctx());
        assert_eq!(large.anim, Anim::Bend);
        assert_eq!(large.body.acceleration.x, 0.0);
    }
}
