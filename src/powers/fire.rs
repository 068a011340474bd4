//! Fire flower: throw fireballs.

use super::{Power, PowerCtx};
use crate::fireball;
use crate::game::Sfx;
use crate::input::Action;
use crate::player::{Anim, Avatar, Form};

/// How long the throwing arm stays out, seconds
const THROW_POSE: f32 = 0.15;

pub struct Fire;

impl Fire {
    pub fn new(avatar: &mut Avatar) -> Self {
        avatar.form = Form::Fire;
        Self
    }
}

impl Power for Fire {
    fn update(&mut self, avatar: &mut Avatar, ctx: &mut PowerCtx) -> bool {
        if !ctx.controls.pressed(Action::Fire) {
            return false;
        }
        if fireball::throw(ctx.world, avatar.center(), avatar.facing_left).is_some() {
            ctx.events.play(Sfx::Fireball);
            avatar.pose(Anim::Throw, THROW_POSE);
        }
        false
    }

    fn before_remove(&mut self, avatar: &mut Avatar, _ctx: &mut PowerCtx) {
        if avatar.form == Form::Fire {
            avatar.form = Form::Super;
        }
    }
}
