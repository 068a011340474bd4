//! Super size: a taller body that survives one hit.

use super::{Power, PowerCommand, PowerCtx, PowerKind};
use crate::game::{Entity, Sfx};
use crate::player::Avatar;

/// Protection after being knocked back to small, seconds
const SHRINK_PROTECTION: f32 = 2.0;

pub struct Large;

impl Large {
    pub fn new(avatar: &mut Avatar) -> Self {
        avatar.grow();
        Self
    }
}

impl Power for Large {
    fn overlap_enemy(
        &mut self,
        avatar: &mut Avatar,
        ctx: &mut PowerCtx,
        enemy: Entity,
        step_on: bool,
    ) -> bool {
        // stomps are resolved by the enemy
        if step_on || avatar.protected {
            return false;
        }
        let attacks = ctx.world.enemies.get(enemy).is_some_and(|e| e.attacks());
        if !attacks {
            return false;
        }

        ctx.command(PowerCommand::Remove(PowerKind::Large));
        avatar.protect_for(SHRINK_PROTECTION);
        ctx.events.play(Sfx::Pipe);
        true
    }

    fn before_remove(&mut self, avatar: &mut Avatar, ctx: &mut PowerCtx) {
        avatar.shrink();
        ctx.command(PowerCommand::Remove(PowerKind::Fire));
    }
}
