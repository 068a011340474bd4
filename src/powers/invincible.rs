//! Star power: ten seconds of flashing colours where touching an enemy
//! knocks it out.

use macroquad::prelude::{Color, WHITE};
use super::{Power, PowerCommand, PowerCtx, PowerKind};
use crate::game::{BurstKind, Entity};
use crate::player::Avatar;

const DURATION: f32 = 10.0;
const TINTS: [u32; 6] = [0xffffff, 0xff0000, 0xffffff, 0x00ff00, 0xffffff, 0x0000ff];
/// Seconds between trail sparkles
const TRAIL_INTERVAL: f32 = 0.045;

pub struct Invincible {
    elapsed: f32,
    frame: usize,
    trail_clock: f32,
}

impl Invincible {
    pub fn new() -> Self {
        Self { elapsed: 0.0, frame: 0, trail_clock: 0.0 }
    }
}

impl Power for Invincible {
    fn update(&mut self, avatar: &mut Avatar, ctx: &mut PowerCtx) -> bool {
        self.elapsed += ctx.dt;
        if self.elapsed >= DURATION {
            ctx.command(PowerCommand::Remove(PowerKind::Invincible));
            return false;
        }

        avatar.tint = Color::from_hex(TINTS[self.frame]);
        self.frame = (self.frame + 1) % TINTS.len();

        if ctx.config.fx.trails {
            self.trail_clock += ctx.dt;
            while self.trail_clock >= TRAIL_INTERVAL {
                self.trail_clock -= TRAIL_INTERVAL;
                ctx.events.burst(BurstKind::StarTrail, avatar.center());
            }
        }
        false
    }

    fn overlap_enemy(
        &mut self,
        _avatar: &mut Avatar,
        ctx: &mut PowerCtx,
        enemy: Entity,
        _step_on: bool,
    ) -> bool {
        if let Some((enemy, body)) = ctx.world.enemy_mut(enemy) {
            enemy.die(body, true, ctx.events);
        }
        true
    }

    fn before_remove(&mut self, avatar: &mut Avatar, _ctx: &mut PowerCtx) {
        avatar.tint = WHITE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::EnemyKind;
    use crate::powers::test_support::Harness;

    #[test]
    fn test_tint_cycles() {
        let mut h = Harness::new(&["...."]);
        let mut avatar = Avatar::new(20.0, 20.0);
        let mut power = Invincible::new();

        power.update(&mut avatar, &mut h.ctx());
        assert_eq!(avatar.tint, Color::from_hex(0xffffff));
        power.update(&mut avatar, &mut h.ctx());
        assert_eq!(avatar.tint, Color::from_hex(0xff0000));
    }

    #[test]
    fn test_expires_after_ten_seconds() {
        let mut h = Harness::new(&["...."]);
        let mut avatar = Avatar::new(20.0, 20.0);
        let mut power = Invincible::new();

        let mut ctx = h.ctx();
        ctx.dt = 9.9;
        power.update(&mut avatar, &mut ctx);
        assert!(ctx.commands.is_empty());
        ctx.dt = 0.2;
        power.update(&mut avatar, &mut ctx);
        assert_eq!(ctx.commands, vec![PowerCommand::Remove(PowerKind::Invincible)]);
    }

    #[test]
    fn test_touching_enemy_knocks_it_out() {
        let mut h = Harness::new(&["...."]);
        let goomba = h.world.spawn_enemy(EnemyKind::Goomba, 30.0, 16.0);
        let mut avatar = Avatar::new(20.0, 8.0);

        let handled = Invincible::new().overlap_enemy(&mut avatar, &mut h.ctx(), goomba, false);

        assert!(handled);
        let enemy = h.world.enemies.get(goomba).unwrap();
        assert!(enemy.dead);
        assert!(!h.world.bodies.get(goomba).unwrap().check_collision);
    }

    #[test]
    fn test_trail_respects_config() {
        let mut h = Harness::new(&["...."]);
        h.config.fx.trails = false;
        let mut avatar = Avatar::new(20.0, 20.0);
        Invincible::new().update(&mut avatar, &mut h.ctx());
        assert!(h.events.bursts.is_empty());
    }

    #[test]
    fn test_before_remove_resets_tint() {
        let mut h = Harness::new(&["...."]);
        let mut avatar = Avatar::new(20.0, 20.0);
        avatar.tint = Color::from_hex(0x00ff00);
        Invincible::new().before_remove(&mut avatar, &mut h.ctx());
        assert_eq!(avatar.tint, WHITE);
    }
}
