//! Striking blocks with the player's head.

use macroquad::prelude::Vec2;
use super::{Power, PowerCommand, PowerCtx};
use crate::game::{BurstKind, HudKey, Sfx, Side, TileHit};
use crate::level::{Direction, TileCallback, TileMap, TILE_SIZE};
use crate::player::Avatar;

const BREAK_SCORE: i64 = 50;
/// What a question block holds when the level doesn't say
const DEFAULT_CONTENTS: &str = "coin";

pub struct HitBrick {
    /// Sides of the player that can strike a block
    sides: Vec<Side>,
}

impl HitBrick {
    pub fn new(directions: &[Direction]) -> Self {
        let sides = directions
            .iter()
            .map(|d| match d {
                Direction::Up => Side::Up,
                Direction::Down => Side::Down,
                Direction::Left => Side::Left,
                Direction::Right => Side::Right,
            })
            .collect();
        Self { sides }
    }
}

impl Power for HitBrick {
    fn collider_world(&mut self, avatar: &mut Avatar, ctx: &mut PowerCtx, hit: TileHit) -> bool {
        if !self.sides.contains(&hit.side) {
            return false;
        }
        let (col, row) = (hit.col, hit.row);
        let Some(tile) = ctx.map.get_mut(col, row) else {
            return false;
        };

        let callback = tile.props.callback;
        match callback {
            Some(TileCallback::QuestionMark) => {
                let name =
                    tile.props.power_up.clone().unwrap_or_else(|| DEFAULT_CONTENTS.to_string());
                match tile.props.hit_number {
                    Some(n) if n > 1 => tile.props.hit_number = Some(n - 1),
                    _ => tile.make_used(),
                }
                if name != DEFAULT_CONTENTS {
                    ctx.events.play(Sfx::PowerUpAppears);
                }
                ctx.command(PowerCommand::BumpBrick { col, row });
                ctx.command(PowerCommand::SpawnPowerUp { name, col, row });
                true
            }
            Some(TileCallback::Breakable) => {
                if avatar.form.is_large() {
                    ctx.map.remove(col, row);
                    let center = TileMap::tile_rect(col, row).center();
                    ctx.events.burst(BurstKind::BrickDebris, center);
                    let lower = center + Vec2::new(0.0, TILE_SIZE / 4.0);
                    ctx.events.burst(BurstKind::BrickDebris, lower);
                    ctx.events.inc_dec(HudKey::Score, BREAK_SCORE);
                    ctx.events.play(Sfx::BreakBlock);
                } else {
                    ctx.events.play(Sfx::Bump);
                }
                ctx.command(PowerCommand::BumpBrick { col, row });
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{HudEvent, SoundEvent};
    use crate::level::TileKind;
    use crate::powers::test_support::Harness;

    const ROWS: &[&str] = &[
        "..........",
        "..?B..h...",
        "..........",
        "##########",
    ];

    fn head(col: i32) -> TileHit {
        TileHit { col, row: 1, side: Side::Up }
    }

    #[test]
    fn test_question_block_releases_contents_and_empties() {
        let mut h = Harness::new(ROWS);
        h.map.get_mut(2, 1).unwrap().props.power_up = Some("mushroom".into());
        let mut avatar = Avatar::new(40.0, 40.0);

        let mut ctx = h.ctx();
        assert!(HitBrick::new(&[Direction::Up]).collider_world(&mut avatar, &mut ctx, head(2)));
        assert_eq!(ctx.commands, vec![
            PowerCommand::BumpBrick { col: 2, row: 1 },
            PowerCommand::SpawnPowerUp { name: "mushroom".into(), col: 2, row: 1 },
        ]);
        drop(ctx);

        assert_eq!(h.map.get(2, 1).unwrap().kind, TileKind::Used);
        assert_eq!(h.events.sounds.iter().next(), Some(&SoundEvent::Play(Sfx::PowerUpAppears)));

        // used blocks have no callback left
        let mut power = HitBrick::new(&[Direction::Up]);
        assert!(!power.collider_world(&mut avatar, &mut h.ctx(), head(2)));
    }

    #[test]
    fn test_coin_block_pays_out_four_times() {
        let mut h = Harness::new(ROWS);
        h.map.get_mut(2, 1).unwrap().props.hit_number = Some(4);
        let mut avatar = Avatar::new(40.0, 40.0);
        let mut power = HitBrick::new(&[Direction::Up]);

        let mut coins = 0;
        for _ in 0..6 {
            let mut ctx = h.ctx();
            power.collider_world(&mut avatar, &mut ctx, head(2));
            coins += ctx
                .commands
                .iter()
                .filter(|c| matches!(c, PowerCommand::SpawnPowerUp { name, .. } if name == "coin"))
                .count();
        }

        assert_eq!(coins, 4);
        assert_eq!(h.map.get(2, 1).unwrap().kind, TileKind::Used);
        assert!(h.events.sounds.is_empty());
    }

    #[test]
    fn test_small_player_bumps_brick() {
        let mut h = Harness::new(ROWS);
        let mut avatar = Avatar::new(56.0, 40.0);

        let mut ctx = h.ctx();
        assert!(HitBrick::new(&[Direction::Up]).collider_world(&mut avatar, &mut ctx, head(3)));
        assert_eq!(ctx.commands, vec![PowerCommand::BumpBrick { col: 3, row: 1 }]);
        drop(ctx);

        assert_eq!(h.map.get(3, 1).unwrap().kind, TileKind::Brick);
        assert_eq!(h.events.sounds.iter().next(), Some(&SoundEvent::Play(Sfx::Bump)));
    }

    #[test]
    fn test_large_player_breaks_brick() {
        let mut h = Harness::new(ROWS);
        let mut avatar = Avatar::new(56.0, 40.0);
        avatar.grow();

        HitBrick::new(&[Direction::Up]).collider_world(&mut avatar, &mut h.ctx(), head(3));

        assert_eq!(h.map.get(3, 1).unwrap().kind, TileKind::Empty);
        assert!(h.events.hud.iter().any(|e| *e == HudEvent::IncDec(HudKey::Score, BREAK_SCORE)));
        assert!(h.events.bursts.iter().all(|b| b.kind == BurstKind::BrickDebris));
        assert_eq!(h.events.sounds.iter().next(), Some(&SoundEvent::Play(Sfx::BreakBlock)));
    }

    #[test]
    fn test_hidden_one_up_appears() {
        let mut h = Harness::new(ROWS);
        {
            let tile = h.map.get_mut(6, 1).unwrap();
            tile.props.power_up = Some("1up".into());
            tile.props.callback = Some(TileCallback::QuestionMark);
        }
        let mut avatar = Avatar::new(104.0, 40.0);

        HitBrick::new(&[Direction::Up]).collider_world(&mut avatar, &mut h.ctx(), head(6));

        let tile = h.map.get(6, 1).unwrap();
        assert_eq!(tile.kind, TileKind::Used);
        assert!(tile.collides_top());
    }

    #[test]
    fn test_only_configured_sides_strike() {
        let mut h = Harness::new(ROWS);
        let mut avatar = Avatar::new(56.0, 40.0);
        let side_hit = TileHit { col: 3, row: 1, side: Side::Right };
        let mut up_only = HitBrick::new(&[Direction::Up]);
        let mut right_only = HitBrick::new(&[Direction::Right]);
        assert!(!up_only.collider_world(&mut avatar, &mut h.ctx(), side_hit));
        assert!(right_only.collider_world(&mut avatar, &mut h.ctx(), side_hit));
    }
}
