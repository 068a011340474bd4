//! Power-ups released from blocks
//!
//! Every power-up first rises out of its block, then behaves by kind:
//! mushrooms walk, stars bounce along, flowers stay put.

use macroquad::prelude::{Rect, Vec2};
use crate::game::tween::{Ease, Tween};
use crate::game::{Body, Events, HudKey, Side, Sfx, TileHit};
use crate::powers::PowerKind;

const SIZE: f32 = 16.0;
const EMERGE_TIME: f32 = 1.0;
const MUSHROOM_SPEED: f32 = 60.0;
const STAR_SPEED: f32 = 80.0;
const STAR_BOUNCE: f32 = -250.0;
/// Upward kick when a bumped block knocks a power-up
const POP_VELOCITY: f32 = -200.0;
pub const COLLECT_SCORE: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Super mushroom
    Mushroom,
    /// Extra life mushroom
    OneUp,
    Flower,
    Star,
}

impl PowerUpKind {
    /// Map a block's contents to what actually comes out. A mushroom
    /// becomes a flower for a player who is already large. Anything
    /// unknown is a coin, which isn't a power-up at all.
    pub fn from_name(name: &str, player_is_large: bool) -> Option<Self> {
        match name {
            "mushroom" if player_is_large => Some(PowerUpKind::Flower),
            "mushroom" => Some(PowerUpKind::Mushroom),
            "star" => Some(PowerUpKind::Star),
            "1up" => Some(PowerUpKind::OneUp),
            _ => None,
        }
    }

    fn speed(self) -> f32 {
        match self {
            PowerUpKind::Mushroom | PowerUpKind::OneUp => MUSHROOM_SPEED,
            PowerUpKind::Star => STAR_SPEED,
            PowerUpKind::Flower => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    emerging: Option<Tween>,
    pub facing_left: bool,
    pub collected: bool,
    pub anim_time: f32,
}

impl PowerUp {
    /// A power-up hidden in the block whose top-left corner is `(x, y)`.
    pub fn emerge(kind: PowerUpKind, x: f32, y: f32) -> (PowerUp, Body) {
        let mut body = Body::new(x, y, SIZE, SIZE);
        body.allow_gravity = false;
        body.check_collision = false;
        let power_up = PowerUp {
            kind,
            emerging: Some(Tween::new(y, y - SIZE, EMERGE_TIME, Ease::Linear)),
            facing_left: false,
            collected: false,
            anim_time: 0.0,
        };
        (power_up, body)
    }

    pub fn is_emerging(&self) -> bool {
        self.emerging.is_some()
    }

    pub fn update(&mut self, body: &mut Body, dt: f32) {
        self.anim_time += dt;

        if let Some(tween) = self.emerging.as_mut() {
            body.velocity = Vec2::ZERO;
            body.pos.y = tween.update(dt);
            if tween.is_done() {
                self.emerging = None;
                body.allow_gravity = true;
                body.check_collision = true;
            }
            return;
        }

        let dir = if self.facing_left { -1.0 } else { 1.0 };
        body.velocity.x = dir * self.kind.speed();
    }

    pub fn collider_world(&mut self, body: &mut Body, hit: TileHit) {
        match hit.side {
            Side::Left => self.facing_left = false,
            Side::Right => self.facing_left = true,
            Side::Down if self.kind == PowerUpKind::Star => body.velocity.y = STAR_BOUNCE,
            _ => {}
        }
    }

    /// Knocked from below by a bumped block.
    pub fn pop(&mut self, body: &mut Body) {
        if self.is_emerging() {
            return;
        }
        body.velocity.y = POP_VELOCITY;
    }

    /// Hand the power-up to the player. Returns the power to grant, if
    /// any; an extra life is applied through the HUD instead.
    pub fn collect(&mut self, events: &mut Events) -> Option<PowerKind> {
        if self.collected {
            return None;
        }
        self.collected = true;
        match self.kind {
            PowerUpKind::OneUp => {
                events.inc_dec(HudKey::Lives, 1);
                events.play(Sfx::OneUp);
                None
            }
            kind => {
                events.inc_dec(HudKey::Score, COLLECT_SCORE);
                events.play(Sfx::PowerUp);
                Some(match kind {
                    PowerUpKind::Flower => PowerKind::Fire,
                    PowerUpKind::Star => PowerKind::Invincible,
                    _ => PowerKind::Large,
                })
            }
        }
    }

    /// Dropped below the room.
    pub fn fell_out(body: &Body, bounds: Rect) -> bool {
        body.top() > bounds.bottom()
    }
}
