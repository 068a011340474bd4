//! Fireballs thrown by a fire-form player
//!
//! A fireball flies level with gravity on and a perfect vertical bounce,
//! so it hops along the ground. Striking a wall or an enemy makes it
//! explode; once the explosion has played it is switched off and kept
//! around for the next throw.

use macroquad::prelude::{Rect, Vec2};
use crate::game::{Body, BurstKind, Entity, Events, Sfx, Side, TileHit, World};

pub const SPEED: f32 = 300.0;
pub const SIZE: f32 = 8.0;
/// Fireballs allowed in flight at once
pub const MAX_LIVE: usize = 2;
/// Three explosion frames at 15 fps
const EXPLODE_TIME: f32 = 3.0 / 15.0;
const EMBER_INTERVAL: f32 = 0.03;
/// Distance from the player's center to the throwing hand
const HAND_OFFSET: Vec2 = Vec2::new(6.0, -2.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fireball {
    active: bool,
    exploding: bool,
    explode_timer: f32,
    ember_clock: f32,
    pub anim_time: f32,
}

impl Fireball {
    fn body(center: Vec2, facing_left: bool) -> Body {
        let mut body = Body::centered(center.x, center.y, SIZE, SIZE);
        body.bounce_y = 1.0;
        body.velocity.x = if facing_left { -SPEED } else { SPEED };
        body
    }

    pub fn launch(center: Vec2, facing_left: bool) -> (Fireball, Body) {
        let fireball = Fireball {
            active: true,
            exploding: false,
            explode_timer: 0.0,
            ember_clock: 0.0,
            anim_time: 0.0,
        };
        (fireball, Self::body(center, facing_left))
    }

    /// Throw a pooled fireball again.
    pub fn relaunch(&mut self, body: &mut Body, center: Vec2, facing_left: bool) {
        let (fresh, fresh_body) = Self::launch(center, facing_left);
        *self = fresh;
        *body = fresh_body;
    }

    /// Flying or still playing its explosion.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_exploding(&self) -> bool {
        self.exploding
    }

    pub fn explode(&mut self, body: &mut Body, events: &mut Events) {
        if self.exploding || !self.active {
            return;
        }
        self.exploding = true;
        self.explode_timer = EXPLODE_TIME;
        self.anim_time = 0.0;
        body.allow_gravity = false;
        body.stop();
        events.play(Sfx::Bump);
        events.burst(BurstKind::FireSparks, body.center());
    }

    fn deactivate(&mut self, body: &mut Body) {
        self.active = false;
        self.exploding = false;
        body.disable();
    }

    /// Advance animation and timers. `view` is the camera rectangle; a
    /// fireball that leaves it is switched off.
    pub fn update(
        &mut self,
        body: &mut Body,
        dt: f32,
        view: Rect,
        trails: bool,
        events: &mut Events,
    ) {
        if !self.active {
            return;
        }
        self.anim_time += dt;

        if self.exploding {
            self.explode_timer -= dt;
            if self.explode_timer <= 0.0 {
                self.deactivate(body);
            }
            return;
        }

        if trails {
            self.ember_clock += dt;
            while self.ember_clock >= EMBER_INTERVAL {
                self.ember_clock -= EMBER_INTERVAL;
                events.burst(BurstKind::Ember, body.center());
            }
        }

        if !view.overlaps(&body.rect()) {
            self.deactivate(body);
        }
    }

    /// Walls stop a fireball; floors and ceilings only bounce it.
    pub fn collider_world(&mut self, body: &mut Body, hit: TileHit, events: &mut Events) {
        if matches!(hit.side, Side::Left | Side::Right) {
            self.explode(body, events);
        }
    }
}

/// Throw a fireball from the player's hand, reusing a spent one when there
/// is one. Returns `None` when too many are already in flight.
pub fn throw(world: &mut World, player_center: Vec2, facing_left: bool) -> Option<Entity> {
    if world.live_fireballs() >= MAX_LIVE {
        return None;
    }
    let hand = Vec2::new(
        player_center.x + if facing_left { -HAND_OFFSET.x } else { HAND_OFFSET.x },
        player_center.y + HAND_OFFSET.y,
    );

    let spent = world.fireballs.iter().find(|(_, f)| !f.is_active()).map(|(e, _)| e);
    if let Some((entity, (fireball, body))) =
        spent.and_then(|e| Some((e, world.fireball_mut(e)?)))
    {
        fireball.relaunch(body, hand, facing_left);
        return Some(entity);
    }
    Some(world.spawn_fireball(hand, facing_left))
}
