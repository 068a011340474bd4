//! The player
//!
//! `Player` is split in two so powers can be dispatched without aliasing:
//! the `Avatar` (body, looks, life state) is what powers act on, and the
//! `PowerManager` holds the powers themselves.

use macroquad::prelude::{Color, Rect, Vec2, WHITE};
use crate::game::{Body, BurstKind, Entity, Events, HudKey, PlayerEvent, SoundEvent, Sfx, TileHit};
use crate::game::tween::{Ease, Tween};
use crate::powers::{PowerCtx, PowerKind, PowerManager};

pub const SMALL_SIZE: Vec2 = Vec2::new(8.0, 16.0);
pub const LARGE_SIZE: Vec2 = Vec2::new(8.0, 30.0);

/// Upward speed of the death hop
const DEATH_VELOCITY: f32 = -200.0;
/// Protection after reviving, seconds
const REVIVE_PROTECTION: f32 = 1.5;
const BLINK_ALPHA: f32 = 0.6;
const BLINK_HALF_PERIOD: f32 = 0.1;
const BLINK_REPEATS: u32 = 6;
const LANDING_SQUASH: Vec2 = Vec2::new(1.05, 0.95);
const SQUASH_TIME: f32 = 0.08;

/// Size and sprite set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Small,
    Super,
    Fire,
}

impl Form {
    /// Animation key suffix for the sprite set.
    pub fn suffix(self) -> &'static str {
        match self {
            Form::Small => "",
            Form::Super => "Super",
            Form::Fire => "Fire",
        }
    }

    pub fn is_large(self) -> bool {
        !matches!(self, Form::Small)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anim {
    Stand,
    Run,
    Turn,
    Bend,
    Jump,
    Grow,
    Shrink,
    /// Arm out after throwing a fireball
    Throw,
    Dead,
}

impl Anim {
    pub fn key(self) -> &'static str {
        match self {
            Anim::Stand => "stand",
            Anim::Run => "run",
            Anim::Turn => "turn",
            Anim::Bend => "bend",
            Anim::Jump => "jump",
            Anim::Grow => "grow",
            Anim::Shrink => "shrink",
            Anim::Throw => "fire",
            Anim::Dead => "dead",
        }
    }
}

/// Everything about the player except its powers.
#[derive(Debug, Clone)]
pub struct Avatar {
    pub body: Body,
    pub dead: bool,
    /// Enemies can't hurt a protected player
    pub protected: bool,
    pub form: Form,
    pub facing_left: bool,
    pub tint: Color,
    pub alpha: f32,
    /// Sprite scale (landing squash)
    pub scale: Vec2,
    pub anim: Anim,
    pub anim_time: f32,
    /// While positive, a one-shot pose owns the animation
    pub pose_timer: f32,
    /// Drawn behind the tiles (inside a pipe)
    pub in_pipe: bool,
    last_safe: Vec2,
    was_on_ground: bool,
    protect_timer: Option<f32>,
    blink: Option<Tween>,
    squash: Option<Tween>,
}

impl Avatar {
    /// Small avatar centered on `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::centered(x, y, SMALL_SIZE.x, SMALL_SIZE.y),
            dead: false,
            protected: false,
            form: Form::Small,
            facing_left: false,
            tint: WHITE,
            alpha: 1.0,
            scale: Vec2::ONE,
            anim: Anim::Stand,
            anim_time: 0.0,
            pose_timer: 0.0,
            in_pipe: false,
            last_safe: Vec2::new(x, y),
            was_on_ground: false,
            protect_timer: None,
            blink: None,
            squash: None,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn on_ground(&self) -> bool {
        self.body.blocked.down
    }

    /// Switch animation, restarting it only if it changed.
    pub fn play(&mut self, anim: Anim) {
        if self.anim != anim {
            self.anim = anim;
            self.anim_time = 0.0;
        }
    }

    /// Hold a one-shot pose for `seconds`.
    pub fn pose(&mut self, anim: Anim, seconds: f32) {
        self.anim = anim;
        self.anim_time = 0.0;
        self.pose_timer = seconds;
    }

    pub fn posing(&self) -> bool {
        self.pose_timer > 0.0
    }

    pub fn grow(&mut self) {
        if self.form == Form::Small {
            self.form = Form::Super;
        }
        self.body.resize_keep_bottom(LARGE_SIZE.x, LARGE_SIZE.y);
        self.pose(Anim::Grow, 0.6);
    }

    pub fn shrink(&mut self) {
        self.form = Form::Small;
        self.body.resize_keep_bottom(SMALL_SIZE.x, SMALL_SIZE.y);
        self.pose(Anim::Shrink, 0.6);
    }

    /// Protected and blinking for `seconds`.
    pub fn protect_for(&mut self, seconds: f32) {
        self.protected = true;
        self.protect_timer = Some(seconds);
        self.alpha = BLINK_ALPHA;
        let blink = Tween::new(BLINK_ALPHA, 1.0, BLINK_HALF_PERIOD, Ease::Linear);
        self.blink = Some(blink.yoyo().repeat(BLINK_REPEATS));
    }

    /// Advance timers that run whether or not the player is alive.
    fn tick(&mut self, dt: f32) {
        self.anim_time += dt;
        self.pose_timer = (self.pose_timer - dt).max(0.0);

        if let Some(remaining) = self.protect_timer.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.protect_timer = None;
                self.protected = false;
                self.alpha = 1.0;
                self.blink = None;
            }
        }

        if let Some(blink) = self.blink.as_mut() {
            self.alpha = blink.update(dt);
            if blink.is_done() {
                self.alpha = 1.0;
                self.blink = None;
            }
        }

        if let Some(squash) = self.squash.as_mut() {
            let t = squash.update(dt);
            self.scale = Vec2::ONE.lerp(LANDING_SQUASH, t);
            if squash.is_done() {
                self.scale = Vec2::ONE;
                self.squash = None;
            }
        }
    }

    fn out_of_bounds(&self, bounds: Rect) -> bool {
        let c = self.center();
        c.x < bounds.x || c.y > bounds.bottom()
    }

    /// Where to come back after dying: the last safe landing spot when the
    /// player left the world, otherwise where they are.
    pub fn respawn_point(&self, bounds: Rect) -> Vec2 {
        if self.out_of_bounds(bounds) {
            self.last_safe
        } else {
            self.center()
        }
    }

    pub fn last_safe(&self) -> Vec2 {
        self.last_safe
    }

    pub fn die(&mut self, events: &mut Events) {
        if self.dead {
            return;
        }
        self.dead = true;
        events.inc_dec(HudKey::Lives, -1);
        events.sounds.send(SoundEvent::StopAll);
        events.play(Sfx::MarioDie);
        self.body.check_collision = false;
        self.body.acceleration = Vec2::ZERO;
        self.body.velocity = Vec2::new(0.0, DEATH_VELOCITY);
        self.tint = WHITE;
        self.pose_timer = 0.0;
        self.play(Anim::Dead);
        events.player.send(PlayerEvent::Died);
        log::info!("Player died at ({:.0}, {:.0})", self.center().x, self.center().y);
    }

    pub fn revive_at(&mut self, pos: Vec2, events: &mut Events) {
        self.dead = false;
        self.in_pipe = false;
        self.body.check_collision = true;
        self.body.stop();
        self.body.set_center(pos);
        self.was_on_ground = false;
        self.protect_for(REVIVE_PROTECTION);
        self.play(Anim::Stand);
        events.burst(BurstKind::RespawnStars, pos);
    }
}

/// The player: avatar plus powers.
pub struct Player {
    pub avatar: Avatar,
    pub powers: PowerManager,
}

impl Player {
    pub fn new(x: f32, y: f32, allowed: &[PowerKind]) -> Self {
        Self {
            avatar: Avatar::new(x, y),
            powers: PowerManager::new(allowed),
        }
    }

    /// Grant a power with its stock factory.
    pub fn grant(&mut self, kind: PowerKind) {
        let avatar = &mut self.avatar;
        self.powers.add(kind, || kind.build(avatar));
    }

    pub fn update(&mut self, ctx: &mut PowerCtx) {
        self.avatar.tick(ctx.dt);
        if self.avatar.dead {
            return;
        }

        self.powers.update(&mut self.avatar, ctx);

        let avatar = &mut self.avatar;
        let on_ground = avatar.on_ground();
        if on_ground {
            avatar.last_safe = avatar.center();
        }
        if on_ground && !avatar.was_on_ground {
            avatar.squash = Some(Tween::new(0.0, 1.0, SQUASH_TIME, Ease::QuadOut).yoyo());
            let feet = Vec2::new(avatar.center().x, avatar.body.bottom() - 2.0);
            ctx.events.burst(BurstKind::Dust, feet);
        }
        avatar.was_on_ground = on_ground;

        if avatar.out_of_bounds(ctx.world.bounds) {
            avatar.die(ctx.events);
        }
    }

    pub fn die(&mut self, events: &mut Events) {
        self.avatar.die(events);
    }

    pub fn overlap_enemy(&mut self, ctx: &mut PowerCtx, enemy: Entity, step_on: bool) -> bool {
        self.powers.overlap_enemy(&mut self.avatar, ctx, enemy, step_on)
    }

    pub fn collider_world(&mut self, ctx: &mut PowerCtx, hit: TileHit) -> bool {
        self.powers.collider_world(&mut self.avatar, ctx, hit)
    }
}
