//! Player powers
//!
//! A power is a small strategy object the player can gain or lose at
//! runtime. Each one may hook four moments:
//!
//! - `update`: once per tick while the player is alive
//! - `overlap_enemy`: the player's body touched an enemy
//! - `collider_world`: the player's body was stopped by a tile
//! - `before_remove`: the power is about to be dropped
//!
//! The `PowerManager` walks the player's allowed powers in priority order
//! and stops at the first power that reports the event as handled.
//!
//! Powers never hold references to the player or the scene. They get the
//! avatar and a `PowerCtx` for the duration of a call, and ask for
//! structural changes (dropping a power, starting a pipe transit, spawning
//! a block's contents) by queueing `PowerCommand`s that the scene applies
//! once dispatch has finished.

mod movement;
mod jump;
mod invincible;
mod large;
mod fire;
mod enter_pipe;
mod hit_brick;

pub use movement::Move;
pub use jump::Jump;
pub use invincible::Invincible;
pub use large::Large;
pub use fire::Fire;
pub use enter_pipe::{EnterPipe, PipeTransit, TransitStep};
pub use hit_brick::HitBrick;

use std::collections::HashMap;
use crate::config::GameConfig;
use crate::game::{Entity, Events, TileHit, World};
use crate::input::Controls;
use crate::level::{Direction, TileMap};
use crate::player::Avatar;

/// Capability identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerKind {
    Jump,
    Move,
    Invincible,
    Large,
    Fire,
    EnterPipe,
    HitBrick,
}

impl PowerKind {
    /// Priority order used when the player doesn't say otherwise.
    pub const DEFAULT_ORDER: [PowerKind; 7] = [
        PowerKind::Jump,
        PowerKind::Move,
        PowerKind::Invincible,
        PowerKind::Large,
        PowerKind::Fire,
        PowerKind::EnterPipe,
        PowerKind::HitBrick,
    ];

    /// The stock factory for each power.
    pub fn build(self, avatar: &mut Avatar) -> Box<dyn Power> {
        match self {
            PowerKind::Jump => Box::new(Jump::new()),
            PowerKind::Move => Box::new(Move::new()),
            PowerKind::Invincible => Box::new(Invincible::new()),
            PowerKind::Large => Box::new(Large::new(avatar)),
            PowerKind::Fire => Box::new(Fire::new(avatar)),
            PowerKind::EnterPipe => Box::new(EnterPipe::new()),
            PowerKind::HitBrick => Box::new(HitBrick::new(&[Direction::Up])),
        }
    }
}

/// Structural changes a power asks the scene to make after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerCommand {
    Remove(PowerKind),
    /// Slide into the pipe heading `enter`, then come out at `dest`
    BeginTransit { enter: Direction, dest: String },
    /// Release a block's contents above the tile
    SpawnPowerUp { name: String, col: i32, row: i32 },
    /// Knock the tile up, hitting whatever stands on it
    BumpBrick { col: i32, row: i32 },
}

/// Everything a power may look at or touch besides the avatar.
pub struct PowerCtx<'a> {
    pub controls: &'a Controls,
    pub map: &'a mut TileMap,
    pub world: &'a mut World,
    pub events: &'a mut Events,
    pub config: &'a GameConfig,
    pub dt: f32,
    pub commands: Vec<PowerCommand>,
}

impl<'a> PowerCtx<'a> {
    pub fn new(
        controls: &'a Controls,
        map: &'a mut TileMap,
        world: &'a mut World,
        events: &'a mut Events,
        config: &'a GameConfig,
        dt: f32,
    ) -> Self {
        Self { controls, map, world, events, config, dt, commands: Vec::new() }
    }

    pub fn command(&mut self, command: PowerCommand) {
        self.commands.push(command);
    }
}

/// Hooks a power can implement. Returning `true` marks the event handled
/// and stops lower-priority powers from seeing it.
pub trait Power {
    fn update(&mut self, _avatar: &mut Avatar, _ctx: &mut PowerCtx) -> bool {
        false
    }

    /// `step_on` is true when the player landed on top of the enemy.
    fn overlap_enemy(
        &mut self,
        _avatar: &mut Avatar,
        _ctx: &mut PowerCtx,
        _enemy: Entity,
        _step_on: bool,
    ) -> bool {
        false
    }

    fn collider_world(&mut self, _avatar: &mut Avatar, _ctx: &mut PowerCtx, _hit: TileHit) -> bool {
        false
    }

    fn before_remove(&mut self, _avatar: &mut Avatar, _ctx: &mut PowerCtx) {}
}

/// The player's current set of powers.
pub struct PowerManager {
    allowed: Vec<PowerKind>,
    powers: HashMap<PowerKind, Box<dyn Power>>,
}

impl PowerManager {
    pub fn new(allowed: &[PowerKind]) -> Self {
        Self {
            allowed: allowed.to_vec(),
            powers: HashMap::new(),
        }
    }

    /// Grant a power. The factory only runs when the power is allowed and
    /// not already held.
    pub fn add<F>(&mut self, kind: PowerKind, factory: F) -> &mut Self
    where
        F: FnOnce() -> Box<dyn Power>,
    {
        if self.allowed.contains(&kind) && !self.powers.contains_key(&kind) {
            self.powers.insert(kind, factory());
            log::debug!("Power added: {:?}", kind);
        }
        self
    }

    /// Drop a power, running its `before_remove` hook first.
    pub fn remove(
        &mut self,
        kind: PowerKind,
        avatar: &mut Avatar,
        ctx: &mut PowerCtx,
    ) -> &mut Self {
        if let Some(mut power) = self.powers.remove(&kind) {
            power.before_remove(avatar, ctx);
            log::debug!("Power removed: {:?}", kind);
        }
        self
    }

    pub fn has(&self, kind: PowerKind) -> bool {
        self.powers.contains_key(&kind)
    }

    /// Held powers in priority order.
    pub fn active(&self) -> impl Iterator<Item = PowerKind> + '_ {
        self.allowed.iter().copied().filter(|k| self.powers.contains_key(k))
    }

    /// Run `hook` over held powers in priority order until one returns true.
    fn dispatch<F>(&mut self, mut hook: F) -> bool
    where
        F: FnMut(&mut dyn Power) -> bool,
    {
        let Self { allowed, powers } = self;
        for kind in allowed.iter() {
            if let Some(power) = powers.get_mut(kind) {
                if hook(power.as_mut()) {
                    return true;
                }
            }
        }
        false
    }

    pub fn update(&mut self, avatar: &mut Avatar, ctx: &mut PowerCtx) -> bool {
        self.dispatch(|p| p.update(avatar, ctx))
    }

    pub fn overlap_enemy(
        &mut self,
        avatar: &mut Avatar,
        ctx: &mut PowerCtx,
        enemy: Entity,
        step_on: bool,
    ) -> bool {
        self.dispatch(|p| p.overlap_enemy(avatar, ctx, enemy, step_on))
    }

    pub fn collider_world(
        &mut self,
        avatar: &mut Avatar,
        ctx: &mut PowerCtx,
        hit: TileHit,
    ) -> bool {
        self.dispatch(|p| p.collider_world(avatar, ctx, hit))
    }
}
