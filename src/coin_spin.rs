//! Coins popped out of blocks
//!
//! A block coin spins up out of the block, vanishes, and leaves a small
//! "+1" floating where it disappeared.

use macroquad::prelude::Vec2;
use crate::game::tween::{Ease, Tween};
use crate::game::{Entity, Events, HudKey, Sfx, Tip, World};

const RISE: f32 = 50.0;
const RISE_TIME: f32 = 0.3;
/// Spin frames per second
const SPIN_FPS: f32 = 15.0;
const SPIN_FRAMES: usize = 4;
const TIP_RISE: f32 = 16.0;
const TIP_TIME: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinSpin {
    /// Center where the coin started
    pub origin: Vec2,
    rise: Tween,
    elapsed: f32,
}

impl CoinSpin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            rise: Tween::new(0.0, RISE, RISE_TIME, Ease::Linear),
            elapsed: 0.0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.origin - Vec2::new(0.0, self.rise.value())
    }

    pub fn frame(&self) -> usize {
        (self.elapsed * SPIN_FPS) as usize % SPIN_FRAMES
    }

    /// Advance the spin. Returns true once the coin is finished, after
    /// sending its "+1" tip.
    pub fn update(&mut self, dt: f32, events: &mut Events) -> bool {
        self.elapsed += dt;
        self.rise.update(dt);
        if self.rise.is_done() {
            events.tips.send(Tip { text: "+1".to_string(), pos: self.pos() });
            return true;
        }
        false
    }
}

/// Pop a coin out of a block: count it and start the spin.
pub fn spawn(world: &mut World, center: Vec2, events: &mut Events) -> Entity {
    events.inc_dec(HudKey::Coins, 1);
    events.play(Sfx::Coin);
    world.spawn_coin(center.x, center.y)
}

/// A "+1" drifting up and fading out.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingTip {
    pub text: String,
    origin: Vec2,
    tween: Tween,
}

impl FloatingTip {
    pub fn new(tip: Tip) -> Self {
        Self {
            text: tip.text,
            origin: tip.pos,
            tween: Tween::new(0.0, 1.0, TIP_TIME, Ease::SineOut),
        }
    }

    /// Returns false once the tip has faded.
    pub fn update(&mut self, dt: f32) -> bool {
        self.tween.update(dt);
        !self.tween.is_done()
    }

    pub fn pos(&self) -> Vec2 {
        self.origin - Vec2::new(0.0, TIP_RISE * self.tween.value())
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.tween.value()
    }
}
