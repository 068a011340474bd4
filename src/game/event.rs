//! Event System
//!
//! The simulation never talks to audio, the HUD widgets, or the particle
//! pool directly. It sends events instead, and the scene drains each queue
//! once per tick:
//!
//! 1. Jump power launches the player → sends `Play(Sfx::Jump)`
//! 2. Enemy dies → sends `HudEvent::IncDec(Score, 100)`
//! 3. Brick breaks → sends a `Burst` of debris
//!
//! Each consumer handles its own concern without knowing who sent it.

use macroquad::prelude::{Rect, Vec2};

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all game events.
#[derive(Debug, Default)]
pub struct Events {
    pub sounds: EventQueue<SoundEvent>,
    pub hud: EventQueue<HudEvent>,
    pub bursts: EventQueue<Burst>,
    /// Floating text ("+1" over a collected coin)
    pub tips: EventQueue<Tip>,
    pub camera: EventQueue<CameraEvent>,
    pub player: EventQueue<PlayerEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, sfx: Sfx) {
        self.sounds.send(SoundEvent::Play(sfx));
    }

    pub fn inc_dec(&mut self, key: HudKey, delta: i64) {
        self.hud.send(HudEvent::IncDec(key, delta));
    }

    pub fn burst(&mut self, kind: BurstKind, pos: Vec2) {
        self.bursts.send(Burst { kind, pos });
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// Sound cues. The stem is the file name under `assets/audio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Jump,
    JumpSuper,
    Coin,
    Bump,
    BreakBlock,
    Stomp,
    Kick,
    Pipe,
    PowerUp,
    PowerUpAppears,
    OneUp,
    Fireball,
    MarioDie,
    StageClear,
}

impl Sfx {
    pub const ALL: [Sfx; 14] = [
        Sfx::Jump,
        Sfx::JumpSuper,
        Sfx::Coin,
        Sfx::Bump,
        Sfx::BreakBlock,
        Sfx::Stomp,
        Sfx::Kick,
        Sfx::Pipe,
        Sfx::PowerUp,
        Sfx::PowerUpAppears,
        Sfx::OneUp,
        Sfx::Fireball,
        Sfx::MarioDie,
        Sfx::StageClear,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            Sfx::Jump => "smb_jump-small",
            Sfx::JumpSuper => "smb_jump-super",
            Sfx::Coin => "smb_coin",
            Sfx::Bump => "smb_bump",
            Sfx::BreakBlock => "smb_breakblock",
            Sfx::Stomp => "smb_stomp",
            Sfx::Kick => "smb_kick",
            Sfx::Pipe => "smb_pipe",
            Sfx::PowerUp => "smb_powerup",
            Sfx::PowerUpAppears => "smb_powerup_appears",
            Sfx::OneUp => "smb_1-up",
            Sfx::Fireball => "smb_fireball",
            Sfx::MarioDie => "smb_mariodie",
            Sfx::StageClear => "smb_stage_clear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Play(Sfx),
    /// Stop every playing cue and the music
    StopAll,
    /// Start the looping level music if it isn't already playing
    ResumeMusic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudKey {
    Score,
    Coins,
    Time,
    Lives,
    Fps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudEvent {
    /// Add to the value and pulse the item
    IncDec(HudKey, i64),
    /// Tween to a new value
    Set(HudKey, i64),
}

/// Particle effect presets the simulation can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    /// Landing puff under the feet
    Dust,
    /// Star ring when the player revives
    RespawnStars,
    /// Fireball impact
    FireSparks,
    /// One ember behind a flying fireball
    Ember,
    /// One sparkle behind an invincible player
    StarTrail,
    /// Pieces of a broken brick
    BrickDebris,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub kind: BurstKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tip {
    pub text: String,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    /// Fade to black over the given seconds
    FadeOut(f32),
    FadeIn(f32),
    /// New bounds after a teleport; the camera snaps instead of easing
    Relocate(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Died,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_container() {
        let mut events = Events::new();

        events.play(Sfx::Coin);
        events.inc_dec(HudKey::Coins, 1);
        events.burst(BurstKind::Dust, Vec2::ZERO);

        assert_eq!(events.sounds.iter().next(), Some(&SoundEvent::Play(Sfx::Coin)));
        assert_eq!(events.hud.len(), 1);

        events.sounds.clear();
        assert!(events.sounds.is_empty());
        assert_eq!(events.bursts.len(), 1);
    }

    #[test]
    fn test_sfx_stems_are_unique() {
        let mut stems: Vec<_> = Sfx::ALL.iter().map(|s| s.stem()).collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), Sfx::ALL.len());
    }
}
