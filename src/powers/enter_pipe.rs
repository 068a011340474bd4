//! Pipes
//!
//! `EnterPipe` notices the player pushing into a pipe mouth and asks the
//! scene to start a `PipeTransit`. The transit then runs on its own while
//! physics is paused:
//!
//! slide in → fade out → teleport to the destination → fade in (with an
//! optional slide out) → done

use macroquad::prelude::Vec2;
use super::{Power, PowerCommand, PowerCtx};
use crate::game::tween::{Ease, Tween};
use crate::game::{CameraEvent, Events, Side, TileHit, World};
use crate::input::{Action, Controls};
use crate::level::{Dest, Direction, Room};
use crate::player::{Anim, Avatar};

const SLIDE_TIME: f32 = 0.8;
const FADE_TIME: f32 = 0.18;
/// Horizontal offset from a destination marker to where the player appears
const ARRIVAL_OFFSET_X: f32 = 16.0;

fn holding(controls: &Controls, direction: Direction) -> bool {
    controls.down(match direction {
        Direction::Up => Action::Up,
        Direction::Down => Action::Down,
        Direction::Left => Action::Left,
        Direction::Right => Action::Right,
    })
}

fn side_of(direction: Direction) -> Side {
    match direction {
        Direction::Up => Side::Up,
        Direction::Down => Side::Down,
        Direction::Left => Side::Left,
        Direction::Right => Side::Right,
    }
}

pub struct EnterPipe;

impl EnterPipe {
    pub fn new() -> Self {
        Self
    }
}

impl Power for EnterPipe {
    fn collider_world(&mut self, _avatar: &mut Avatar, ctx: &mut PowerCtx, hit: TileHit) -> bool {
        let Some(tile) = ctx.map.get(hit.col, hit.row) else {
            return false;
        };
        let (Some(dest), Some(direction)) = (tile.props.dest.clone(), tile.props.direction) else {
            return false;
        };
        if hit.side != side_of(direction) || !holding(ctx.controls, direction) {
            return false;
        }
        ctx.command(PowerCommand::BeginTransit { enter: direction, dest });
        true
    }
}

/// One eased slide of the avatar along an axis.
#[derive(Debug, Clone)]
struct Slide {
    tween: Tween,
    vertical: bool,
}

impl Slide {
    fn start(avatar: &mut Avatar, direction: Direction, events: &mut Events) -> Self {
        avatar.body.stop();
        avatar.play(Anim::Stand);
        avatar.in_pipe = true;
        events.play(crate::game::Sfx::Pipe);

        let (dx, dy) = direction.unit();
        let distance = avatar.body.size.y;
        let vertical = direction.is_vertical();
        let tween = if vertical {
            let y = avatar.body.pos.y;
            Tween::new(y, y + dy * distance, SLIDE_TIME, Ease::CubicOut)
        } else {
            let x = avatar.body.pos.x;
            Tween::new(x, x + dx * distance, SLIDE_TIME, Ease::CubicOut)
        };
        Self { tween, vertical }
    }

    /// Returns true once the slide has finished.
    fn advance(&mut self, avatar: &mut Avatar, dt: f32) -> bool {
        let value = self.tween.update(dt);
        if self.vertical {
            avatar.body.pos.y = value;
        } else {
            avatar.body.pos.x = value;
        }
        self.tween.is_done()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitStep {
    SlideIn,
    FadeOut,
    FadeIn,
    Done,
}

/// A pipe trip in progress.
#[derive(Debug, Clone)]
pub struct PipeTransit {
    step: TransitStep,
    dest: Dest,
    slide: Option<Slide>,
    timer: f32,
}

/// First room, left to right, whose right edge is past `x`.
pub fn room_for<'a>(rooms: &[&'a Room], x: f32) -> Option<&'a Room> {
    rooms.iter().copied().find(|room| x < room.x + room.width)
}

impl PipeTransit {
    pub fn begin(avatar: &mut Avatar, enter: Direction, dest: Dest, events: &mut Events) -> Self {
        log::debug!("Entering pipe heading {:?} towards '{}'", enter, dest.name);
        Self {
            step: TransitStep::SlideIn,
            slide: Some(Slide::start(avatar, enter, events)),
            dest,
            timer: 0.0,
        }
    }

    pub fn step(&self) -> TransitStep {
        self.step
    }

    /// Advance the transit. `rooms` must be sorted by x.
    pub fn update(
        &mut self,
        avatar: &mut Avatar,
        rooms: &[&Room],
        world: &mut World,
        events: &mut Events,
        dt: f32,
    ) -> TransitStep {
        match self.step {
            TransitStep::SlideIn => {
                let finished = self.slide.as_mut().map_or(true, |s| s.advance(avatar, dt));
                if finished {
                    self.slide = None;
                    self.timer = FADE_TIME;
                    events.camera.send(CameraEvent::FadeOut(FADE_TIME));
                    self.step = TransitStep::FadeOut;
                }
            }
            TransitStep::FadeOut => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.arrive(avatar, rooms, world, events);
                }
            }
            TransitStep::FadeIn => {
                self.timer -= dt;
                let slid_out = match self.slide.as_mut() {
                    Some(slide) => slide.advance(avatar, dt),
                    None => true,
                };
                if slid_out && self.timer <= 0.0 {
                    self.slide = None;
                    avatar.in_pipe = false;
                    self.step = TransitStep::Done;
                }
            }
            TransitStep::Done => {}
        }
        self.step
    }

    fn arrive(
        &mut self,
        avatar: &mut Avatar,
        rooms: &[&Room],
        world: &mut World,
        events: &mut Events,
    ) {
        let target = Vec2::new(
            self.dest.x + ARRIVAL_OFFSET_X,
            self.dest.y + avatar.body.size.y / 2.0,
        );
        if let Some(room) = room_for(rooms, target.x) {
            world.bounds = room.rect();
            events.camera.send(CameraEvent::Relocate(room.rect()));
            log::info!("Pipe arrival in room '{}'", room.name);
        }
        avatar.body.set_center(target);
        avatar.in_pipe = false;

        events.camera.send(CameraEvent::FadeIn(FADE_TIME));
        self.timer = FADE_TIME;
        self.slide = self.dest.direction.map(|dir| Slide::start(avatar, dir, events));
        self.step = TransitStep::FadeIn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::SoundEvent;
    use crate::powers::test_support::Harness;
    use crate::level::TileKind;

    const ROWS: &[&str] = &[
        "..........",
        "..........",
        "....[]....",
        "##########",
    ];

    fn pipe_harness() -> Harness {
        let mut h = Harness::new(ROWS);
        for col in [4, 5] {
            let tile = h.map.get_mut(col, 2).unwrap();
            let expected = if col == 4 { TileKind::PipeTopLeft } else { TileKind::PipeTopRight };
            assert_eq!(tile.kind, expected);
            tile.props.dest = Some("under".into());
            tile.props.direction = Some(Direction::Down);
        }
        h
    }

    fn rooms() -> Vec<Room> {
        vec![
            Room { name: "room1".into(), x: 0.0, y: 0.0, width: 160.0, height: 64.0 },
            Room { name: "room2".into(), x: 160.0, y: 0.0, width: 200.0, height: 64.0 },
        ]
    }

    #[test]
    fn test_standing_on_pipe_holding_down_starts_transit() {
        let mut h = pipe_harness();
        h.controls = Controls::holding(&[Action::Down]);
        let mut avatar = Avatar::new(72.0, 24.0);

        let mut ctx = h.ctx();
        let hit = TileHit { col: 4, row: 2, side: Side::Down };
        let handled = EnterPipe::new().collider_world(&mut avatar, &mut ctx, hit);

        assert!(handled);
        let begin = PowerCommand::BeginTransit { enter: Direction::Down, dest: "under".into() };
        assert_eq!(ctx.commands, vec![begin]);
    }

    #[test]
    fn test_wrong_key_or_side_is_ignored() {
        let mut h = pipe_harness();
        let mut avatar = Avatar::new(72.0, 24.0);
        let hit = TileHit { col: 4, row: 2, side: Side::Down };

        h.controls = Controls::holding(&[Action::Right]);
        assert!(!EnterPipe::new().collider_world(&mut avatar, &mut h.ctx(), hit));

        h.controls = Controls::holding(&[Action::Down]);
        let side_hit = TileHit { side: Side::Right, ..hit };
        assert!(!EnterPipe::new().collider_world(&mut avatar, &mut h.ctx(), side_hit));

        // plain ground has no dest
        let ground = TileHit { col: 1, row: 3, side: Side::Down };
        assert!(!EnterPipe::new().collider_world(&mut avatar, &mut h.ctx(), ground));
    }

    #[test]
    fn test_room_for_picks_first_room_reaching_past_x() {
        let rooms = rooms();
        let sorted: Vec<&Room> = rooms.iter().collect();
        assert_eq!(room_for(&sorted, 10.0).map(|r| r.name.as_str()), Some("room1"));
        assert_eq!(room_for(&sorted, 200.0).map(|r| r.name.as_str()), Some("room2"));
        assert!(room_for(&sorted, 500.0).is_none());
    }

    #[test]
    fn test_full_transit() {
        let mut h = Harness::new(ROWS);
        let rooms = rooms();
        let sorted: Vec<&Room> = rooms.iter().collect();
        let mut avatar = Avatar::new(72.0, 24.0);
        let start_y = avatar.body.pos.y;
        let dest = Dest { name: "under".into(), x: 200.0, y: 16.0, direction: None };

        let mut transit = PipeTransit::begin(&mut avatar, Direction::Down, dest, &mut h.events);
        assert!(avatar.in_pipe);
        assert_eq!(h.events.sounds.iter().next(), Some(&SoundEvent::Play(crate::game::Sfx::Pipe)));

        let dt = 1.0 / 60.0;
        let mut steps = 0;
        while transit.step() == TransitStep::SlideIn {
            transit.update(&mut avatar, &sorted, &mut h.world, &mut h.events, dt);
            steps += 1;
            assert!(steps < 100);
        }
        assert!((avatar.body.pos.y - (start_y + avatar.body.size.y)).abs() < 0.01);
        assert!(h.events.camera.iter().any(|e| *e == CameraEvent::FadeOut(FADE_TIME)));

        while transit.step() != TransitStep::Done {
            transit.update(&mut avatar, &sorted, &mut h.world, &mut h.events, dt);
            steps += 1;
            assert!(steps < 200);
        }

        assert_eq!(avatar.center(), Vec2::new(216.0, 16.0 + avatar.body.size.y / 2.0));
        assert_eq!(h.world.bounds, rooms[1].rect());
        assert!(h.events.camera.iter().any(|e| *e == CameraEvent::Relocate(rooms[1].rect())));
        assert!(!avatar.in_pipe);
    }

    #[test]
    fn test_exit_slide_runs_during_fade_in() {
        let mut h = Harness::new(ROWS);
        let rooms = rooms();
        let sorted: Vec<&Room> = rooms.iter().collect();
        let mut avatar = Avatar::new(72.0, 24.0);
        let dest = Dest { name: "out".into(), x: 40.0, y: 16.0, direction: Some(Direction::Up) };

        let mut transit = PipeTransit::begin(&mut avatar, Direction::Down, dest, &mut h.events);
        while transit.step() != TransitStep::FadeIn {
            transit.update(&mut avatar, &sorted, &mut h.world, &mut h.events, 1.0 / 60.0);
        }
        let arrived_y = avatar.body.pos.y;
        assert!(avatar.in_pipe);

        while transit.step() != TransitStep::Done {
            transit.update(&mut avatar, &sorted, &mut h.world, &mut h.events, 1.0 / 60.0);
        }
        assert!((avatar.body.pos.y - (arrived_y - avatar.body.size.y)).abs() < 0.01);
        assert!(!avatar.in_pipe);
        let pipe_cue = SoundEvent::Play(crate::game::Sfx::Pipe);
        let pipe_cues = h.events.sounds.iter().filter(|e| **e == pipe_cue).count();
        assert_eq!(pipe_cues, 2);
    }
}
