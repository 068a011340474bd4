//! Arcade physics body
//!
//! Axis-aligned box with velocity, acceleration, drag and optional gravity.
//! Position is the top-left corner; sprites are drawn around `center()`.

use macroquad::prelude::{Rect, Vec2};

/// Which sides of a body are in contact with something this step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faces {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    pub const NONE: Faces = Faces { up: false, down: false, left: false, right: false };

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_velocity: Vec2,
    /// Horizontal deceleration applied while there is no horizontal acceleration
    pub drag_x: f32,
    pub allow_gravity: bool,
    /// Fraction of vertical speed kept when landing (1.0 = perfect bounce)
    pub bounce_y: f32,
    /// Contacts with solid tiles
    pub blocked: Faces,
    /// Contacts with other bodies (set by overlap checks)
    pub touching: Faces,
    /// Off while dying: the body falls through everything
    pub check_collision: bool,
    /// Disabled bodies neither move nor collide
    pub enabled: bool,
    pub(crate) prev_pos: Vec2,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let pos = Vec2::new(x, y);
        Self {
            pos,
            size: Vec2::new(width, height),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            max_velocity: Vec2::splat(10_000.0),
            drag_x: 0.0,
            allow_gravity: true,
            bounce_y: 0.0,
            blocked: Faces::NONE,
            touching: Faces::NONE,
            check_collision: true,
            enabled: true,
            prev_pos: pos,
        }
    }

    /// Body whose center sits at `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Body standing with its bottom edge at `bottom`, centered on `cx`.
    pub fn standing(cx: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, bottom - height, width, height)
    }

    pub fn left(&self) -> f32 { self.pos.x }
    pub fn right(&self) -> f32 { self.pos.x + self.size.x }
    pub fn top(&self) -> f32 { self.pos.y }
    pub fn bottom(&self) -> f32 { self.pos.y + self.size.y }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size / 2.0;
        self.prev_pos = self.pos;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub(crate) fn prev_bottom(&self) -> f32 {
        self.prev_pos.y + self.size.y
    }

    pub(crate) fn prev_top(&self) -> f32 {
        self.prev_pos.y
    }

    /// Resize while keeping the feet where they are.
    pub fn resize_keep_bottom(&mut self, width: f32, height: f32) {
        let bottom = self.bottom();
        let cx = self.center().x;
        self.size = Vec2::new(width, height);
        self.pos = Vec2::new(cx - width / 2.0, bottom - height);
        self.prev_pos = self.pos;
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }

    /// Switch the body off entirely (pooled objects).
    pub fn disable(&mut self) {
        self.stop();
        self.enabled = false;
    }
}
