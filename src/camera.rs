//! Side-scrolling camera
//!
//! Eases towards the player once they leave a deadzone in the middle of
//! the view, and never shows anything outside the current room. Also owns
//! the full-screen fade used by pipe transits.

use macroquad::prelude::{Rect, Vec2};
use crate::game::tween::{Ease, Tween};
use crate::game::CameraEvent;

const LERP: f32 = 0.1;
const DEADZONE: Vec2 = Vec2::new(120.0, 60.0);

#[derive(Debug, Clone)]
pub struct Camera {
    /// Top-left of the view in world pixels
    pub scroll: Vec2,
    canvas: Vec2,
    zoom: f32,
    bounds: Rect,
    /// Jump straight to the target on the next follow
    snap: bool,
    fade: Option<Tween>,
    /// Fade amount once any tween has finished
    fade_rest: f32,
}

impl Camera {
    pub fn new(canvas: Vec2, bounds: Rect) -> Self {
        Self {
            scroll: Vec2::ZERO,
            canvas,
            zoom: 1.0,
            bounds,
            snap: true,
            fade: None,
            fade_rest: 0.0,
        }
    }

    pub fn view_size(&self) -> Vec2 {
        self.canvas / self.zoom
    }

    pub fn view(&self) -> Rect {
        let size = self.view_size();
        Rect::new(self.scroll.x, self.scroll.y, size.x, size.y)
    }

    /// Scroll as drawn. Rounded so tiles stay on whole pixels.
    pub fn pixel_scroll(&self) -> Vec2 {
        self.scroll.round()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
            self.clamp();
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn resize(&mut self, canvas: Vec2) {
        self.canvas = canvas;
        self.clamp();
    }

    /// Center on `target` at the next follow instead of easing.
    pub fn snap_next(&mut self) {
        self.snap = true;
    }

    pub fn follow(&mut self, target: Vec2) {
        let view = self.view_size();
        if self.snap {
            self.snap = false;
            self.scroll = target - view / 2.0;
            self.clamp();
            return;
        }

        let mid = self.scroll + view / 2.0;
        let half = DEADZONE / 2.0;
        let mut desired = self.scroll;
        if target.x < mid.x - half.x {
            desired.x = target.x + half.x - view.x / 2.0;
        } else if target.x > mid.x + half.x {
            desired.x = target.x - half.x - view.x / 2.0;
        }
        if target.y < mid.y - half.y {
            desired.y = target.y + half.y - view.y / 2.0;
        } else if target.y > mid.y + half.y {
            desired.y = target.y - half.y - view.y / 2.0;
        }

        self.scroll += (desired - self.scroll) * LERP;
        self.clamp();
    }

    fn clamp(&mut self) {
        let view = self.view_size();
        self.scroll.x = clamp_axis(self.scroll.x, self.bounds.x, self.bounds.w, view.x);
        self.scroll.y = clamp_axis(self.scroll.y, self.bounds.y, self.bounds.h, view.y);
    }

    pub fn apply(&mut self, event: CameraEvent) {
        match event {
            CameraEvent::FadeOut(secs) => self.fade_to(1.0, secs),
            CameraEvent::FadeIn(secs) => self.fade_to(0.0, secs),
            CameraEvent::Relocate(bounds) => {
                self.bounds = bounds;
                self.snap_next();
            }
        }
    }

    fn fade_to(&mut self, target: f32, secs: f32) {
        let from = self.fade_amount();
        self.fade = Some(Tween::new(from, target, secs, Ease::Linear));
        self.fade_rest = target;
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(fade) = self.fade.as_mut() {
            fade.update(dt);
            if fade.is_done() {
                self.fade = None;
            }
        }
    }

    /// Opacity of the black fade overlay, 0..=1.
    pub fn fade_amount(&self) -> f32 {
        self.fade.map_or(self.fade_rest, |t| t.value())
    }
}

/// Keep a span of `view` inside `start..start + len`. Rooms narrower
/// than the view are centered.
fn clamp_axis(scroll: f32, start: f32, len: f32, view: f32) -> f32 {
    if len <= view {
        start + (len - view) / 2.0
    } else {
        scroll.clamp(start, start + len - view)
    }
}
