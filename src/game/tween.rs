//! Tweens
//!
//! A `Tween` interpolates one scalar over time with an easing curve. Yoyo
//! plays it forward then back; `repeat` adds extra plays. Anything with
//! several animated properties keeps one tween per property.

use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    QuadOut,
    CubicOut,
    SineOut,
    SineInOut,
}

impl Ease {
    /// Map normalized time `t` in 0..=1 onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => t * (2.0 - t),
            Ease::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Ease::SineOut => (t * PI / 2.0).sin(),
            Ease::SineInOut => -0.5 * ((PI * t).cos() - 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Seconds for one forward pass
    pub duration: f32,
    pub ease: Ease,
    pub yoyo: bool,
    /// Extra plays after the first
    pub repeat: u32,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            ease,
            yoyo: false,
            repeat: 0,
            elapsed: 0.0,
        }
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn repeat(mut self, times: u32) -> Self {
        self.repeat = times;
        self
    }

    fn play_length(&self) -> f32 {
        if self.yoyo { self.duration * 2.0 } else { self.duration }
    }

    pub fn total_duration(&self) -> f32 {
        self.play_length() * (self.repeat + 1) as f32
    }

    /// Advance and return the new value.
    pub fn update(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.total_duration());
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.is_done() {
            return if self.yoyo { self.from } else { self.to };
        }
        let local = self.elapsed % self.play_length();
        let t = if self.yoyo && local > self.duration {
            1.0 - (local - self.duration) / self.duration
        } else {
            local / self.duration
        };
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.total_duration()
    }

    /// Forward progress through the whole tween, 0..=1.
    pub fn progress(&self) -> f32 {
        self.elapsed / self.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_ease_endpoints() {
        for ease in [Ease::Linear, Ease::QuadOut, Ease::CubicOut, Ease::SineOut, Ease::SineInOut] {
            assert!(approx(ease.apply(0.0), 0.0), "{:?}", ease);
            assert!(approx(ease.apply(1.0), 1.0), "{:?}", ease);
        }
        // out curves run ahead of linear
        assert!(Ease::CubicOut.apply(0.3) > 0.3);
    }

    #[test]
    fn test_linear_tween_reaches_target() {
        let mut tween = Tween::new(0.0, 10.0, 1.0, Ease::Linear);
        assert!(approx(tween.update(0.5), 5.0));
        assert!(approx(tween.update(0.6), 10.0));
        assert!(tween.is_done());
    }

    #[test]
    fn test_yoyo_returns_to_start() {
        let mut tween = Tween::new(1.0, 1.15, 0.12, Ease::Linear).yoyo();
        assert!(approx(tween.update(0.12), 1.15));
        assert!(!tween.is_done());
        tween.update(0.12);
        assert!(tween.is_done());
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn test_repeat_extends_duration() {
        let tween = Tween::new(0.6, 1.0, 0.1, Ease::Linear).yoyo().repeat(6);
        assert!(approx(tween.total_duration(), 1.4));
    }
}
