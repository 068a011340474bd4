//! Level clock
//!
//! Counts whole seconds down to zero, reporting each tick so the HUD can
//! show it, and reporting once more when time runs out.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds left after this tick
    Interval(u32),
    End,
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    remaining: u32,
    /// Time since the last whole second
    accum: f32,
    running: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the clock from `seconds`.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.accum = 0.0;
        self.running = seconds > 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn update(&mut self, dt: f32) -> Vec<Tick> {
        let mut ticks = Vec::new();
        if !self.running {
            return ticks;
        }
        self.accum += dt;
        while self.accum >= 1.0 && self.running {
            self.accum -= 1.0;
            self.remaining = self.remaining.saturating_sub(1);
            ticks.push(Tick::Interval(self.remaining));
            if self.remaining == 0 {
                self.running = false;
                ticks.push(Tick::End);
            }
        }
        ticks
    }
}
