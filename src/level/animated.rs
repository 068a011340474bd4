//! Animated tiles
//!
//! Question blocks shimmer through a short frame cycle. Only the frame
//! index lives here; the renderer picks the shade.

/// Seconds each question-block frame is held
const FRAME_TIMES: [f32; 4] = [0.45, 0.15, 0.15, 0.15];

#[derive(Debug, Clone, Default)]
pub struct AnimatedTiles {
    elapsed: f32,
    frame: usize,
}

impl AnimatedTiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        while self.elapsed >= FRAME_TIMES[self.frame] {
            self.elapsed -= FRAME_TIMES[self.frame];
            self.frame = (self.frame + 1) % FRAME_TIMES.len();
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_advance_and_wrap() {
        let mut tiles = AnimatedTiles::new();
        tiles.update(0.3);
        assert_eq!(tiles.frame(), 0);
        tiles.update(0.2);
        assert_eq!(tiles.frame(), 1);
        tiles.update(0.45);
        assert_eq!(tiles.frame(), 0);
    }
}
