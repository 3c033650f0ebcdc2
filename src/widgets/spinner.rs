use std::time::{Duration, Instant};

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const ASCII_FRAMES: &[&str] = &["|", "/", "-", "\\"];

/// Busy indicator advanced by the UI loop
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    frame_index: usize,
    last_update: Instant,
    speed: Duration,
}

impl Spinner {
    pub fn new(use_glyphs: bool) -> Self {
        let (frames, speed_ms) = if use_glyphs {
            (BRAILLE_FRAMES, 80)
        } else {
            (ASCII_FRAMES, 100)
        };
        Self {
            frames,
            frame_index: 0,
            last_update: Instant::now(),
            speed: Duration::from_millis(speed_ms),
        }
    }

    /// Advance if enough time has passed and return the frame to draw
    pub fn tick(&mut self) -> &'static str {
        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.speed {
            self.frame_index = (self.frame_index + 1) % self.frames.len();
            self.last_update = now;
        }
        self.frames[self.frame_index]
    }

    pub fn current_frame(&self) -> &'static str {
        self.frames[self.frame_index]
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.last_update = Instant::now();
    }
}
