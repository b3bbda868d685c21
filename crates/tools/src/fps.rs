use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames-per-second over a sliding window, plus the last frame time.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    frames: VecDeque<Instant>,
    last_frame: Duration,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            frames: VecDeque::new(),
            last_frame: Duration::ZERO,
        }
    }

    /// Record a frame presented at `now`.
    pub fn frame(&mut self, now: Instant) {
        if let Some(prev) = self.frames.back() {
            self.last_frame = now.saturating_duration_since(*prev);
        }
        self.frames.push_back(now);
        while let Some(first) = self.frames.front() {
            if now.saturating_duration_since(*first) > self.window {
                self.frames.pop_front();
            } else {
                break;
            }
        }
    }

    /// Frames per second over the window. Zero until two frames are seen.
    pub fn fps(&self) -> f32 {
        let (Some(first), Some(last)) = (self.frames.front(), self.frames.back()) else {
            return 0.0;
        };
        let span = last.saturating_duration_since(*first).as_secs_f32();
        if span <= 0.0 {
            return 0.0;
        }
        (self.frames.len() - 1) as f32 / span
    }

    pub fn frame_ms(&self) -> f32 {
        self.last_frame.as_secs_f32() * 1000.0
    }
}
