use std::time::Instant;

/// Measures the time between successive frames.
///
/// The first tick reports zero. Later ticks report the elapsed seconds since
/// the previous tick, never negative, optionally capped so a stalled window
/// does not fling everything forward in one step.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose deltas never exceed `max_delta` seconds.
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last: None,
            max_delta: (max_delta.is_finite() && max_delta > 0.0).then_some(max_delta),
        }
    }

    pub fn max_delta(&self) -> Option<f32> {
        self.max_delta
    }

    /// Record a frame at `now` and return the delta since the previous one.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        match self.max_delta {
            Some(cap) => delta.min(cap),
            None => delta,
        }
    }
}

/// Coerce a caller-supplied delta into the non-negative finite range.
pub fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        0.0
    }
}
