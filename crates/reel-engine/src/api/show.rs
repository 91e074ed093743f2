use serde::Serialize;

use crate::api::types::{HapticCue, ShowEvent};
use crate::core::time::Millis;
use crate::input::queue::InputQueue;

/// Runner settings, provided by the show.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowConfig {
    /// Fixed simulation step in milliseconds (default: 10).
    pub step_ms: Millis,
    /// Cap on steps run for one frame, so a stalled tab does not spiral.
    pub max_steps: u32,
    /// Maximum show events per frame (default: 32).
    pub max_events: usize,
    /// Maximum haptic cues per frame (default: 8).
    pub max_haptics: usize,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            step_ms: 10,
            max_steps: 10,
            max_events: 32,
            max_haptics: 8,
        }
    }
}

/// The contract every presentation fulfils.
pub trait Show {
    /// What the web layer draws, serialized to JSON once per frame.
    type View: Serialize;

    /// Return runner configuration. Called once before init.
    fn config(&self) -> ShowConfig {
        ShowConfig::default()
    }

    /// Build acts and mount the first phases.
    fn init(&mut self, ctx: &mut StageContext);

    /// One fixed step. Apply input first, then move every clock by
    /// `ctx.dt_ms()`.
    fn update(&mut self, ctx: &mut StageContext, input: &InputQueue);

    fn view(&self) -> Self::View;

    /// Act the viewer is looking at, mirrored into the buffer header.
    fn focused_act(&self) -> usize {
        0
    }
}

/// Per-frame outbox handed to `Show::init` and `Show::update`.
pub struct StageContext {
    pub events: Vec<ShowEvent>,
    pub haptics: Vec<HapticCue>,
    dt_ms: Millis,
}

impl StageContext {
    pub fn new(dt_ms: Millis) -> Self {
        Self {
            events: Vec::new(),
            haptics: Vec::new(),
            dt_ms,
        }
    }

    /// Length of the current step.
    pub fn dt_ms(&self) -> Millis {
        self.dt_ms
    }

    pub fn emit_event(&mut self, event: ShowEvent) {
        self.events.push(event);
    }

    pub fn emit_haptic(&mut self, cue: HapticCue) {
        self.haptics.push(cue);
    }

    /// Clear per-frame transient data (events, haptics).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        self.haptics.clear();
    }
}

impl Default for StageContext {
    fn default() -> Self {
        Self::new(ShowConfig::default().step_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_frame_data_empties_outbox() {
        let mut ctx = StageContext::default();
        assert_eq!(ctx.dt_ms(), 10);
        ctx.emit_event(ShowEvent::phase_changed(0, 1));
        ctx.emit_haptic(HapticCue(200));
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
        assert!(ctx.haptics.is_empty());
    }
}
