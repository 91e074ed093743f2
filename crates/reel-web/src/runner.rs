use reel_engine::bridge::protocol::{
    EVENT_FLOATS, HEADER_EVENT_COUNT, HEADER_FOCUSED_ACT, HEADER_FRAME_COUNTER, HEADER_HAPTIC_COUNT,
    HEADER_VIEW_REVISION,
};
use reel_engine::{
    FixedTimestep, InputEvent, InputQueue, ProtocolLayout, Show, ShowConfig, StageContext,
};

/// Generic show runner that wires up the frame loop.
///
/// Each concrete show creates a `thread_local!` ShowRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct ShowRunner<S: Show> {
    show: S,
    ctx: StageContext,
    input: InputQueue,
    /// Empty queue handed to every step after the first one of a frame.
    idle: InputQueue,
    timestep: FixedTimestep,
    config: ShowConfig,
    layout: ProtocolLayout,
    buffer: Vec<f32>,
    view_json: String,
    view_revision: u32,
    frame: u32,
    initialized: bool,
}

impl<S: Show> ShowRunner<S> {
    pub fn new(show: S) -> Self {
        let config = show.config();
        let timestep = FixedTimestep::new(config.step_ms).with_max_steps(config.max_steps);
        let layout = ProtocolLayout::from_config(&config);
        let buffer = layout.new_buffer();

        Self {
            show,
            ctx: StageContext::new(config.step_ms),
            input: InputQueue::new(),
            idle: InputQueue::new(),
            timestep,
            config,
            layout,
            buffer,
            view_json: String::new(),
            view_revision: 0,
            frame: 0,
            initialized: false,
        }
    }

    /// Initialize the show. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.show.config();
        self.timestep = FixedTimestep::new(self.config.step_ms).with_max_steps(self.config.max_steps);
        self.layout = ProtocolLayout::from_config(&self.config);
        self.buffer = self.layout.new_buffer();
        self.ctx = StageContext::new(self.config.step_ms);

        self.show.init(&mut self.ctx);
        self.initialized = true;
        self.pack();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: step the show, pack the buffer, refresh the view.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        // Input waits for the next frame that actually steps.
        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            self.show.update(&mut self.ctx, &self.input);
            self.input.drain();
            for _ in 1..steps {
                self.show.update(&mut self.ctx, &self.idle);
            }
            self.frame = self.frame.wrapping_add(1);
        }

        self.pack();
    }

    /// Write events, haptics and header counters into the shared buffer,
    /// then re-serialize the view.
    fn pack(&mut self) {
        let events = self.ctx.events.len().min(self.layout.max_events);
        if self.ctx.events.len() > events {
            log::warn!(
                "dropping {} show events over capacity {}",
                self.ctx.events.len() - events,
                self.layout.max_events
            );
        }
        let haptics = self.ctx.haptics.len().min(self.layout.max_haptics);

        let start = self.layout.event_data_offset;
        for (slot, event) in self.buffer[start..start + events * EVENT_FLOATS]
            .chunks_exact_mut(EVENT_FLOATS)
            .zip(&self.ctx.events)
        {
            slot.copy_from_slice(&[event.kind, event.a, event.b, event.c]);
        }

        let start = self.layout.haptic_data_offset;
        for (slot, cue) in self.buffer[start..start + haptics]
            .iter_mut()
            .zip(&self.ctx.haptics)
        {
            *slot = cue.0 as f32;
        }

        match serde_json::to_string(&self.show.view()) {
            Ok(json) => {
                if json != self.view_json {
                    self.view_json = json;
                    self.view_revision = self.view_revision.wrapping_add(1);
                }
            }
            Err(e) => log::error!("failed to serialize view: {e}"),
        }

        self.buffer[HEADER_FRAME_COUNTER] = self.frame as f32;
        self.buffer[HEADER_EVENT_COUNT] = events as f32;
        self.buffer[HEADER_HAPTIC_COUNT] = haptics as f32;
        self.buffer[HEADER_FOCUSED_ACT] = self.show.focused_act() as f32;
        self.buffer[HEADER_VIEW_REVISION] = self.view_revision as f32;
    }

    // ---- Accessors for SharedArrayBuffer reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn event_count(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn haptic_count(&self) -> u32 {
        self.ctx.haptics.len().min(self.layout.max_haptics) as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn max_haptics(&self) -> u32 {
        self.layout.max_haptics as u32
    }

    pub fn view_json(&self) -> &str {
        &self.view_json
    }

    pub fn view_revision(&self) -> u32 {
        self.view_revision
    }

    pub fn show(&self) -> &S {
        &self.show
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_engine::bridge::protocol::HEADER_MAX_EVENTS;
    use reel_engine::{HapticCue, ShowEvent};
    use serde::Serialize;

    #[derive(Serialize)]
    struct CounterView {
        steps: u32,
        presses: u32,
    }

    /// Counts steps and key presses; emits one event per press.
    #[derive(Default)]
    struct CounterShow {
        steps: u32,
        presses: u32,
    }

    impl Show for CounterShow {
        type View = CounterView;

        fn config(&self) -> ShowConfig {
            ShowConfig {
                max_events: 2,
                max_haptics: 1,
                ..ShowConfig::default()
            }
        }

        fn init(&mut self, _ctx: &mut StageContext) {}

        fn update(&mut self, ctx: &mut StageContext, input: &InputQueue) {
            self.steps += 1;
            for event in input.iter() {
                if let InputEvent::KeyDown { .. } = event {
                    self.presses += 1;
                    ctx.emit_event(ShowEvent::phase_complete(0, self.presses as usize));
                    ctx.emit_haptic(HapticCue(50));
                }
            }
        }

        fn view(&self) -> CounterView {
            CounterView {
                steps: self.steps,
                presses: self.presses,
            }
        }

        fn focused_act(&self) -> usize {
            2
        }
    }

    fn runner() -> ShowRunner<CounterShow> {
        let mut runner = ShowRunner::new(CounterShow::default());
        runner.init();
        runner
    }

    #[test]
    fn input_applies_once_per_frame() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: 13 });
        r.tick(0.030);
        assert_eq!(r.show().steps, 3);
        assert_eq!(r.show().presses, 1);
        assert_eq!(r.event_count(), 1);
        assert_eq!(r.view_json(), r#"{"steps":3,"presses":1}"#);
    }

    #[test]
    fn input_waits_for_a_stepping_frame() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: 13 });
        r.tick(0.004);
        assert_eq!(r.show().presses, 0);
        r.tick(0.006);
        assert_eq!(r.show().presses, 1);
    }

    #[test]
    fn packs_header_and_caps_events() {
        let mut r = runner();
        for _ in 0..3 {
            r.push_input(InputEvent::KeyDown { key_code: 32 });
        }
        r.tick(0.010);
        let buf = r.buffer();
        assert_eq!(buf[HEADER_MAX_EVENTS], 2.0);
        assert_eq!(buf[HEADER_EVENT_COUNT], 2.0);
        assert_eq!(buf[HEADER_HAPTIC_COUNT], 1.0);
        assert_eq!(buf[HEADER_FOCUSED_ACT], 2.0);
        assert_eq!(buf[HEADER_FRAME_COUNTER], 1.0);

        let off = r.layout.event_data_offset;
        assert_eq!(&buf[off..off + 4], &[ShowEvent::PHASE_COMPLETE, 0.0, 1.0, 0.0]);
        assert_eq!(buf[r.layout.haptic_data_offset], 50.0);
    }

    #[test]
    fn view_revision_tracks_changes() {
        let mut r = runner();
        let after_init = r.view_revision();
        r.tick(0.010);
        assert_eq!(r.view_revision(), after_init + 1);
        r.tick(0.0);
        assert_eq!(r.view_revision(), after_init + 1);
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut r = ShowRunner::new(CounterShow::default());
        r.tick(0.050);
        assert_eq!(r.show().steps, 0);
        assert!(r.view_json().is_empty());
    }
}
