//! Buffered video playback.
//!
//! The machine never touches a media element. It consumes the element's
//! notifications and exposes `should_play`; the web layer issues the play
//! request and reports back if the browser rejects it.

use serde::{Deserialize, Serialize};

use super::{MediaEvent, PhaseInput, PhaseMachine, PhaseRuntime, PhaseView};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Seconds that must be buffered before playback starts.
    pub buffer_threshold_secs: f32,
    /// A looping video never ends, so it never completes the phase.
    pub looping: bool,
    pub muted: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            buffer_threshold_secs: 5.0,
            looping: true,
            muted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoState {
    Loading,
    Buffering,
    Playing,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoView {
    pub source: String,
    pub state: VideoState,
    /// Buffered share of the duration, 0..=100.
    pub buffer_progress: f32,
    pub looping: bool,
    pub muted: bool,
    pub should_play: bool,
}

/// Video playback runs no timers of its own.
#[derive(Debug)]
pub enum VideoTimer {}

pub struct VideoPlayback {
    source: String,
    config: VideoConfig,
    runtime: PhaseRuntime<VideoTimer>,
    state: VideoState,
    buffer_progress: f32,
}

impl VideoPlayback {
    pub fn new(source: String, config: VideoConfig) -> Self {
        Self {
            source,
            config,
            runtime: PhaseRuntime::new(),
            state: VideoState::Loading,
            buffer_progress: 0.0,
        }
    }

    pub fn state(&self) -> VideoState {
        self.state
    }

    pub fn buffer_progress(&self) -> f32 {
        self.buffer_progress
    }

    fn waiting_for_data(&self) -> bool {
        matches!(self.state, VideoState::Loading | VideoState::Buffering)
    }

    fn on_progress(&mut self, buffered_end: f32, duration: f32) {
        if !buffered_end.is_finite() {
            return;
        }
        let known_duration = duration.is_finite() && duration > 0.0;
        if known_duration {
            self.buffer_progress = (buffered_end / duration * 100.0).clamp(0.0, 100.0);
        }
        if !self.waiting_for_data() {
            return;
        }
        let enough = buffered_end >= self.config.buffer_threshold_secs
            || (known_duration && buffered_end >= duration);
        self.state = if enough {
            VideoState::Playing
        } else {
            VideoState::Buffering
        };
    }

    fn fail(&mut self, reason: &str) {
        log::warn!("VideoPlayback: {} ({})", reason, self.source);
        self.state = VideoState::Error;
    }

    fn on_media(&mut self, event: MediaEvent) {
        if self.state == VideoState::Error {
            return;
        }
        match event {
            MediaEvent::Progress {
                buffered_end,
                duration,
            } => self.on_progress(buffered_end, duration),
            MediaEvent::CanPlayThrough => {
                if self.waiting_for_data() {
                    self.state = VideoState::Playing;
                }
            }
            MediaEvent::Waiting => {
                if self.state == VideoState::Playing {
                    self.state = VideoState::Buffering;
                }
            }
            MediaEvent::Playing => {
                if self.waiting_for_data() {
                    self.state = VideoState::Playing;
                }
            }
            MediaEvent::Ended => {
                if !self.config.looping {
                    self.runtime.complete(0);
                }
            }
            MediaEvent::Failed => self.fail("media failed to load"),
            MediaEvent::PlayRejected => self.fail("play request rejected"),
        }
    }
}

impl PhaseMachine for VideoPlayback {
    type Timer = VideoTimer;

    fn runtime(&self) -> &PhaseRuntime<VideoTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<VideoTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        self.runtime.begin();
    }

    fn on_timer(&mut self, timer: VideoTimer) {
        match timer {}
    }

    fn handle(&mut self, input: &PhaseInput) {
        if let PhaseInput::Media(event) = input {
            self.on_media(*event);
        }
    }

    fn view(&self) -> PhaseView {
        PhaseView::Video(VideoView {
            source: self.source.clone(),
            state: self.state,
            buffer_progress: self.buffer_progress,
            looping: self.config.looping,
            muted: self.config.muted,
            should_play: self.state == VideoState::Playing,
        })
    }
}
