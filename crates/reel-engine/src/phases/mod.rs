//! Phase state machines.
//!
//! Every phase owns a [`PhaseRuntime`]: a private scheduler, the completion
//! guard and the parent's completion callback. The machine reacts to its own
//! timers and to routed input, and renders a [`PhaseView`] that is a pure
//! function of its state. Mounting builds a fresh machine; navigating away
//! tears it down, cancelling every pending timer so nothing fires late.

pub mod boot;
pub mod briefing;
pub mod cipher;
pub mod countdown;
pub mod explainer;
pub mod intel;
pub mod proposal;
pub mod scan;
pub mod video;

use serde::{Deserialize, Serialize};

use crate::api::types::HapticCue;
use crate::config::script::{PhaseMeta, ShowScript};
use crate::core::guard::CompletionGuard;
use crate::core::scheduler::{Scheduler, TimerId};
use crate::core::time::Millis;
use crate::effects::rng::Rng;

pub use boot::{BootConfig, BootSequence, BootView};
pub use briefing::{BriefConfig, BriefStage, BriefView, MissionBrief};
pub use cipher::{
    evaluate_guess, CipherConfig, CipherLevel, CipherSimulation, CipherStage, CipherView,
    LetterCell, TileState,
};
pub use countdown::{Countdown, CountdownConfig, CountdownView};
pub use explainer::{ExplainerConfig, ExplainerItem, ExplainerView, GameExplainer};
pub use intel::{IntelBriefing, IntelConfig, IntelLineView, IntelStage, IntelView};
pub use proposal::{CertificateText, ProposalConfig, ProposalReveal, ProposalStage, ProposalView};
pub use scan::{BiometricScan, ScanConfig, ScanState, ScanView};
pub use video::{VideoConfig, VideoPlayback, VideoState, VideoView};

/// Which state machine a phase mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Boot,
    Scan,
    Brief,
    Countdown,
    Explainer,
    Video,
    Intel,
    Cipher,
    Proposal,
}

/// Media element notifications forwarded by the web layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Buffered range end and total duration, both in seconds.
    Progress { buffered_end: f32, duration: f32 },
    CanPlayThrough,
    Waiting,
    Playing,
    Ended,
    /// The element reported a load or decode error.
    Failed,
    /// The browser refused the play request.
    PlayRejected,
}

impl MediaEvent {
    /// Decode the numeric form the web layer sends. Unknown codes yield `None`.
    pub fn from_code(code: u32, buffered_end: f32, duration: f32) -> Option<Self> {
        Some(match code {
            0 => MediaEvent::Progress {
                buffered_end,
                duration,
            },
            1 => MediaEvent::CanPlayThrough,
            2 => MediaEvent::Waiting,
            3 => MediaEvent::Playing,
            4 => MediaEvent::Ended,
            5 => MediaEvent::Failed,
            6 => MediaEvent::PlayRejected,
            _ => return None,
        })
    }
}

/// Input routed to the mounted phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseInput {
    /// Pointer or touch held down on the phase.
    Press,
    /// Pointer or touch released, or left the target.
    Release,
    /// The phase's primary button.
    Activate,
    Media(MediaEvent),
}

/// Serializable description of what the mounted phase shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseView {
    Boot(BootView),
    Scan(ScanView),
    Brief(BriefView),
    Countdown(CountdownView),
    Explainer(ExplainerView),
    Video(VideoView),
    Intel(IntelView),
    Cipher(CipherView),
    Proposal(ProposalView),
}

/// Queue entry: either a machine timer or the delayed completion signal.
#[derive(Debug)]
enum Slot<T> {
    Phase(T),
    Release,
}

/// Per-instance timers and completion bookkeeping shared by every machine.
pub struct PhaseRuntime<T> {
    scheduler: Scheduler<Slot<T>>,
    guard: CompletionGuard,
    on_complete: Option<Box<dyn FnMut()>>,
    started: bool,
    signalled: bool,
    torn_down: bool,
    cues: Vec<HapticCue>,
}

impl<T> Default for PhaseRuntime<T> {
    fn default() -> Self {
        Self {
            scheduler: Scheduler::new(),
            guard: CompletionGuard::new(),
            on_complete: None,
            started: false,
            signalled: false,
            torn_down: false,
            cues: Vec::new(),
        }
    }
}

impl<T> PhaseRuntime<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the machine started. Returns `false` if it already was, or if it
    /// has been torn down.
    pub fn begin(&mut self) -> bool {
        if self.started || self.torn_down {
            return false;
        }
        self.started = true;
        true
    }

    /// Current time on this instance's clock, in ms since mount.
    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn schedule(&mut self, delay: Millis, timer: T) -> TimerId {
        self.scheduler.schedule(delay, Slot::Phase(timer))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Cancel the timer held in `slot`, if any, and clear the slot.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerId>) -> bool {
        match slot.take() {
            Some(id) => self.cancel(id),
            None => false,
        }
    }

    pub fn advance(&mut self, dt: Millis) {
        if !self.torn_down {
            self.scheduler.advance(dt);
        }
    }

    /// Next due machine timer. Delayed completion signals are delivered here
    /// on the way past, so the caller only ever sees its own timers.
    pub fn next_timer(&mut self) -> Option<T> {
        loop {
            if self.torn_down {
                return None;
            }
            match self.scheduler.next_due()? {
                Slot::Phase(timer) => return Some(timer),
                Slot::Release => self.signal(),
            }
        }
    }

    /// Enter the completed state. The first call latches the guard and
    /// arranges for the parent callback to run after `hold` ms (0 runs it
    /// immediately); later calls do nothing and return `false`.
    pub fn complete(&mut self, hold: Millis) -> bool {
        if self.torn_down || !self.guard.try_complete() {
            return false;
        }
        log::debug!("phase complete at {}ms, hold {}ms", self.now(), hold);
        if hold == 0 {
            self.signal();
        } else {
            self.scheduler.schedule(hold, Slot::Release);
        }
        true
    }

    fn signal(&mut self) {
        if self.signalled || self.torn_down {
            return;
        }
        self.signalled = true;
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    /// Cancel everything. No timer fires and no callback runs afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let pending = self.scheduler.cancel_all();
        if pending > 0 {
            log::debug!("phase torn down with {} pending timers", pending);
        }
    }

    pub fn set_on_complete(&mut self, callback: Box<dyn FnMut()>) {
        self.on_complete = Some(callback);
    }

    /// Whether the machine reached its completed state.
    pub fn is_complete(&self) -> bool {
        self.guard.is_latched()
    }

    /// Whether the parent callback has run.
    pub fn has_signalled(&self) -> bool {
        self.signalled
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn emit_haptic(&mut self, cue: HapticCue) {
        self.cues.push(cue);
    }

    pub fn drain_cues(&mut self) -> Vec<HapticCue> {
        std::mem::take(&mut self.cues)
    }
}

/// Contract shared by every phase.
pub trait PhaseMachine {
    /// The machine's private timer events.
    type Timer;

    fn runtime(&self) -> &PhaseRuntime<Self::Timer>;
    fn runtime_mut(&mut self) -> &mut PhaseRuntime<Self::Timer>;

    /// Enter the running state and schedule the first timeline.
    fn start(&mut self);

    /// React to one due timer.
    fn on_timer(&mut self, timer: Self::Timer);

    /// React to routed input. Most phases ignore it.
    fn handle(&mut self, _input: &PhaseInput) {}

    fn view(&self) -> PhaseView;

    /// Move this instance's clock forward, firing due timers one at a time.
    fn advance(&mut self, dt: Millis) {
        self.runtime_mut().advance(dt);
        while let Some(timer) = self.runtime_mut().next_timer() {
            self.on_timer(timer);
        }
    }

    fn teardown(&mut self) {
        self.runtime_mut().teardown();
    }

    fn is_complete(&self) -> bool {
        self.runtime().is_complete()
    }

    fn set_on_complete(&mut self, callback: Box<dyn FnMut()>) {
        self.runtime_mut().set_on_complete(callback);
    }

    fn drain_cues(&mut self) -> Vec<HapticCue> {
        self.runtime_mut().drain_cues()
    }
}

/// The one mounted phase of an act.
pub enum ActivePhase {
    Boot(BootSequence),
    Scan(BiometricScan),
    Brief(MissionBrief),
    Countdown(Countdown),
    Explainer(GameExplainer),
    Video(VideoPlayback),
    Intel(IntelBriefing),
    Cipher(CipherSimulation),
    Proposal(ProposalReveal),
}

macro_rules! dispatch {
    ($self:expr, $phase:ident => $body:expr) => {
        match $self {
            ActivePhase::Boot($phase) => $body,
            ActivePhase::Scan($phase) => $body,
            ActivePhase::Brief($phase) => $body,
            ActivePhase::Countdown($phase) => $body,
            ActivePhase::Explainer($phase) => $body,
            ActivePhase::Video($phase) => $body,
            ActivePhase::Intel($phase) => $body,
            ActivePhase::Cipher($phase) => $body,
            ActivePhase::Proposal($phase) => $body,
        }
    };
}

impl ActivePhase {
    /// Build the machine for `meta` from the script's settings. The machine
    /// is not started; attach a completion callback first.
    pub fn build(meta: &PhaseMeta, script: &ShowScript, rng: &mut Rng) -> Self {
        match meta.kind {
            PhaseKind::Boot => ActivePhase::Boot(BootSequence::new(script.boot.clone())),
            PhaseKind::Scan => ActivePhase::Scan(BiometricScan::new(script.scan.clone())),
            PhaseKind::Brief => ActivePhase::Brief(MissionBrief::new(script.brief.clone())),
            PhaseKind::Countdown => {
                ActivePhase::Countdown(Countdown::new(script.countdown.clone()))
            }
            PhaseKind::Explainer => {
                ActivePhase::Explainer(GameExplainer::new(script.explainer.clone()))
            }
            PhaseKind::Video => ActivePhase::Video(VideoPlayback::new(
                meta.media.clone().unwrap_or_default(),
                script.video.clone(),
            )),
            PhaseKind::Intel => {
                ActivePhase::Intel(IntelBriefing::new(script.intel.clone(), rng.fork()))
            }
            PhaseKind::Cipher => {
                ActivePhase::Cipher(CipherSimulation::new(script.cipher.clone()))
            }
            PhaseKind::Proposal => {
                ActivePhase::Proposal(ProposalReveal::new(script.proposal.clone()))
            }
        }
    }

    /// Build, attach the callback and start in one go.
    pub fn mount(
        meta: &PhaseMeta,
        script: &ShowScript,
        rng: &mut Rng,
        on_complete: Box<dyn FnMut()>,
    ) -> Self {
        let mut phase = Self::build(meta, script, rng);
        phase.set_on_complete(on_complete);
        phase.start();
        log::debug!("mounted {:?} phase {:?}", meta.kind, meta.id);
        phase
    }

    pub fn kind(&self) -> PhaseKind {
        match self {
            ActivePhase::Boot(_) => PhaseKind::Boot,
            ActivePhase::Scan(_) => PhaseKind::Scan,
            ActivePhase::Brief(_) => PhaseKind::Brief,
            ActivePhase::Countdown(_) => PhaseKind::Countdown,
            ActivePhase::Explainer(_) => PhaseKind::Explainer,
            ActivePhase::Video(_) => PhaseKind::Video,
            ActivePhase::Intel(_) => PhaseKind::Intel,
            ActivePhase::Cipher(_) => PhaseKind::Cipher,
            ActivePhase::Proposal(_) => PhaseKind::Proposal,
        }
    }

    pub fn start(&mut self) {
        dispatch!(self, p => p.start())
    }

    pub fn advance(&mut self, dt: Millis) {
        dispatch!(self, p => p.advance(dt))
    }

    pub fn handle(&mut self, input: &PhaseInput) {
        dispatch!(self, p => p.handle(input))
    }

    pub fn view(&self) -> PhaseView {
        dispatch!(self, p => p.view())
    }

    pub fn teardown(&mut self) {
        dispatch!(self, p => p.teardown())
    }

    pub fn is_complete(&self) -> bool {
        dispatch!(self, p => p.is_complete())
    }

    pub fn set_on_complete(&mut self, callback: Box<dyn FnMut()>) {
        dispatch!(self, p => p.set_on_complete(callback))
    }

    pub fn drain_cues(&mut self) -> Vec<HapticCue> {
        dispatch!(self, p => p.drain_cues())
    }
}
