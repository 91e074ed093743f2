//! Intel briefing: typed header, auto-start, then line-by-line decryption.

use serde::{Deserialize, Serialize};

use super::{PhaseMachine, PhaseRuntime, PhaseView};
use crate::core::time::Millis;
use crate::effects::rng::Rng;
use crate::timeline::decrypt::{DecryptLine, DecryptStep, DEFAULT_DECOY_GLYPHS};
use crate::timeline::typewriter::{TypeStep, Typewriter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelConfig {
    pub priority: String,
    pub header: String,
    pub subject: String,
    pub status: String,
    pub body: String,
    pub lines: Vec<String>,
    pub header_char_ms: Millis,
    /// Wait after the header is typed before decryption begins.
    pub auto_start_ms: Millis,
    pub decrypt_ms: Millis,
    pub decrypt_interval_ms: Millis,
    /// Gap between one line resolving and the next starting.
    pub line_gap_ms: Millis,
    /// Wait after the last line before the completed view.
    pub final_hold_ms: Millis,
    /// Hold on the completed view before the parent is told.
    pub complete_hold_ms: Millis,
    pub decoy_glyphs: String,
}

impl Default for IntelConfig {
    fn default() -> Self {
        Self {
            priority: "PRIORITY: ALPHA".to_string(),
            header: "INCOMING TRANSMISSION".to_string(),
            subject: "DINN".to_string(),
            status: "SIGNAL SECURED".to_string(),
            body: "Agent, a final transmission has been intercepted.\nDecryption is required to read it.".to_string(),
            lines: vec![
                "ESTABLISHING SECURE LINK...".to_string(),
                "VERIFYING AGENT IDENTITY...".to_string(),
                "ACCESS GRANTED".to_string(),
                "ONE MESSAGE REMAINS".to_string(),
            ],
            header_char_ms: 50,
            auto_start_ms: 2000,
            decrypt_ms: 1500,
            decrypt_interval_ms: 50,
            line_gap_ms: 300,
            final_hold_ms: 1000,
            complete_hold_ms: 2000,
            decoy_glyphs: DEFAULT_DECOY_GLYPHS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelStage {
    Briefing,
    Decrypting,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntelLineView {
    pub text: String,
    pub active: bool,
    pub done: bool,
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntelView {
    pub stage: IntelStage,
    pub priority: String,
    pub header: String,
    pub header_typing: bool,
    pub subject: String,
    pub status: String,
    pub body: String,
    /// Header finished; decryption is about to start.
    pub auto_starting: bool,
    pub lines: Vec<IntelLineView>,
}

#[derive(Debug)]
pub enum IntelTimer {
    Header,
    AutoStart,
    Decrypt,
    NextLine,
    FinalHold,
}

pub struct IntelBriefing {
    config: IntelConfig,
    runtime: PhaseRuntime<IntelTimer>,
    rng: Rng,
    stage: IntelStage,
    header: Typewriter,
    /// Lines started so far; the last one may still be scrambling.
    lines: Vec<DecryptLine>,
}

impl IntelBriefing {
    pub fn new(config: IntelConfig, rng: Rng) -> Self {
        let header = Typewriter::new(&config.header, config.header_char_ms);
        Self {
            config,
            runtime: PhaseRuntime::new(),
            rng,
            stage: IntelStage::Briefing,
            header,
            lines: Vec::new(),
        }
    }

    pub fn stage(&self) -> IntelStage {
        self.stage
    }

    /// Current frame of every started line.
    pub fn frames(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.frame().to_string()).collect()
    }

    fn start_line(&mut self) {
        let index = self.lines.len();
        let Some(text) = self.config.lines.get(index) else {
            self.runtime.schedule(self.config.final_hold_ms, IntelTimer::FinalHold);
            return;
        };
        let line = DecryptLine::new(
            text,
            &self.config.decoy_glyphs,
            self.config.decrypt_ms,
            self.config.decrypt_interval_ms,
            &mut self.rng,
        );
        self.runtime.schedule(line.interval(), IntelTimer::Decrypt);
        self.lines.push(line);
    }
}

impl PhaseMachine for IntelBriefing {
    type Timer = IntelTimer;

    fn runtime(&self) -> &PhaseRuntime<IntelTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<IntelTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        if self.runtime.begin() {
            self.runtime.schedule(self.header.delay(), IntelTimer::Header);
        }
    }

    fn on_timer(&mut self, timer: IntelTimer) {
        match timer {
            IntelTimer::Header => match self.header.tick() {
                TypeStep::Typed => {
                    self.runtime.schedule(self.header.delay(), IntelTimer::Header);
                }
                TypeStep::Complete => {
                    self.runtime.schedule(self.config.auto_start_ms, IntelTimer::AutoStart);
                }
                TypeStep::Idle => {}
            },
            IntelTimer::AutoStart => {
                self.stage = IntelStage::Decrypting;
                log::debug!("IntelBriefing: decryption started");
                self.start_line();
            }
            IntelTimer::Decrypt => {
                let Some(line) = self.lines.last_mut() else {
                    return;
                };
                match line.tick(&mut self.rng) {
                    DecryptStep::Scrambling => {
                        let interval = line.interval();
                        self.runtime.schedule(interval, IntelTimer::Decrypt);
                    }
                    DecryptStep::Complete => {
                        self.runtime.schedule(self.config.line_gap_ms, IntelTimer::NextLine);
                    }
                    DecryptStep::Idle => {}
                }
            }
            IntelTimer::NextLine => self.start_line(),
            IntelTimer::FinalHold => {
                self.stage = IntelStage::Complete;
                self.runtime.complete(self.config.complete_hold_ms);
            }
        }
    }

    fn view(&self) -> PhaseView {
        let count = self.config.lines.len();
        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| IntelLineView {
                text: line.frame().to_string(),
                active: !line.is_complete(),
                done: line.is_complete(),
                last: i + 1 == count,
            })
            .collect();
        PhaseView::Intel(IntelView {
            stage: self.stage,
            priority: self.config.priority.clone(),
            header: self.header.displayed(),
            header_typing: self.header.is_typing(),
            subject: self.config.subject.clone(),
            status: self.config.status.clone(),
            body: self.config.body.clone(),
            auto_starting: self.stage == IntelStage::Briefing && self.header.is_complete(),
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::counter;

    fn config() -> IntelConfig {
        IntelConfig {
            header: "HI".to_string(),
            lines: vec!["ONE".to_string(), "TWO".to_string()],
            ..IntelConfig::default()
        }
    }

    #[test]
    fn briefing_then_decrypts_lines_in_order() {
        let (count, cb) = counter();
        let mut intel = IntelBriefing::new(config(), Rng::new(9));
        intel.set_on_complete(cb);
        intel.start();

        // Header "HI": 2 chars at 50ms.
        intel.advance(100);
        assert_eq!(intel.stage(), IntelStage::Briefing);
        intel.advance(2000);
        assert_eq!(intel.stage(), IntelStage::Decrypting);
        assert_eq!(intel.frames().len(), 1);

        // First line resolves after 1500ms, second starts 300ms later.
        intel.advance(1500);
        assert_eq!(intel.frames(), vec!["ONE"]);
        intel.advance(300);
        assert_eq!(intel.frames().len(), 2);
        intel.advance(1500);
        assert_eq!(intel.frames(), vec!["ONE", "TWO"]);

        // Gap, then final hold, then the completed view.
        intel.advance(300 + 999);
        assert_eq!(intel.stage(), IntelStage::Decrypting);
        intel.advance(1);
        assert_eq!(intel.stage(), IntelStage::Complete);
        assert_eq!(count.get(), 0);

        intel.advance(1999);
        assert_eq!(count.get(), 0);
        intel.advance(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn teardown_during_decrypt_freezes_the_line() {
        let (count, cb) = counter();
        let mut intel = IntelBriefing::new(config(), Rng::new(3));
        intel.set_on_complete(cb);
        intel.start();
        intel.advance(100 + 2000 + 500);
        let frozen = intel.frames();
        intel.teardown();
        intel.advance(60_000);
        assert_eq!(intel.frames(), frozen);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn auto_start_flag_between_header_and_decrypt() {
        let mut intel = IntelBriefing::new(config(), Rng::new(4));
        intel.start();
        intel.advance(100);
        match intel.view() {
            PhaseView::Intel(v) => {
                assert!(v.auto_starting);
                assert!(!v.header_typing);
                assert_eq!(v.header, "HI");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
