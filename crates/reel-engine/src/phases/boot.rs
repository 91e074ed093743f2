//! Terminal boot sequence: lines typed one after another.

use serde::{Deserialize, Serialize};

use super::{PhaseMachine, PhaseRuntime, PhaseView};
use crate::core::time::Millis;
use crate::timeline::typewriter::{TypeStep, Typewriter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    pub lines: Vec<String>,
    pub char_delay_ms: Millis,
    /// Pause between a line finishing and the next one starting.
    pub line_delay_ms: Millis,
    /// Hold after the last line before the parent is told.
    pub complete_hold_ms: Millis,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            lines: vec![
                "> INITIALIZING SECURE CHANNEL...".to_string(),
                "> LOADING AGENT PROFILE...".to_string(),
                "> VERIFYING CLEARANCE LEVEL...".to_string(),
                "> SYSTEM READY.".to_string(),
            ],
            char_delay_ms: 40,
            line_delay_ms: 400,
            complete_hold_ms: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootView {
    /// Finished lines followed by the partially typed one.
    pub lines: Vec<String>,
    /// Whether the last entry of `lines` is still being typed.
    pub typing: bool,
    pub complete: bool,
}

#[derive(Debug)]
pub enum BootTimer {
    Type,
    NextLine,
}

pub struct BootSequence {
    config: BootConfig,
    runtime: PhaseRuntime<BootTimer>,
    line: usize,
    finished: Vec<String>,
    typewriter: Option<Typewriter>,
}

impl BootSequence {
    pub fn new(config: BootConfig) -> Self {
        Self {
            config,
            runtime: PhaseRuntime::new(),
            line: 0,
            finished: Vec::new(),
            typewriter: None,
        }
    }

    fn begin_line(&mut self) {
        match self.config.lines.get(self.line) {
            Some(text) => {
                let tw = Typewriter::new(text, self.config.char_delay_ms);
                self.runtime.schedule(tw.delay(), BootTimer::Type);
                self.typewriter = Some(tw);
            }
            None => {
                self.typewriter = None;
                self.runtime.complete(self.config.complete_hold_ms);
            }
        }
    }
}

impl PhaseMachine for BootSequence {
    type Timer = BootTimer;

    fn runtime(&self) -> &PhaseRuntime<BootTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<BootTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        if self.runtime.begin() {
            self.begin_line();
        }
    }

    fn on_timer(&mut self, timer: BootTimer) {
        match timer {
            BootTimer::Type => {
                let Some(tw) = self.typewriter.as_mut() else {
                    return;
                };
                match tw.tick() {
                    TypeStep::Typed => {
                        let delay = tw.delay();
                        self.runtime.schedule(delay, BootTimer::Type);
                    }
                    TypeStep::Complete => {
                        self.finished.push(tw.displayed());
                        self.typewriter = None;
                        if self.line + 1 < self.config.lines.len() {
                            self.runtime.schedule(self.config.line_delay_ms, BootTimer::NextLine);
                        } else {
                            self.runtime.complete(self.config.complete_hold_ms);
                        }
                    }
                    TypeStep::Idle => {}
                }
            }
            BootTimer::NextLine => {
                self.line += 1;
                self.begin_line();
            }
        }
    }

    fn view(&self) -> PhaseView {
        let mut lines = self.finished.clone();
        if let Some(tw) = &self.typewriter {
            lines.push(tw.displayed());
        }
        PhaseView::Boot(BootView {
            lines,
            typing: self.typewriter.is_some(),
            complete: self.runtime.is_complete(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::counter;

    fn short() -> BootConfig {
        BootConfig {
            lines: vec!["AB".into(), "C".into()],
            char_delay_ms: 10,
            line_delay_ms: 100,
            complete_hold_ms: 50,
        }
    }

    fn lines(boot: &BootSequence) -> Vec<String> {
        match boot.view() {
            PhaseView::Boot(v) => v.lines,
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn types_lines_in_sequence_then_completes_after_hold() {
        let (count, cb) = counter();
        let mut boot = BootSequence::new(short());
        boot.set_on_complete(cb);
        boot.start();

        boot.advance(10);
        assert_eq!(lines(&boot), vec!["A"]);
        boot.advance(10);
        assert_eq!(lines(&boot), vec!["AB"]);

        // Pause between lines; the second line opens empty at 120ms, "C" at 130ms.
        boot.advance(99);
        assert_eq!(lines(&boot), vec!["AB"]);
        boot.advance(1);
        assert_eq!(lines(&boot), vec!["AB", ""]);
        boot.advance(10);
        assert_eq!(lines(&boot), vec!["AB", "C"]);
        assert!(boot.is_complete());
        assert_eq!(count.get(), 0);

        boot.advance(49);
        assert_eq!(count.get(), 0);
        boot.advance(1);
        assert_eq!(count.get(), 1);

        boot.advance(10_000);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn default_script_finishes_at_expected_instant() {
        let config = BootConfig::default();
        let chars: u64 = config.lines.iter().map(|l| l.chars().count() as u64).sum();
        let gaps = (config.lines.len() as u64 - 1) * config.line_delay_ms;
        let done_at = chars * config.char_delay_ms + gaps + config.complete_hold_ms;

        let (count, cb) = counter();
        let mut boot = BootSequence::new(config);
        boot.set_on_complete(cb);
        boot.start();
        boot.advance(done_at - 1);
        assert_eq!(count.get(), 0);
        boot.advance(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn teardown_mid_line_stops_typing() {
        let (count, cb) = counter();
        let mut boot = BootSequence::new(short());
        boot.set_on_complete(cb);
        boot.start();
        boot.advance(10);
        boot.teardown();
        boot.advance(1_000);
        assert_eq!(lines(&boot), vec!["A"]);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn no_lines_completes_after_hold() {
        let (count, cb) = counter();
        let mut boot = BootSequence::new(BootConfig {
            lines: Vec::new(),
            ..short()
        });
        boot.set_on_complete(cb);
        boot.start();
        boot.advance(50);
        assert_eq!(count.get(), 1);
    }
}
