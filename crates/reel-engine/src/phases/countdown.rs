//! Launch countdown: one token per step, then a final hold.

use serde::{Deserialize, Serialize};

use super::{PhaseMachine, PhaseRuntime, PhaseView};
use crate::core::time::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    pub tokens: Vec<String>,
    pub step_ms: Millis,
    /// How long the last token stays before the phase completes.
    pub final_hold_ms: Millis,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tokens: ["3", "2", "1", "MISSION START"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            step_ms: 1000,
            final_hold_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownView {
    pub token: Option<String>,
    pub index: usize,
    pub total: usize,
    pub complete: bool,
}

#[derive(Debug)]
pub enum CountdownTimer {
    Next,
}

pub struct Countdown {
    config: CountdownConfig,
    runtime: PhaseRuntime<CountdownTimer>,
    index: usize,
}

impl Countdown {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config,
            runtime: PhaseRuntime::new(),
            index: 0,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.config.tokens.get(self.index).map(String::as_str)
    }

    fn showing_last(&self) -> bool {
        self.index + 1 >= self.config.tokens.len()
    }

    fn settle(&mut self) {
        if self.showing_last() {
            self.runtime.complete(self.config.final_hold_ms);
        } else {
            self.runtime.schedule(self.config.step_ms, CountdownTimer::Next);
        }
    }
}

impl PhaseMachine for Countdown {
    type Timer = CountdownTimer;

    fn runtime(&self) -> &PhaseRuntime<CountdownTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<CountdownTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        if self.runtime.begin() {
            self.settle();
        }
    }

    fn on_timer(&mut self, timer: CountdownTimer) {
        match timer {
            CountdownTimer::Next => {
                self.index += 1;
                self.settle();
            }
        }
    }

    fn view(&self) -> PhaseView {
        PhaseView::Countdown(CountdownView {
            token: self.token().map(str::to_string),
            index: self.index,
            total: self.config.tokens.len(),
            complete: self.runtime.is_complete(),
        })
    }
}
