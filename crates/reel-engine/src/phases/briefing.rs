//! Mission brief: typed title, then wait for the INITIATE button.

use serde::{Deserialize, Serialize};

use super::{PhaseInput, PhaseMachine, PhaseRuntime, PhaseView};
use crate::core::scheduler::TimerId;
use crate::core::time::Millis;
use crate::timeline::typewriter::{TypeStep, Typewriter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    pub title: String,
    pub objectives: Vec<String>,
    pub button_label: String,
    pub char_delay_ms: Millis,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            title: "MISSION: RESTORE CONNECTION".to_string(),
            objectives: vec![
                "Locate the missing signal".to_string(),
                "Decrypt the transmission".to_string(),
                "Deliver the final message".to_string(),
            ],
            button_label: "INITIATE SEQUENCE".to_string(),
            char_delay_ms: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefStage {
    Typing,
    Ready,
    Initiated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BriefView {
    pub stage: BriefStage,
    pub title: String,
    pub objectives: Vec<String>,
    pub button_label: String,
}

#[derive(Debug)]
pub enum BriefTimer {
    Type,
}

pub struct MissionBrief {
    config: BriefConfig,
    runtime: PhaseRuntime<BriefTimer>,
    stage: BriefStage,
    title: Typewriter,
    pending: Option<TimerId>,
}

impl MissionBrief {
    pub fn new(config: BriefConfig) -> Self {
        let title = Typewriter::new(&config.title, config.char_delay_ms);
        Self {
            config,
            runtime: PhaseRuntime::new(),
            stage: BriefStage::Typing,
            title,
            pending: None,
        }
    }

    pub fn stage(&self) -> BriefStage {
        self.stage
    }
}

impl PhaseMachine for MissionBrief {
    type Timer = BriefTimer;

    fn runtime(&self) -> &PhaseRuntime<BriefTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<BriefTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        if self.runtime.begin() {
            self.pending = Some(self.runtime.schedule(self.title.delay(), BriefTimer::Type));
        }
    }

    fn on_timer(&mut self, timer: BriefTimer) {
        match timer {
            BriefTimer::Type => {
                self.pending = None;
                match self.title.tick() {
                    TypeStep::Typed => {
                        self.pending =
                            Some(self.runtime.schedule(self.title.delay(), BriefTimer::Type));
                    }
                    TypeStep::Complete => self.stage = BriefStage::Ready,
                    TypeStep::Idle => {}
                }
            }
        }
    }

    fn handle(&mut self, input: &PhaseInput) {
        if *input != PhaseInput::Activate || self.stage == BriefStage::Initiated {
            return;
        }
        self.runtime.cancel_slot(&mut self.pending);
        self.stage = BriefStage::Initiated;
        log::info!("MissionBrief: sequence initiated");
        self.runtime.complete(0);
    }

    fn view(&self) -> PhaseView {
        PhaseView::Brief(BriefView {
            stage: self.stage,
            title: self.title.displayed(),
            objectives: self.config.objectives.clone(),
            button_label: self.config.button_label.clone(),
        })
    }
}
