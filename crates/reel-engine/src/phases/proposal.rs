//! Proposal reveal: appreciation lines, then the certificate.

use serde::{Deserialize, Serialize};

use super::{PhaseMachine, PhaseRuntime, PhaseView};
use crate::core::scheduler::TimerId;
use crate::core::time::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateText {
    pub header: String,
    pub question: String,
    pub footer: String,
}

impl Default for CertificateText {
    fn default() -> Self {
        Self {
            header: "CERTIFICATE OF RESCUE".to_string(),
            question: "Will you be my Valentine?".to_string(),
            footer: "MISSION STATUS: COMPLETE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalConfig {
    pub header: String,
    pub lines: Vec<String>,
    pub line_ms: Millis,
    /// Time in the appreciation view before switching to the certificate.
    pub certificate_at_ms: Millis,
    pub content_delay_ms: Millis,
    /// Hold from entering the certificate before the parent is told.
    pub complete_hold_ms: Millis,
    pub certificate: CertificateText,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            header: "BEFORE YOU GO...".to_string(),
            lines: vec![
                "Every mission led back to you.".to_string(),
                "Every signal was worth chasing.".to_string(),
                "One question remains.".to_string(),
            ],
            line_ms: 1500,
            certificate_at_ms: 6000,
            content_delay_ms: 500,
            complete_hold_ms: 4000,
            certificate: CertificateText::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStage {
    Appreciation,
    Certificate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalView {
    pub stage: ProposalStage,
    pub header: String,
    pub visible_lines: Vec<String>,
    pub all_lines_shown: bool,
    pub certificate: Option<CertificateText>,
}

#[derive(Debug)]
pub enum ProposalTimer {
    Line,
    Certificate,
    Content,
}

pub struct ProposalReveal {
    config: ProposalConfig,
    runtime: PhaseRuntime<ProposalTimer>,
    stage: ProposalStage,
    visible: usize,
    show_content: bool,
    line_timer: Option<TimerId>,
}

impl ProposalReveal {
    pub fn new(config: ProposalConfig) -> Self {
        Self {
            config,
            runtime: PhaseRuntime::new(),
            stage: ProposalStage::Appreciation,
            visible: 0,
            show_content: false,
            line_timer: None,
        }
    }

    pub fn stage(&self) -> ProposalStage {
        self.stage
    }

    pub fn visible_lines(&self) -> usize {
        self.visible
    }

    fn schedule_line(&mut self) {
        if self.visible < self.config.lines.len() {
            self.line_timer = Some(self.runtime.schedule(self.config.line_ms, ProposalTimer::Line));
        }
    }
}

impl PhaseMachine for ProposalReveal {
    type Timer = ProposalTimer;

    fn runtime(&self) -> &PhaseRuntime<ProposalTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<ProposalTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        if self.runtime.begin() {
            self.schedule_line();
            self.runtime
                .schedule(self.config.certificate_at_ms, ProposalTimer::Certificate);
        }
    }

    fn on_timer(&mut self, timer: ProposalTimer) {
        match timer {
            ProposalTimer::Line => {
                self.line_timer = None;
                self.visible += 1;
                self.schedule_line();
            }
            ProposalTimer::Certificate => {
                self.runtime.cancel_slot(&mut self.line_timer);
                self.stage = ProposalStage::Certificate;
                self.runtime
                    .schedule(self.config.content_delay_ms, ProposalTimer::Content);
                self.runtime.complete(self.config.complete_hold_ms);
            }
            ProposalTimer::Content => self.show_content = true,
        }
    }

    fn view(&self) -> PhaseView {
        let visible_lines = match self.stage {
            ProposalStage::Appreciation => self.config.lines[..self.visible].to_vec(),
            ProposalStage::Certificate => Vec::new(),
        };
        PhaseView::Proposal(ProposalView {
            stage: self.stage,
            header: self.config.header.clone(),
            visible_lines,
            all_lines_shown: self.visible >= self.config.lines.len(),
            certificate: self
                .show_content
                .then(|| self.config.certificate.clone()),
        })
    }
}
