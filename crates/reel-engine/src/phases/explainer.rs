//! Game explainer card. Completes when its entrance reveal finishes.

use serde::{Deserialize, Serialize};

use super::{PhaseMachine, PhaseRuntime, PhaseView};
use crate::core::time::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainerItem {
    /// "COLLECT" or "AVOID" style heading.
    pub action: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    pub heading: String,
    pub items: Vec<ExplainerItem>,
    pub entrance_ms: Millis,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            heading: "MISSION OBJECTIVES".to_string(),
            items: vec![
                ExplainerItem {
                    action: "COLLECT".to_string(),
                    caption: "+1 Love".to_string(),
                },
                ExplainerItem {
                    action: "AVOID".to_string(),
                    caption: "Hazard".to_string(),
                },
            ],
            entrance_ms: 1200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainerView {
    pub heading: String,
    pub items: Vec<ExplainerItem>,
    /// Entrance animation finished.
    pub entered: bool,
}

#[derive(Debug)]
pub enum ExplainerTimer {
    Entered,
}

pub struct GameExplainer {
    config: ExplainerConfig,
    runtime: PhaseRuntime<ExplainerTimer>,
    entered: bool,
}

impl GameExplainer {
    pub fn new(config: ExplainerConfig) -> Self {
        Self {
            config,
            runtime: PhaseRuntime::new(),
            entered: false,
        }
    }
}

impl PhaseMachine for GameExplainer {
    type Timer = ExplainerTimer;

    fn runtime(&self) -> &PhaseRuntime<ExplainerTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<ExplainerTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        if self.runtime.begin() {
            self.runtime.schedule(self.config.entrance_ms, ExplainerTimer::Entered);
        }
    }

    fn on_timer(&mut self, timer: ExplainerTimer) {
        match timer {
            ExplainerTimer::Entered => {
                self.entered = true;
                self.runtime.complete(0);
            }
        }
    }

    fn view(&self) -> PhaseView {
        PhaseView::Explainer(ExplainerView {
            heading: self.config.heading.clone(),
            items: self.config.items.clone(),
            entered: self.entered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::counter;

    #[test]
    fn completes_when_entrance_ends() {
        let (count, cb) = counter();
        let mut explainer = GameExplainer::new(ExplainerConfig::default());
        explainer.set_on_complete(cb);
        explainer.start();
        explainer.advance(1199);
        assert_eq!(count.get(), 0);
        explainer.advance(1);
        assert_eq!(count.get(), 1);
        assert!(explainer.is_complete());
    }
}
