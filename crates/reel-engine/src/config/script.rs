use serde::{Deserialize, Serialize};

use crate::core::time::Millis;
use crate::effects::rain::RainConfig;
use crate::error::ConfigError;
use crate::phases::{
    BootConfig, BriefConfig, CipherConfig, CountdownConfig, ExplainerConfig, IntelConfig,
    PhaseKind, ProposalConfig, ScanConfig, VideoConfig,
};

/// Static metadata for one phase of an act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: PhaseKind,
    /// Media source for video phases.
    #[serde(default)]
    pub media: Option<String>,
}

impl PhaseMeta {
    pub fn new(id: &str, title: &str, kind: PhaseKind) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            kind,
            media: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_media(mut self, source: &str) -> Self {
        self.media = Some(source.to_string());
        self
    }
}

/// One act: a fixed, ordered list of phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActSpec {
    pub number: u32,
    pub title: String,
    pub phases: Vec<PhaseMeta>,
    /// On narrow viewports, open on the overview card before the phone view.
    #[serde(default)]
    pub mobile_overview: bool,
    /// Label shown on the last phase, pointing at the next act.
    #[serde(default)]
    pub scroll_hint: Option<String>,
    /// Show the closing call-to-action on the last phase.
    #[serde(default)]
    pub finale: bool,
}

/// Narrow-viewport behaviour of acts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileConfig {
    /// Time on the overview card before switching to the phone view.
    pub overview_ms: Millis,
    /// Horizontal drag distance, in px, that counts as a swipe.
    pub swipe_threshold: f32,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            overview_ms: 5000,
            swipe_threshold: 50.0,
        }
    }
}

/// The whole presentation: acts plus the settings of every phase kind.
/// Every section is optional in JSON and falls back to its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowScript {
    pub title: String,
    pub acts: Vec<ActSpec>,
    pub boot: BootConfig,
    pub scan: ScanConfig,
    pub brief: BriefConfig,
    pub countdown: CountdownConfig,
    pub explainer: ExplainerConfig,
    pub video: VideoConfig,
    pub intel: IntelConfig,
    pub cipher: CipherConfig,
    pub proposal: ProposalConfig,
    pub mobile: MobileConfig,
    pub rain: RainConfig,
}

impl Default for ShowScript {
    fn default() -> Self {
        Self {
            title: "Mission Showcase".to_string(),
            acts: default_acts(),
            boot: BootConfig::default(),
            scan: ScanConfig::default(),
            brief: BriefConfig::default(),
            countdown: CountdownConfig::default(),
            explainer: ExplainerConfig::default(),
            video: VideoConfig::default(),
            intel: IntelConfig::default(),
            cipher: CipherConfig::default(),
            proposal: ProposalConfig::default(),
            mobile: MobileConfig::default(),
            rain: RainConfig::default(),
        }
    }
}

fn default_acts() -> Vec<ActSpec> {
    vec![
        ActSpec {
            number: 1,
            title: "Authentication".to_string(),
            phases: vec![
                PhaseMeta::new("boot", "Boot Sequence", PhaseKind::Boot)
                    .with_description("A secure terminal wakes up line by line."),
                PhaseMeta::new("scan", "Biometric Scan", PhaseKind::Scan)
                    .with_description("Hold to verify the agent's fingerprint."),
                PhaseMeta::new("brief", "Mission Brief", PhaseKind::Brief)
                    .with_description("The objective is revealed."),
                PhaseMeta::new("countdown", "Countdown", PhaseKind::Countdown)
                    .with_description("Three, two, one."),
            ],
            mobile_overview: false,
            scroll_hint: Some("SCROLL TO ACT 2".to_string()),
            finale: false,
        },
        ActSpec {
            number: 2,
            title: "The Mission".to_string(),
            phases: vec![
                PhaseMeta::new("explainer", "Game Explainer", PhaseKind::Explainer)
                    .with_description("Collect the hearts, avoid the hazards."),
                PhaseMeta::new("gameplay", "Gameplay", PhaseKind::Video)
                    .with_media("/videos/phase_5_game.mp4"),
                PhaseMeta::new("room", "The Room", PhaseKind::Video)
                    .with_media("/videos/phase_6_room.mp4"),
                PhaseMeta::new("memory", "Memory Lane", PhaseKind::Video)
                    .with_media("/videos/phase_6b_memory.mp4"),
            ],
            mobile_overview: true,
            scroll_hint: Some("SCROLL TO ACT 3".to_string()),
            finale: false,
        },
        ActSpec {
            number: 3,
            title: "The Revelation".to_string(),
            phases: vec![
                PhaseMeta::new("intel", "Intel Briefing", PhaseKind::Intel)
                    .with_description("A transmission decrypts itself."),
                PhaseMeta::new("cipher", "Cipher", PhaseKind::Cipher)
                    .with_description("Three words unlock the message."),
                PhaseMeta::new("proposal", "The Question", PhaseKind::Proposal)
                    .with_description("One last certificate."),
            ],
            mobile_overview: true,
            scroll_hint: None,
            finale: true,
        },
    ]
}

impl ShowScript {
    /// Parse and validate a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let script: ShowScript = serde_json::from_str(json)?;
        script.validate()?;
        log::info!(
            "ShowScript: loaded {:?} with {} acts",
            script.title,
            script.acts.len()
        );
        Ok(script)
    }

    /// Check cross-field invariants that serde alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(act) = self.acts.iter().find(|a| a.phases.is_empty()) {
            return Err(ConfigError::EmptyAct { act: act.number });
        }
        let expected = self.cipher.word_length;
        if let Some(level) = self
            .cipher
            .levels
            .iter()
            .find(|l| l.word.chars().count() != expected)
        {
            return Err(ConfigError::CipherWordLength {
                word: level.word.clone(),
                actual: level.word.chars().count(),
                expected,
            });
        }
        let intervals = [
            ("scan.sample_ms", self.scan.sample_ms),
            ("intel.decrypt_interval_ms", self.intel.decrypt_interval_ms),
            ("rain.frame_ms", self.rain.frame_ms),
        ];
        if let Some(&(field, _)) = intervals.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroInterval { field });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default_show() {
        let script = ShowScript::from_json("{}").unwrap();
        assert_eq!(script, ShowScript::default());
        assert_eq!(script.acts.len(), 3);
        assert_eq!(script.acts[1].phases.len(), 4);
        assert!(script.acts[1].mobile_overview);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{
            "countdown": { "step_ms": 500 },
            "acts": [{
                "number": 1,
                "title": "Only",
                "phases": [{ "id": "c", "title": "C", "kind": "countdown" }]
            }]
        }"#;
        let script = ShowScript::from_json(json).unwrap();
        assert_eq!(script.countdown.step_ms, 500);
        assert_eq!(script.countdown.final_hold_ms, 1000);
        assert_eq!(script.acts[0].phases[0].kind, PhaseKind::Countdown);
        assert!(!script.acts[0].mobile_overview);
        assert_eq!(script.boot, BootConfig::default());
    }

    #[test]
    fn rejects_act_without_phases() {
        let json = r#"{ "acts": [{ "number": 4, "title": "Empty", "phases": [] }] }"#;
        assert!(matches!(
            ShowScript::from_json(json),
            Err(ConfigError::EmptyAct { act: 4 })
        ));
    }

    #[test]
    fn rejects_cipher_word_of_wrong_length() {
        let json = r#"{ "cipher": { "levels": [{ "word": "LOVE" }] } }"#;
        match ShowScript::from_json(json) {
            Err(ConfigError::CipherWordLength {
                actual, expected, ..
            }) => {
                assert_eq!(actual, 4);
                assert_eq!(expected, 5);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_sampling_interval() {
        let json = r#"{ "scan": { "sample_ms": 0 } }"#;
        assert!(matches!(
            ShowScript::from_json(json),
            Err(ConfigError::ZeroInterval { field: "scan.sample_ms" })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            ShowScript::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unknown_phase_kind_is_rejected() {
        let json = r#"{ "acts": [{ "number": 1, "title": "X",
            "phases": [{ "id": "x", "title": "X", "kind": "juggling" }] }] }"#;
        assert!(ShowScript::from_json(json).is_err());
    }
}
