//! Scripted word-guessing simulation.
//!
//! Each level types the target word one letter at a time, submits it, flips
//! the evaluated tiles, shows the level's success message and moves on. The
//! guess is always the target, so every row comes out all-correct; the
//! evaluator is still the full two-pass classification.

use serde::{Deserialize, Serialize};

use super::{PhaseMachine, PhaseRuntime, PhaseView};
use crate::core::time::Millis;
use crate::error::CipherError;

/// Classification of one guessed letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Correct,
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LetterCell {
    pub letter: char,
    pub state: TileState,
}

/// Classify every letter of `guess` against `target`.
///
/// Exact matches are claimed first. Remaining letters then claim the first
/// unclaimed matching target position, so a letter repeated in the guess is
/// only marked present as many times as it is still unmatched in the target.
pub fn evaluate_guess(guess: &str, target: &str) -> Result<Vec<LetterCell>, CipherError> {
    let guess: Vec<char> = guess.chars().collect();
    let target: Vec<char> = target.chars().collect();
    if guess.len() != target.len() {
        return Err(CipherError::LengthMismatch {
            guess: guess.len(),
            target: target.len(),
        });
    }

    let mut claimed = vec![false; target.len()];
    let mut states: Vec<Option<TileState>> = vec![None; guess.len()];

    for (i, (&g, &t)) in guess.iter().zip(&target).enumerate() {
        if g == t {
            states[i] = Some(TileState::Correct);
            claimed[i] = true;
        }
    }

    for (i, &g) in guess.iter().enumerate() {
        if states[i].is_some() {
            continue;
        }
        let hit = target
            .iter()
            .enumerate()
            .position(|(j, &t)| t == g && !claimed[j]);
        states[i] = Some(match hit {
            Some(j) => {
                claimed[j] = true;
                TileState::Present
            }
            None => TileState::Absent,
        });
    }

    Ok(guess
        .into_iter()
        .zip(states)
        .map(|(letter, state)| LetterCell {
            letter,
            state: state.unwrap_or(TileState::Absent),
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CipherLevel {
    pub word: String,
    #[serde(default)]
    pub hint: String,
    /// Shown when the level is solved; falls back to the default message.
    #[serde(default)]
    pub message: Option<String>,
}

impl CipherLevel {
    pub fn new(word: &str, hint: &str, message: &str) -> Self {
        Self {
            word: word.to_string(),
            hint: hint.to_string(),
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    pub levels: Vec<CipherLevel>,
    pub word_length: usize,
    pub max_rows: usize,
    pub letter_ms: Millis,
    /// Pause between the last letter and evaluation.
    pub submit_ms: Millis,
    /// Stagger between tiles starting to flip.
    pub flip_delay_ms: Millis,
    pub flip_duration_ms: Millis,
    /// How long the success message stays up.
    pub overlay_ms: Millis,
    /// Hold after the last level before the parent is told.
    pub final_hold_ms: Millis,
    pub default_message: String,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                CipherLevel::new("HEART", "What beats for you", "Right on target!"),
                CipherLevel::new("MERRY", "Festive and bright", "Two for two!"),
                CipherLevel::new("LOVER", "The final key", "Cipher cracked!"),
            ],
            word_length: 5,
            max_rows: 6,
            letter_ms: 150,
            submit_ms: 300,
            flip_delay_ms: 300,
            flip_duration_ms: 500,
            overlay_ms: 2000,
            final_hold_ms: 1500,
            default_message: "Perfect!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherStage {
    Typing,
    Revealing,
    Celebrating,
    Solved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CipherView {
    pub stage: CipherStage,
    /// 1-based level number.
    pub level: usize,
    pub level_count: usize,
    pub hint: String,
    pub rows: Vec<Vec<LetterCell>>,
    pub current_guess: String,
    /// Tiles of the newest row that have started flipping.
    pub flipped: usize,
    pub message: Option<String>,
    pub max_rows: usize,
    pub word_length: usize,
}

#[derive(Debug)]
pub enum CipherTimer {
    Letter,
    Submit,
    Flip,
    Revealed,
    NextLevel,
}

pub struct CipherSimulation {
    config: CipherConfig,
    runtime: PhaseRuntime<CipherTimer>,
    stage: CipherStage,
    level: usize,
    target: Vec<char>,
    guess: String,
    rows: Vec<Vec<LetterCell>>,
    flipped: usize,
    message: Option<String>,
}

impl CipherSimulation {
    pub fn new(config: CipherConfig) -> Self {
        Self {
            config,
            runtime: PhaseRuntime::new(),
            stage: CipherStage::Typing,
            level: 0,
            target: Vec::new(),
            guess: String::new(),
            rows: Vec::new(),
            flipped: 0,
            message: None,
        }
    }

    pub fn stage(&self) -> CipherStage {
        self.stage
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn rows(&self) -> &[Vec<LetterCell>] {
        &self.rows
    }

    fn begin_level(&mut self) {
        let Some(level) = self.config.levels.get(self.level) else {
            self.solve();
            return;
        };
        self.target = level.word.chars().collect();
        self.guess.clear();
        self.rows.clear();
        self.flipped = 0;
        self.message = None;
        self.stage = CipherStage::Typing;
        self.continue_typing();
    }

    fn continue_typing(&mut self) {
        if self.guess.chars().count() < self.target.len() {
            self.runtime.schedule(self.config.letter_ms, CipherTimer::Letter);
        } else {
            self.runtime.schedule(self.config.submit_ms, CipherTimer::Submit);
        }
    }

    fn submit(&mut self) {
        let target: String = self.target.iter().collect();
        let row = match evaluate_guess(&self.guess, &target) {
            Ok(row) => row,
            Err(err) => {
                log::warn!("CipherSimulation: {}", err);
                Vec::new()
            }
        };
        let tiles = row.len() as Millis;
        if self.rows.len() < self.config.max_rows {
            self.rows.push(row);
        }
        self.guess.clear();
        self.stage = CipherStage::Revealing;
        self.flipped = 0;
        self.runtime.schedule(0, CipherTimer::Flip);
        let reveal_ms = tiles * self.config.flip_delay_ms + self.config.flip_duration_ms;
        self.runtime.schedule(reveal_ms, CipherTimer::Revealed);
    }

    fn solve(&mut self) {
        self.stage = CipherStage::Solved;
        log::info!("CipherSimulation: all ciphers solved");
        self.runtime.complete(self.config.final_hold_ms);
    }
}

impl PhaseMachine for CipherSimulation {
    type Timer = CipherTimer;

    fn runtime(&self) -> &PhaseRuntime<CipherTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<CipherTimer> {
        &mut self.runtime
    }

    fn start(&mut self) {
        if self.runtime.begin() {
            self.begin_level();
        }
    }

    fn on_timer(&mut self, timer: CipherTimer) {
        match timer {
            CipherTimer::Letter => {
                if let Some(&c) = self.target.get(self.guess.chars().count()) {
                    self.guess.push(c);
                }
                self.continue_typing();
            }
            CipherTimer::Submit => self.submit(),
            CipherTimer::Flip => {
                let tiles = self.rows.last().map_or(0, Vec::len);
                if self.flipped < tiles {
                    self.flipped += 1;
                    if self.flipped < tiles {
                        self.runtime.schedule(self.config.flip_delay_ms, CipherTimer::Flip);
                    }
                }
            }
            CipherTimer::Revealed => {
                let message = self
                    .config
                    .levels
                    .get(self.level)
                    .and_then(|l| l.message.clone())
                    .unwrap_or_else(|| self.config.default_message.clone());
                self.message = Some(message);
                self.stage = CipherStage::Celebrating;
                self.runtime.schedule(self.config.overlay_ms, CipherTimer::NextLevel);
            }
            CipherTimer::NextLevel => {
                self.message = None;
                if self.level + 1 < self.config.levels.len() {
                    self.level += 1;
                    self.begin_level();
                } else {
                    self.solve();
                }
            }
        }
    }

    fn view(&self) -> PhaseView {
        let hint = self
            .config
            .levels
            .get(self.level)
            .map(|l| l.hint.clone())
            .unwrap_or_default();
        PhaseView::Cipher(CipherView {
            stage: self.stage,
            level: self.level + 1,
            level_count: self.config.levels.len(),
            hint,
            rows: self.rows.clone(),
            current_guess: self.guess.clone(),
            flipped: self.flipped,
            message: self.message.clone(),
            max_rows: self.config.max_rows,
            word_length: self.config.word_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::counter;
    use super::TileState::{Absent, Correct, Present};

    /// Tile states for `guess` played against `target`.
    fn states(target: &str, guess: &str) -> Vec<TileState> {
        evaluate_guess(guess, target)
            .unwrap()
            .into_iter()
            .map(|c| c.state)
            .collect()
    }

    #[test]
    fn exact_guess_is_all_correct() {
        assert_eq!(states("LOVER", "LOVER"), vec![Correct; 5]);
    }

    #[test]
    fn shared_letters_in_wrong_places_are_present() {
        assert_eq!(
            states("ROBIN", "BRAIN"),
            vec![Present, Present, Absent, Correct, Correct]
        );
    }

    #[test]
    fn repeated_letters_only_claim_unmatched_positions() {
        assert_eq!(
            states("ABBEY", "BABBY"),
            vec![Present, Present, Correct, Absent, Correct]
        );
    }

    #[test]
    fn guess_and_target_are_not_interchangeable() {
        let cells = evaluate_guess("BRAIN", "ROBIN").unwrap();
        let letters: String = cells.iter().map(|c| c.letter).collect();
        assert_eq!(letters, "BRAIN");
        assert_ne!(states("ROBIN", "BRAIN"), states("BRAIN", "ROBIN"));
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert_eq!(
            evaluate_guess("LOVE", "LOVER"),
            Err(CipherError::LengthMismatch { guess: 4, target: 5 })
        );
    }

    // Per level: 5 letters at 150ms, submit 300ms later, reveal 5*300+500,
    // then 2000ms of success message.
    const LEVEL_MS: Millis = 5 * 150 + 300 + (5 * 300 + 500) + 2000;

    #[test]
    fn one_level_runs_its_timeline() {
        let mut cipher = CipherSimulation::new(CipherConfig::default());
        cipher.start();

        cipher.advance(5 * 150);
        match cipher.view() {
            PhaseView::Cipher(v) => assert_eq!(v.current_guess, "HEART"),
            other => panic!("unexpected view {other:?}"),
        }

        cipher.advance(300);
        assert_eq!(cipher.stage(), CipherStage::Revealing);
        assert_eq!(cipher.rows().len(), 1);
        assert!(cipher.rows()[0].iter().all(|c| c.state == Correct));

        cipher.advance(5 * 300 + 500);
        assert_eq!(cipher.stage(), CipherStage::Celebrating);
        match cipher.view() {
            PhaseView::Cipher(v) => {
                assert_eq!(v.flipped, 5);
                assert_eq!(v.message.as_deref(), Some("Right on target!"));
            }
            other => panic!("unexpected view {other:?}"),
        }

        cipher.advance(2000);
        assert_eq!(cipher.level(), 1);
        assert_eq!(cipher.stage(), CipherStage::Typing);
        assert!(cipher.rows().is_empty());
    }

    #[test]
    fn all_levels_then_final_hold() {
        let (count, cb) = counter();
        let mut cipher = CipherSimulation::new(CipherConfig::default());
        cipher.set_on_complete(cb);
        cipher.start();

        cipher.advance(3 * LEVEL_MS);
        assert_eq!(cipher.stage(), CipherStage::Solved);
        assert_eq!(count.get(), 0);
        cipher.advance(1499);
        assert_eq!(count.get(), 0);
        cipher.advance(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn missing_message_falls_back_to_default() {
        let config = CipherConfig {
            levels: vec![CipherLevel {
                word: "HEART".to_string(),
                hint: String::new(),
                message: None,
            }],
            ..CipherConfig::default()
        };
        let mut cipher = CipherSimulation::new(config);
        cipher.start();
        cipher.advance(LEVEL_MS - 1);
        match cipher.view() {
            PhaseView::Cipher(v) => assert_eq!(v.message.as_deref(), Some("Perfect!")),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn no_levels_completes_after_hold() {
        let (count, cb) = counter();
        let mut cipher = CipherSimulation::new(CipherConfig {
            levels: Vec::new(),
            ..CipherConfig::default()
        });
        cipher.set_on_complete(cb);
        cipher.start();
        cipher.advance(1500);
        assert_eq!(count.get(), 1);
    }
}
