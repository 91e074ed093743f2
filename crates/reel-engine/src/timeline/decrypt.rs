//! Scramble-then-reveal text effect.
//!
//! Over `ceil(duration / interval)` ticks the true characters are revealed
//! left to right; everything not yet revealed shows a random decoy glyph.
//! Spaces are never scrambled. When the last character is revealed the frame
//! snaps to the target and the line reports completion once.

use crate::core::time::Millis;
use crate::effects::rng::Rng;

/// Decoy glyphs used when no alphabet is configured.
pub const DEFAULT_DECOY_GLYPHS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?0123456789ABCDEF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptStep {
    /// Still scrambled in part; schedule the next tick.
    Scrambling,
    /// Fully revealed. Reported exactly once.
    Complete,
    /// Already complete.
    Idle,
}

#[derive(Debug, Clone)]
pub struct DecryptLine {
    target: Vec<char>,
    decoys: Vec<char>,
    total_steps: u32,
    step: u32,
    interval: Millis,
    frame: String,
    done: bool,
}

impl DecryptLine {
    /// Build a line and render its first, fully scrambled frame.
    pub fn new(text: &str, decoys: &str, duration: Millis, interval: Millis, rng: &mut Rng) -> Self {
        let total_steps = if interval == 0 {
            0
        } else {
            duration.div_ceil(interval).min(u64::from(u32::MAX)) as u32
        };
        let decoys: Vec<char> = if decoys.is_empty() {
            DEFAULT_DECOY_GLYPHS.chars().collect()
        } else {
            decoys.chars().collect()
        };
        let mut line = Self {
            target: text.chars().collect(),
            decoys,
            total_steps,
            step: 0,
            interval,
            frame: String::new(),
            done: false,
        };
        line.render(rng);
        line
    }

    pub fn interval(&self) -> Millis {
        self.interval
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// How many leading characters show their true value at the current step.
    pub fn revealed_count(&self) -> usize {
        if self.total_steps == 0 {
            return self.target.len();
        }
        let revealed = u64::from(self.step) * self.target.len() as u64 / u64::from(self.total_steps);
        revealed as usize
    }

    pub fn tick(&mut self, rng: &mut Rng) -> DecryptStep {
        if self.done {
            return DecryptStep::Idle;
        }
        self.step = self.step.saturating_add(1).min(self.total_steps);
        if self.revealed_count() >= self.target.len() {
            self.frame = self.target.iter().collect();
            self.done = true;
            DecryptStep::Complete
        } else {
            self.render(rng);
            DecryptStep::Scrambling
        }
    }

    /// Current frame text.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.done
    }

    fn render(&mut self, rng: &mut Rng) {
        let revealed = self.revealed_count();
        self.frame = self
            .target
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if i < revealed || c == ' ' {
                    c
                } else {
                    rng.pick(&self.decoys).copied().unwrap_or(c)
                }
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "SIGNAL LOCKED";

    #[test]
    fn starts_fully_scrambled_except_spaces() {
        let mut rng = Rng::new(11);
        let line = DecryptLine::new(TARGET, "#", 1500, 50, &mut rng);
        assert_eq!(line.revealed_count(), 0);
        assert_eq!(line.frame(), "###### ######");
    }

    #[test]
    fn completes_on_final_step_with_exact_text() {
        let mut rng = Rng::new(5);
        let mut line = DecryptLine::new(TARGET, "", 1500, 50, &mut rng);
        assert_eq!(line.total_steps(), 30);

        let mut completed_at = None;
        for tick in 1..=40 {
            if line.tick(&mut rng) == DecryptStep::Complete {
                assert!(completed_at.is_none(), "completed twice");
                completed_at = Some(tick);
            }
        }
        assert_eq!(completed_at, Some(30));
        assert_eq!(line.frame(), TARGET);
        assert_eq!(line.tick(&mut rng), DecryptStep::Idle);
    }

    #[test]
    fn reveal_count_follows_floor_of_progress() {
        let mut rng = Rng::new(9);
        // 10 chars over 4 steps: 2, 5, 7, 10
        let mut line = DecryptLine::new("ABCDEFGHIJ", "", 400, 100, &mut rng);
        let mut counts = Vec::new();
        for _ in 0..4 {
            line.tick(&mut rng);
            counts.push(line.revealed_count());
        }
        assert_eq!(counts, vec![2, 5, 7, 10]);
    }

    #[test]
    fn revealed_prefix_is_true_text() {
        let mut rng = Rng::new(1);
        let mut line = DecryptLine::new("ABCDEFGHIJ", "#", 400, 100, &mut rng);
        line.tick(&mut rng);
        line.tick(&mut rng);
        assert_eq!(line.frame(), "ABCDE#####");
    }

    #[test]
    fn partial_interval_rounds_steps_up() {
        let mut rng = Rng::new(2);
        let line = DecryptLine::new("AB", "", 1000, 300, &mut rng);
        assert_eq!(line.total_steps(), 4);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut rng = Rng::new(2);
        let mut line = DecryptLine::new("AB", "", 0, 50, &mut rng);
        assert_eq!(line.tick(&mut rng), DecryptStep::Complete);
        assert_eq!(line.frame(), "AB");
    }
}
