//! Hold-to-scan fingerprint check.
//!
//! Press starts the scan; progress is sampled on a throttled timer from the
//! time elapsed since the press. Letting go early throws the progress away.
//! Reaching 100% is final: the sample timer stops, a haptic cue goes out and
//! the phase completes immediately.

use serde::{Deserialize, Serialize};

use super::{PhaseInput, PhaseMachine, PhaseRuntime, PhaseView};
use crate::api::types::HapticCue;
use crate::core::scheduler::TimerId;
use crate::core::time::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Hold time needed for a full scan.
    pub duration_ms: Millis,
    /// Progress sampling interval.
    pub sample_ms: Millis,
    /// Vibration length on success.
    pub haptic_ms: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            sample_ms: 50,
            haptic_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    Scanning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanView {
    pub state: ScanState,
    /// 0..=100
    pub progress: f32,
}

#[derive(Debug)]
pub enum ScanTimer {
    Sample,
}

pub struct BiometricScan {
    config: ScanConfig,
    runtime: PhaseRuntime<ScanTimer>,
    state: ScanState,
    progress: f32,
    pressed_at: Millis,
    sample: Option<TimerId>,
}

impl BiometricScan {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            runtime: PhaseRuntime::new(),
            state: ScanState::Idle,
            progress: 0.0,
            pressed_at: 0,
            sample: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    fn schedule_sample(&mut self, elapsed: Millis) {
        let remaining = self.config.duration_ms.saturating_sub(elapsed);
        let delay = self.config.sample_ms.max(1).min(remaining);
        self.sample = Some(self.runtime.schedule(delay, ScanTimer::Sample));
    }

    fn press(&mut self) {
        if self.state != ScanState::Idle {
            return;
        }
        self.state = ScanState::Scanning;
        self.progress = 0.0;
        self.pressed_at = self.runtime.now();
        self.schedule_sample(0);
    }

    fn release(&mut self) {
        if self.state != ScanState::Scanning {
            return;
        }
        self.runtime.cancel_slot(&mut self.sample);
        self.state = ScanState::Idle;
        self.progress = 0.0;
        log::debug!("BiometricScan: released early, progress reset");
    }

    fn succeed(&mut self) {
        self.runtime.cancel_slot(&mut self.sample);
        self.state = ScanState::Success;
        self.progress = 100.0;
        self.runtime.emit_haptic(HapticCue(self.config.haptic_ms));
        self.runtime.complete(0);
    }
}

impl PhaseMachine for BiometricScan {
    type Timer = ScanTimer;

    fn runtime(&self) -> &PhaseRuntime<ScanTimer> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut PhaseRuntime<ScanTimer> {
        &mut self.runtime
    }

    // Waits for a press.
    fn start(&mut self) {
        self.runtime.begin();
    }

    fn on_timer(&mut self, timer: ScanTimer) {
        match timer {
            ScanTimer::Sample => {
                self.sample = None;
                if self.state != ScanState::Scanning {
                    return;
                }
                let elapsed = self.runtime.now() - self.pressed_at;
                if elapsed >= self.config.duration_ms {
                    self.succeed();
                } else {
                    let pct = elapsed as f32 / self.config.duration_ms as f32 * 100.0;
                    self.progress = pct.min(100.0);
                    self.schedule_sample(elapsed);
                }
            }
        }
    }

    fn handle(&mut self, input: &PhaseInput) {
        match input {
            PhaseInput::Press => self.press(),
            PhaseInput::Release => self.release(),
            _ => {}
        }
    }

    fn view(&self) -> PhaseView {
        PhaseView::Scan(ScanView {
            state: self.state,
            progress: self.progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::counter;

    fn scan() -> (BiometricScan, std::rc::Rc<std::cell::Cell<u32>>) {
        let (count, cb) = counter();
        let mut scan = BiometricScan::new(ScanConfig::default());
        scan.set_on_complete(cb);
        scan.start();
        (scan, count)
    }

    #[test]
    fn release_before_full_resets_without_credit() {
        let (mut scan, count) = scan();
        scan.handle(&PhaseInput::Press);
        scan.advance(1000);
        assert_eq!(scan.state(), ScanState::Scanning);
        assert!((scan.progress() - 50.0).abs() < 1e-3);

        scan.handle(&PhaseInput::Release);
        assert_eq!(scan.state(), ScanState::Idle);
        assert_eq!(scan.progress(), 0.0);

        scan.advance(5000);
        assert_eq!(scan.progress(), 0.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn full_hold_succeeds_with_haptic_and_immediate_completion() {
        let (mut scan, count) = scan();
        scan.handle(&PhaseInput::Press);
        scan.advance(1999);
        assert_eq!(count.get(), 0);
        scan.advance(1);
        assert_eq!(scan.state(), ScanState::Success);
        assert_eq!(scan.progress(), 100.0);
        assert_eq!(count.get(), 1);
        assert_eq!(scan.drain_cues(), vec![HapticCue(200)]);
    }

    #[test]
    fn input_after_success_is_ignored() {
        let (mut scan, count) = scan();
        scan.handle(&PhaseInput::Press);
        scan.advance(2000);
        scan.handle(&PhaseInput::Release);
        scan.handle(&PhaseInput::Press);
        scan.advance(5000);
        assert_eq!(scan.state(), ScanState::Success);
        assert_eq!(scan.progress(), 100.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn press_while_scanning_does_not_restart() {
        let (mut scan, count) = scan();
        scan.handle(&PhaseInput::Press);
        scan.advance(1500);
        scan.handle(&PhaseInput::Press);
        scan.advance(500);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn rescan_after_reset_needs_full_duration() {
        let (mut scan, count) = scan();
        scan.handle(&PhaseInput::Press);
        scan.advance(1900);
        scan.handle(&PhaseInput::Release);
        scan.handle(&PhaseInput::Press);
        scan.advance(1999);
        assert_eq!(count.get(), 0);
        scan.advance(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn progress_samples_are_throttled() {
        let (mut scan, _) = scan();
        scan.handle(&PhaseInput::Press);
        scan.advance(70);
        // Last sample was at 50ms.
        assert!((scan.progress() - 2.5).abs() < 1e-3);
    }
}
