//! Act container: a navigator plus the one mounted phase.
//!
//! Changing the index tears the old phase down and mounts a fresh one, so
//! coming back to a phase restarts it. A phase finishing is recorded and
//! reported, but never moves the navigator; only user input does that.
//!
//! On narrow viewports an act flagged `mobile_overview` opens on an overview
//! card with no phase mounted. A progress timer (or the user) switches it to
//! the phone view, which mounts the current phase.

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use super::navigator::{NavigationState, PhaseNavigator};
use crate::api::types::{HapticCue, ShowEvent};
use crate::config::script::{ActSpec, ShowScript};
use crate::core::scheduler::{Scheduler, TimerId};
use crate::core::time::Millis;
use crate::effects::rng::Rng;
use crate::error::NavigationError;
use crate::phases::{ActivePhase, MediaEvent, PhaseInput, PhaseKind, PhaseView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileView {
    Overview,
    Phone,
}

/// Heading for the current phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseCard {
    /// 1-based.
    pub number: usize,
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: PhaseKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActView {
    pub number: u32,
    pub title: String,
    pub phase: PhaseCard,
    pub phase_titles: Vec<String>,
    pub navigation: NavigationState,
    pub is_desktop: bool,
    pub mobile_view: MobileView,
    /// Overview timer progress, 0..=100.
    pub overview_progress: f32,
    pub content: Option<PhaseView>,
    pub completed: bool,
    pub show_scroll_hint: bool,
    pub scroll_hint: Option<String>,
    pub show_finale: bool,
}

#[derive(Debug)]
enum ActTimer {
    OverviewElapsed,
}

pub struct ActContainer {
    index: usize,
    spec: ActSpec,
    script: Rc<ShowScript>,
    navigator: PhaseNavigator,
    phase: Option<ActivePhase>,
    is_desktop: bool,
    mobile_view: MobileView,
    scheduler: Scheduler<ActTimer>,
    overview_timer: Option<TimerId>,
    overview_started: Millis,
    /// Set by the mounted phase's callback. Replaced on every mount.
    done: Rc<Cell<bool>>,
    completed: bool,
    rng: Rng,
    events: Vec<ShowEvent>,
    cues: Vec<HapticCue>,
}

impl ActContainer {
    /// Build the act at `index` of `script` and mount its first phase, or
    /// open its overview when the viewport is narrow.
    pub fn new(
        index: usize,
        script: Rc<ShowScript>,
        is_desktop: bool,
        seed: u64,
    ) -> Result<Self, NavigationError> {
        let spec = script
            .acts
            .get(index)
            .cloned()
            .ok_or(NavigationError::NoSuchAct { index })?;
        let navigator = PhaseNavigator::new(spec.phases.len())?;
        let mut act = Self {
            index,
            spec,
            script,
            navigator,
            phase: None,
            is_desktop,
            mobile_view: MobileView::Phone,
            scheduler: Scheduler::new(),
            overview_timer: None,
            overview_started: 0,
            done: Rc::new(Cell::new(false)),
            completed: false,
            rng: Rng::new(seed),
            events: Vec::new(),
            cues: Vec::new(),
        };
        if act.gated() {
            act.enter_overview();
        } else {
            act.mount();
        }
        Ok(act)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn spec(&self) -> &ActSpec {
        &self.spec
    }

    pub fn navigator(&self) -> &PhaseNavigator {
        &self.navigator
    }

    pub fn current_phase(&self) -> Option<&ActivePhase> {
        self.phase.as_ref()
    }

    pub fn mobile_view(&self) -> MobileView {
        self.mobile_view
    }

    pub fn is_desktop(&self) -> bool {
        self.is_desktop
    }

    /// Whether the mounted phase has told us it finished.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn gated(&self) -> bool {
        !self.is_desktop && self.spec.mobile_overview
    }

    fn mount(&mut self) {
        self.unmount();
        let index = self.navigator.current();
        let Some(meta) = self.spec.phases.get(index) else {
            return;
        };
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        let on_complete = Box::new(move || flag.set(true));
        let phase = ActivePhase::mount(meta, &self.script, &mut self.rng, on_complete);
        log::info!("Act {}: phase {} ({}) mounted", self.spec.number, index + 1, meta.title);
        self.done = done;
        self.completed = false;
        self.phase = Some(phase);
        self.events.push(ShowEvent::phase_changed(self.index, index));
        self.collect();
    }

    fn unmount(&mut self) {
        if let Some(mut phase) = self.phase.take() {
            phase.teardown();
            log::debug!("Act {}: {:?} torn down", self.spec.number, phase.kind());
        }
    }

    /// Pick up completion and haptics from the mounted phase.
    fn collect(&mut self) {
        if let Some(phase) = self.phase.as_mut() {
            self.cues.extend(phase.drain_cues());
        }
        if self.done.get() && !self.completed {
            self.completed = true;
            let index = self.navigator.current();
            log::info!("Act {}: phase {} complete", self.spec.number, index + 1);
            self.events.push(ShowEvent::phase_complete(self.index, index));
        }
    }

    fn enter_overview(&mut self) {
        self.unmount();
        self.scheduler.cancel_all();
        self.mobile_view = MobileView::Overview;
        self.overview_started = self.scheduler.now();
        self.overview_timer = Some(
            self.scheduler
                .schedule(self.script.mobile.overview_ms, ActTimer::OverviewElapsed),
        );
    }

    fn after_move(&mut self, moved: bool) -> bool {
        if moved {
            log::debug!(
                "Act {}: navigated to phase {}",
                self.spec.number,
                self.navigator.current() + 1
            );
            if self.mobile_view == MobileView::Phone {
                self.mount();
            }
        }
        moved
    }

    pub fn go_to_prev(&mut self) -> bool {
        let moved = self.navigator.go_to_prev();
        self.after_move(moved)
    }

    pub fn go_to_next(&mut self) -> bool {
        let moved = self.navigator.go_to_next();
        self.after_move(moved)
    }

    pub fn go_to_phase(&mut self, index: usize) -> bool {
        let moved = self.navigator.go_to_phase(index);
        self.after_move(moved)
    }

    /// Horizontal drag released with offset `dx`: right goes back, left goes on.
    pub fn swipe(&mut self, dx: f32) -> bool {
        let threshold = self.script.mobile.swipe_threshold;
        if dx > threshold {
            self.go_to_prev()
        } else if dx < -threshold {
            self.go_to_next()
        } else {
            false
        }
    }

    /// Viewport width class changed. The layout subtree changes, so the
    /// phase is remounted.
    pub fn set_desktop(&mut self, is_desktop: bool) {
        if self.is_desktop == is_desktop {
            return;
        }
        self.is_desktop = is_desktop;
        let before = self.mobile_view;
        if self.gated() {
            self.enter_overview();
        } else {
            self.scheduler.cancel_all();
            self.overview_timer = None;
            self.mobile_view = MobileView::Phone;
            self.mount();
        }
        if self.mobile_view != before {
            self.events
                .push(ShowEvent::view_changed(self.index, self.mobile_view == MobileView::Phone));
        }
    }

    /// Leave the overview for the phone view and mount the current phase.
    pub fn show_phone_view(&mut self) -> bool {
        if self.mobile_view != MobileView::Overview {
            return false;
        }
        if let Some(id) = self.overview_timer.take() {
            self.scheduler.cancel(id);
        }
        self.mobile_view = MobileView::Phone;
        self.events.push(ShowEvent::view_changed(self.index, true));
        self.mount();
        true
    }

    /// Go back to the overview card. Only meaningful on gated acts.
    pub fn reset_to_overview(&mut self) -> bool {
        if !self.gated() || self.mobile_view == MobileView::Overview {
            return false;
        }
        self.enter_overview();
        self.events.push(ShowEvent::view_changed(self.index, false));
        true
    }

    /// Route input to the mounted phase.
    pub fn handle(&mut self, input: &PhaseInput) {
        if let Some(phase) = self.phase.as_mut() {
            phase.handle(input);
        }
        self.collect();
    }

    /// Route a media element event to the video at `phase`. Events for a
    /// phase that is not the mounted video are dropped.
    pub fn handle_media(&mut self, phase: usize, event: MediaEvent) -> bool {
        let mounted = phase == self.navigator.current()
            && self.phase.as_ref().map(ActivePhase::kind) == Some(PhaseKind::Video);
        if !mounted {
            log::debug!(
                "Act {}: dropping {:?} for phase {}",
                self.spec.number,
                event,
                phase + 1
            );
            return false;
        }
        self.handle(&PhaseInput::Media(event));
        true
    }

    pub fn advance(&mut self, dt: Millis) {
        if let Some(phase) = self.phase.as_mut() {
            phase.advance(dt);
        }
        self.collect();

        self.scheduler.advance(dt);
        while let Some(timer) = self.scheduler.next_due() {
            match timer {
                ActTimer::OverviewElapsed => {
                    self.overview_timer = None;
                    self.show_phone_view();
                }
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<ShowEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_cues(&mut self) -> Vec<HapticCue> {
        std::mem::take(&mut self.cues)
    }

    fn overview_progress(&self) -> f32 {
        if self.mobile_view != MobileView::Overview {
            return 100.0;
        }
        let total = self.script.mobile.overview_ms;
        if total == 0 {
            return 100.0;
        }
        let elapsed = self.scheduler.now().saturating_sub(self.overview_started);
        (elapsed as f32 / total as f32 * 100.0).min(100.0)
    }

    pub fn view(&self) -> ActView {
        let index = self.navigator.current();
        let phase = self
            .spec
            .phases
            .get(index)
            .map(|meta| PhaseCard {
                number: index + 1,
                id: meta.id.clone(),
                title: meta.title.clone(),
                description: meta.description.clone(),
                kind: meta.kind,
            })
            .unwrap_or_else(|| PhaseCard {
                number: index + 1,
                id: String::new(),
                title: String::new(),
                description: String::new(),
                kind: PhaseKind::Boot,
            });
        let last = self.navigator.is_last();
        ActView {
            number: self.spec.number,
            title: self.spec.title.clone(),
            phase,
            phase_titles: self.spec.phases.iter().map(|p| p.title.clone()).collect(),
            navigation: self.navigator.state(),
            is_desktop: self.is_desktop,
            mobile_view: self.mobile_view,
            overview_progress: self.overview_progress(),
            content: self.phase.as_ref().map(ActivePhase::view),
            completed: self.completed,
            show_scroll_hint: last && self.spec.scroll_hint.is_some(),
            scroll_hint: self.spec.scroll_hint.clone(),
            show_finale: last && self.spec.finale,
        }
    }
}

impl Drop for ActContainer {
    fn drop(&mut self) {
        self.unmount();
    }
}
