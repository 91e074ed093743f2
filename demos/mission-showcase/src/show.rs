use std::rc::Rc;

use reel_engine::input::queue::{custom, keys};
use reel_engine::*;
use serde::Serialize;

const SCRIPT_JSON: &str = include_str!("../script.json");

/// Everything the page draws this frame.
#[derive(Debug, Clone, Serialize)]
pub struct ShowView {
    pub title: String,
    pub focused_act: usize,
    pub is_desktop: bool,
    pub acts: Vec<ActView>,
    pub rain: Vec<RainGlyph>,
}

/// Three scroll-stacked acts over a digital-rain backdrop.
/// Keyboard and pointer input go to the act in view. Buttons address their
/// act through custom events; media elements address their act and phase.
pub struct MissionShowcase {
    script: Rc<ShowScript>,
    acts: Vec<ActContainer>,
    rain: DigitalRain,
    focused: usize,
    is_desktop: bool,
    seed: u64,
}

impl MissionShowcase {
    pub fn new(seed: u64) -> Self {
        Self::with_script(load_script(SCRIPT_JSON), seed)
    }

    pub fn with_script(script: ShowScript, seed: u64) -> Self {
        let rain = DigitalRain::new(script.rain.clone(), seed ^ 0x5eed);
        Self {
            script: Rc::new(script),
            acts: Vec::new(),
            rain,
            focused: 0,
            is_desktop: true,
            seed,
        }
    }

    fn act_mut(&mut self, a: f32) -> Option<&mut ActContainer> {
        if !a.is_finite() || a < 0.0 {
            return None;
        }
        self.acts.get_mut(a as usize)
    }

    fn focused_mut(&mut self) -> Option<&mut ActContainer> {
        self.acts.get_mut(self.focused)
    }

    fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key_code } => match key_code {
                keys::LEFT => {
                    if let Some(act) = self.focused_mut() {
                        act.go_to_prev();
                    }
                }
                keys::RIGHT => {
                    if let Some(act) = self.focused_mut() {
                        act.go_to_next();
                    }
                }
                keys::ENTER | keys::SPACE => {
                    if let Some(act) = self.focused_mut() {
                        act.handle(&PhaseInput::Activate);
                    }
                }
                _ => {}
            },
            InputEvent::PointerDown { .. } => {
                if let Some(act) = self.focused_mut() {
                    act.handle(&PhaseInput::Press);
                }
            }
            InputEvent::PointerUp { .. } => {
                if let Some(act) = self.focused_mut() {
                    act.handle(&PhaseInput::Release);
                }
            }
            InputEvent::Swipe { dx } => {
                if let Some(act) = self.focused_mut() {
                    act.swipe(dx);
                }
            }
            InputEvent::Custom { kind, a, b, c } => self.apply_custom(kind, a, b, c),
            InputEvent::PointerMove { .. } | InputEvent::KeyUp { .. } => {}
        }
    }

    fn apply_custom(&mut self, kind: u32, a: f32, b: f32, c: f32) {
        match kind {
            custom::FOCUS_ACT => {
                if a.is_finite() && a >= 0.0 && (a as usize) < self.acts.len() {
                    self.focused = a as usize;
                    log::debug!("MissionShowcase: act {} in view", self.focused + 1);
                }
            }
            custom::VIEWPORT => {
                let is_desktop = a >= 0.5;
                if is_desktop != self.is_desktop {
                    log::info!("MissionShowcase: desktop layout = {}", is_desktop);
                    self.is_desktop = is_desktop;
                    for act in &mut self.acts {
                        act.set_desktop(is_desktop);
                    }
                }
            }
            custom::NAV_PREV => {
                if let Some(act) = self.act_mut(a) {
                    act.go_to_prev();
                }
            }
            custom::NAV_NEXT => {
                if let Some(act) = self.act_mut(a) {
                    act.go_to_next();
                }
            }
            custom::NAV_JUMP => {
                if b.is_finite() && b >= 0.0 {
                    if let Some(act) = self.act_mut(a) {
                        act.go_to_phase(b as usize);
                    }
                }
            }
            custom::ACTIVATE => {
                if let Some(act) = self.act_mut(a) {
                    act.handle(&PhaseInput::Activate);
                }
            }
            custom::MEDIA => {
                let decoded = custom::split_media_target(a).and_then(|(act, phase, code)| {
                    MediaEvent::from_code(code, b, c).map(|media| (act, phase, media))
                });
                match decoded {
                    Some((act, phase, media)) => {
                        if let Some(act) = self.acts.get_mut(act) {
                            act.handle_media(phase, media);
                        }
                    }
                    None => log::warn!("MissionShowcase: bad media target {}", a),
                }
            }
            custom::RESIZE => self.rain.resize(a, b),
            custom::RESET_OVERVIEW => {
                if let Some(act) = self.act_mut(a) {
                    act.reset_to_overview();
                }
            }
            custom::SHOW_PHONE => {
                if let Some(act) = self.act_mut(a) {
                    act.show_phone_view();
                }
            }
            other => log::warn!("MissionShowcase: unknown custom event {}", other),
        }
    }

    /// Move act events and haptics into the frame outbox.
    fn flush(&mut self, ctx: &mut StageContext) {
        for act in &mut self.acts {
            ctx.events.extend(act.drain_events());
            ctx.haptics.extend(act.drain_cues());
        }
    }
}

/// Parse the embedded script, falling back to the built-in one.
fn load_script(json: &str) -> ShowScript {
    match ShowScript::from_json(json) {
        Ok(script) => script,
        Err(e) => {
            log::error!("MissionShowcase: bad script ({e}), using defaults");
            ShowScript::default()
        }
    }
}

impl Show for MissionShowcase {
    type View = ShowView;

    fn init(&mut self, ctx: &mut StageContext) {
        let seed = self.seed;
        self.acts = (0..self.script.acts.len())
            .filter_map(|index| {
                let act_seed = seed.wrapping_add(index as u64 + 1);
                match ActContainer::new(index, Rc::clone(&self.script), self.is_desktop, act_seed) {
                    Ok(act) => Some(act),
                    Err(e) => {
                        log::error!("MissionShowcase: act {} skipped: {e}", index + 1);
                        None
                    }
                }
            })
            .collect();
        log::info!("MissionShowcase: {} acts ready", self.acts.len());
        self.flush(ctx);
    }

    fn update(&mut self, ctx: &mut StageContext, input: &InputQueue) {
        for event in input.iter() {
            self.apply(event);
        }

        let dt = ctx.dt_ms();
        for act in &mut self.acts {
            act.advance(dt);
        }
        self.rain.advance(dt);
        self.flush(ctx);
    }

    fn view(&self) -> ShowView {
        ShowView {
            title: self.script.title.clone(),
            focused_act: self.focused,
            is_desktop: self.is_desktop,
            acts: self.acts.iter().map(ActContainer::view).collect(),
            rain: self.rain.frame().to_vec(),
        }
    }

    fn focused_act(&self) -> usize {
        self.focused
    }
}
