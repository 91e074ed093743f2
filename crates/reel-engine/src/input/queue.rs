use glam::Vec2;

/// Input event types the engine understands.
/// Generic: no show-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at page coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at page coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to page coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// A horizontal drag ended with offset `dx` in px.
    Swipe { dx: f32 },
    /// A custom event from the UI layer (buttons, media elements, layout).
    /// `kind` identifies the event type (see [`custom`]); `a`, `b`, `c`
    /// carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    /// Pointer position, for pointer events.
    pub fn pointer(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerUp { x, y }
            | InputEvent::PointerMove { x, y } => Some(Vec2::new(x, y)),
            _ => None,
        }
    }
}

/// Key codes the presentation reacts to.
pub mod keys {
    pub const ENTER: u32 = 13;
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const RIGHT: u32 = 39;
}

/// `Custom` event kinds sent by the web layer.
pub mod custom {
    /// `a` = act index scrolled into view.
    pub const FOCUS_ACT: u32 = 1;
    /// `a` = 1 for a wide viewport, 0 for narrow.
    pub const VIEWPORT: u32 = 2;
    /// `a` = act index.
    pub const NAV_PREV: u32 = 3;
    /// `a` = act index.
    pub const NAV_NEXT: u32 = 4;
    /// `a` = act index, `b` = phase index.
    pub const NAV_JUMP: u32 = 5;
    /// Primary button of the act's phase. `a` = act index.
    pub const ACTIVATE: u32 = 6;
    /// Media element event, addressed to the phase that owns the element.
    /// `a` = [`media_target`], `b` = buffered end (s), `c` = duration (s).
    pub const MEDIA: u32 = 7;
    /// `a` = width, `b` = height, in px.
    pub const RESIZE: u32 = 8;
    /// `a` = act index.
    pub const RESET_OVERVIEW: u32 = 9;
    /// `a` = act index.
    pub const SHOW_PHONE: u32 = 10;

    /// Pack act index, phase index (below 16) and media code (below 16)
    /// into the `a` slot of a [`MEDIA`] event.
    pub fn media_target(act: usize, phase: usize, code: u32) -> f32 {
        (((act << 8) | ((phase & 0xf) << 4)) as u32 | (code & 0xf)) as f32
    }

    /// Inverse of [`media_target`]: `(act, phase, code)`.
    /// `None` for values that cannot have been packed.
    pub fn split_media_target(a: f32) -> Option<(usize, usize, u32)> {
        if !a.is_finite() || a < 0.0 || a >= 16_777_216.0 || a.fract() != 0.0 {
            return None;
        }
        let packed = a as u32;
        Some(((packed >> 8) as usize, ((packed >> 4) & 0xf) as usize, packed & 0xf))
    }
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
