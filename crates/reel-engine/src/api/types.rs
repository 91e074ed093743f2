use bytemuck::{Pod, Zeroable};

/// A vibration request, in milliseconds.
/// The web layer forwards it to `navigator.vibrate` when available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct HapticCue(pub u32);

/// An event communicated from Rust to TypeScript through the shared buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ShowEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl ShowEvent {
    pub const FLOATS: usize = 4;

    /// The mounted phase finished. `a` = act index, `b` = phase index.
    pub const PHASE_COMPLETE: f32 = 1.0;
    /// A different phase was mounted. `a` = act index, `b` = phase index.
    pub const PHASE_CHANGED: f32 = 2.0;
    /// An act switched between overview and phone view.
    /// `a` = act index, `b` = 0 overview / 1 phone.
    pub const VIEW_CHANGED: f32 = 3.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }

    pub fn phase_complete(act: usize, phase: usize) -> Self {
        Self::new(Self::PHASE_COMPLETE, act as f32, phase as f32, 0.0)
    }

    pub fn phase_changed(act: usize, phase: usize) -> Self {
        Self::new(Self::PHASE_CHANGED, act as f32, phase as f32, 0.0)
    }

    pub fn view_changed(act: usize, phone: bool) -> Self {
        Self::new(Self::VIEW_CHANGED, act as f32, if phone { 1.0 } else { 0.0 }, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_is_four_packed_floats() {
        assert_eq!(std::mem::size_of::<ShowEvent>(), ShowEvent::FLOATS * 4);
        let events = [ShowEvent::phase_complete(2, 1)];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[ShowEvent::PHASE_COMPLETE, 2.0, 1.0, 0.0]);
    }
}
