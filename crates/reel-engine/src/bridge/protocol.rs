/// Shared buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Events: max_events × 4 floats]
/// [Haptics: max_haptics × 1 float]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.
/// The view model travels separately as JSON.

use crate::api::show::ShowConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_EVENTS: usize = 3;
pub const HEADER_EVENT_COUNT: usize = 4;
pub const HEADER_MAX_HAPTICS: usize = 5;
pub const HEADER_HAPTIC_COUNT: usize = 6;
pub const HEADER_FOCUSED_ACT: usize = 7;
pub const HEADER_VIEW_REVISION: usize = 8;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per show event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

/// Floats per haptic cue: duration in ms.
pub const HAPTIC_FLOATS: usize = 1;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum show events per frame.
    pub max_events: usize,
    /// Maximum haptic cues per frame.
    pub max_haptics: usize,

    pub event_data_floats: usize,
    pub haptic_data_floats: usize,

    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,
    /// Offset (in floats) where haptic data begins.
    pub haptic_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_events: usize, max_haptics: usize) -> Self {
        let event_data_floats = max_events * EVENT_FLOATS;
        let haptic_data_floats = max_haptics * HAPTIC_FLOATS;

        let event_data_offset = HEADER_FLOATS;
        let haptic_data_offset = event_data_offset + event_data_floats;

        let buffer_total_floats = haptic_data_offset + haptic_data_floats;

        Self {
            max_events,
            max_haptics,
            event_data_floats,
            haptic_data_floats,
            event_data_offset,
            haptic_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &ShowConfig) -> Self {
        Self::new(config.max_events, config.max_haptics)
    }

    /// A zeroed buffer of the right size with capacities and version filled in.
    pub fn new_buffer(&self) -> Vec<f32> {
        let mut buffer = vec![0.0; self.buffer_total_floats];
        buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buffer[HEADER_MAX_EVENTS] = self.max_events as f32;
        buffer[HEADER_MAX_HAPTICS] = self.max_haptics as f32;
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_sizes() {
        let layout = ProtocolLayout::from_config(&ShowConfig::default());
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.max_haptics, 8);
        assert_eq!(layout.event_data_offset, HEADER_FLOATS);
        assert_eq!(layout.haptic_data_offset, HEADER_FLOATS + 32 * 4);
        assert_eq!(layout.buffer_total_floats, HEADER_FLOATS + 32 * 4 + 8);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(5, 3);
        assert_eq!(layout.haptic_data_offset, layout.event_data_offset + layout.event_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.haptic_data_offset + layout.haptic_data_floats);
    }

    #[test]
    fn fresh_buffer_carries_header() {
        let layout = ProtocolLayout::new(4, 2);
        let buffer = layout.new_buffer();
        assert_eq!(buffer.len(), layout.buffer_total_floats);
        assert_eq!(buffer[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(buffer[HEADER_MAX_EVENTS], 4.0);
        assert_eq!(buffer[HEADER_MAX_HAPTICS], 2.0);
        assert_eq!(buffer[HEADER_EVENT_COUNT], 0.0);
    }
}
