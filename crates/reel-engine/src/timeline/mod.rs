// timeline/mod.rs
//
// Reusable text-reveal sub-timelines. Both are tick-driven step machines;
// the phase that owns one drives it from its own scheduler.

pub mod decrypt;
pub mod typewriter;

pub use decrypt::{DecryptLine, DecryptStep, DEFAULT_DECOY_GLYPHS};
pub use typewriter::{TypeStep, Typewriter};
