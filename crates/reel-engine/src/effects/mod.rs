pub mod rain;
pub mod rng;

pub use rain::{DigitalRain, RainConfig, RainGlyph, DEFAULT_RAIN_GLYPHS};
pub use rng::Rng;
