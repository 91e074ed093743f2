pub mod api;
pub mod bridge;
pub mod config;
pub mod core;
pub mod effects;
pub mod error;
pub mod input;
pub mod phases;
pub mod showcase;
pub mod timeline;

// Re-export key types at crate root for convenience
pub use api::show::{Show, ShowConfig, StageContext};
pub use api::types::{HapticCue, ShowEvent};
pub use bridge::protocol::ProtocolLayout;
pub use config::script::{ActSpec, MobileConfig, PhaseMeta, ShowScript};
pub use core::guard::CompletionGuard;
pub use core::scheduler::{Scheduler, TimerId};
pub use core::time::{FixedTimestep, Millis};
pub use effects::{DigitalRain, RainConfig, RainGlyph, Rng};
pub use error::{CipherError, ConfigError, NavigationError};
pub use input::queue::{InputEvent, InputQueue};
pub use phases::{
    ActivePhase, MediaEvent, PhaseInput, PhaseKind, PhaseMachine, PhaseRuntime, PhaseView,
};
pub use showcase::{ActContainer, ActView, MobileView, NavigationState, PhaseCard, PhaseNavigator};
pub use timeline::{DecryptLine, DecryptStep, TypeStep, Typewriter};
