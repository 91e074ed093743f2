pub mod script;

pub use script::{ActSpec, MobileConfig, PhaseMeta, ShowScript};
