pub mod act;
pub mod navigator;

pub use act::{ActContainer, ActView, MobileView, PhaseCard};
pub use navigator::{NavigationState, PhaseNavigator};
