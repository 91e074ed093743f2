pub mod guard;
pub mod scheduler;
pub mod time;
