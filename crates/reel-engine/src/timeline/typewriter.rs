//! Character-by-character text reveal.
//!
//! The typewriter itself keeps no clock. Its owner schedules a tick every
//! `delay()` ms on its own scheduler and calls [`Typewriter::tick`]; tearing
//! the owner down cancels that chain, so a half-typed line simply stops.

use crate::core::time::Millis;

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeStep {
    /// One more character is visible; schedule the next tick.
    Typed,
    /// The whole string is visible. Reported exactly once.
    Complete,
    /// Already complete; the tick changed nothing.
    Idle,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    revealed: usize,
    delay: Millis,
    done: bool,
}

impl Typewriter {
    pub fn new(text: &str, delay: Millis) -> Self {
        Self {
            chars: text.chars().collect(),
            revealed: 0,
            delay,
            done: false,
        }
    }

    /// Per-character delay.
    pub fn delay(&self) -> Millis {
        self.delay
    }

    pub fn tick(&mut self) -> TypeStep {
        if self.done {
            return TypeStep::Idle;
        }
        if self.revealed < self.chars.len() {
            self.revealed += 1;
        }
        if self.revealed == self.chars.len() {
            self.done = true;
            TypeStep::Complete
        } else {
            TypeStep::Typed
        }
    }

    /// The visible prefix.
    pub fn displayed(&self) -> String {
        self.chars[..self.revealed].iter().collect()
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.done
    }

    /// Whether a cursor should trail the text.
    pub fn is_typing(&self) -> bool {
        !self.done
    }
}
