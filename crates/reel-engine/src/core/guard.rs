/// One-shot latch for "this phase is done".
///
/// A timer and an input can both decide the phase finished within the same
/// frame; only the first `try_complete` wins.
#[derive(Debug, Clone, Default)]
pub struct CompletionGuard {
    latched: bool,
}

impl CompletionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the guard. Returns `true` only for the call that latched it.
    pub fn try_complete(&mut self) -> bool {
        !std::mem::replace(&mut self.latched, true)
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_call_wins() {
        let mut guard = CompletionGuard::new();
        assert!(!guard.is_latched());
        assert!(guard.try_complete());
        assert!(!guard.try_complete());
        assert!(!guard.try_complete());
        assert!(guard.is_latched());
    }
}
