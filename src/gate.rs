//! Shared-secret access gate.

/// Outcome of one password submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAttempt {
    Granted,
    Rejected,
    /// Nothing was typed; neither accepted nor rejected.
    Empty,
}

/// Per-session flag; once open it stays open until the session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessGate {
    open: bool,
}

impl AccessGate {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Exact comparison against `secret`. No hashing, no lockout.
    pub fn submit(&mut self, candidate: &str, secret: &str) -> GateAttempt {
        if candidate == secret {
            self.open = true;
            GateAttempt::Granted
        } else if candidate.is_empty() {
            GateAttempt::Empty
        } else {
            GateAttempt::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        assert!(!AccessGate::default().is_open());
    }

    #[test]
    fn test_correct_secret_opens() {
        let mut gate = AccessGate::default();
        assert_eq!(gate.submit("hunter2", "hunter2"), GateAttempt::Granted);
        assert!(gate.is_open());
    }

    #[test]
    fn test_wrong_secret_rejected_and_retry_allowed() {
        let mut gate = AccessGate::default();
        for _ in 0..5 {
            assert_eq!(gate.submit("hunter3", "hunter2"), GateAttempt::Rejected);
        }
        assert!(!gate.is_open());
        assert_eq!(gate.submit("hunter2", "hunter2"), GateAttempt::Granted);
    }

    #[test]
    fn test_compare_is_exact() {
        let mut gate = AccessGate::default();
        assert_eq!(gate.submit(" hunter2", "hunter2"), GateAttempt::Rejected);
        assert_eq!(gate.submit("HUNTER2", "hunter2"), GateAttempt::Rejected);
    }

    #[test]
    fn test_empty_input_is_neither() {
        let mut gate = AccessGate::default();
        assert_eq!(gate.submit("", "hunter2"), GateAttempt::Empty);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_stays_open_after_later_wrong_attempt() {
        let mut gate = AccessGate::default();
        gate.submit("hunter2", "hunter2");
        gate.submit("nope", "hunter2");
        assert!(gate.is_open());
    }
}
