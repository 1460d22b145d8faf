//! One-shot countdowns driven by elapsed time.

/// A one-shot countdown.
///
/// The countdown does not read a clock. The owner feeds it elapsed
/// milliseconds through [`Countdown::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u32,
    fired: bool,
}

impl Countdown {
    /// Create a countdown that expires after `ms` milliseconds.
    pub fn new(ms: u32) -> Self {
        Self {
            remaining_ms: ms,
            fired: false,
        }
    }

    /// Advance by `elapsed_ms`.
    ///
    /// Returns true on the advance that expires the countdown and false on
    /// every other call, including later ones.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.fired = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once() {
        let mut countdown = Countdown::new(100);
        assert!(!countdown.advance(60));
        assert_eq!(countdown.remaining_ms(), 40);
        assert!(countdown.advance(60));
        assert!(countdown.is_expired());
        assert!(!countdown.advance(60));
    }

    #[test]
    fn zero_length_fires_on_first_advance() {
        let mut countdown = Countdown::new(0);
        assert!(!countdown.is_expired());
        assert!(countdown.advance(0));
    }
}
