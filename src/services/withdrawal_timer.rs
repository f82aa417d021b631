use crate::utils::format_mm_ss;

/// Remaining withdrawal-lock time for the session account. `None` means the
/// contract reported nothing (no contribution yet, or not read).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WithdrawalTimer {
    remaining: Option<u64>,
}

impl WithdrawalTimer {
    pub fn unknown() -> Self {
        Self { remaining: None }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            remaining: Some(seconds),
        }
    }

    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// The poller only runs while there is time left to count down.
    pub fn is_running(&self) -> bool {
        matches!(self.remaining, Some(seconds) if seconds > 0)
    }

    pub fn withdraw_locked(&self) -> bool {
        self.is_running()
    }

    /// One poller tick. Never goes below zero; returns whether anything
    /// changed.
    pub fn tick(&mut self) -> bool {
        match self.remaining.as_mut() {
            Some(seconds) if *seconds > 0 => {
                *seconds -= 1;
                true
            }
            _ => false,
        }
    }

    /// `MM:SS` while locked; hidden (`None`) otherwise.
    pub fn display(&self) -> Option<String> {
        match self.remaining {
            Some(seconds) if seconds > 0 => Some(format_mm_ss(seconds)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_decrements_and_renders() {
        let mut timer = WithdrawalTimer::from_seconds(65);
        assert!(timer.tick());
        assert_eq!(timer.remaining(), Some(64));
        assert_eq!(timer.display().as_deref(), Some("01:04"));
        assert!(timer.withdraw_locked());
    }

    #[test]
    fn reaching_zero_unlocks_and_hides() {
        let mut timer = WithdrawalTimer::from_seconds(1);
        assert!(timer.tick());
        assert_eq!(timer.remaining(), Some(0));
        assert!(!timer.withdraw_locked());
        assert!(!timer.is_running());
        assert_eq!(timer.display(), None);
    }

    #[test]
    fn never_goes_negative() {
        let mut timer = WithdrawalTimer::from_seconds(0);
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert_eq!(timer.remaining(), Some(0));
    }

    #[test]
    fn unknown_timer_is_idle_and_unlocked() {
        let mut timer = WithdrawalTimer::unknown();
        assert!(!timer.tick());
        assert!(!timer.withdraw_locked());
        assert_eq!(timer.display(), None);
    }
}
