//! Cosmetic countdown shown in the corner of the pond

/// Whole-second countdown that stops at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// One second elapsed. Returns false once already at zero.
    pub fn tick_second(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// `m:ss`
    pub fn label(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Countdown::new(60).label(), "1:00");
        assert_eq!(Countdown::new(59).label(), "0:59");
        assert_eq!(Countdown::new(5).label(), "0:05");
        assert_eq!(Countdown::new(0).label(), "0:00");
        assert_eq!(Countdown::new(125).label(), "2:05");
    }

    #[test]
    fn test_counts_down_to_zero_and_stops() {
        let mut c = Countdown::default();
        let mut ticks = 0;
        while c.tick_second() {
            ticks += 1;
        }
        assert_eq!(ticks, 60);
        assert!(c.is_finished());
        assert!(!c.tick_second());
        assert_eq!(c.remaining(), 0);
    }
}
