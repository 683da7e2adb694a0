//! Scratch counter behind the `/sandbox` page.

/// An integer counter starting at zero with no floor or ceiling.
///
/// Values saturate at the `i64` limits instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    value: i64,
}

impl Counter {
    /// A counter at zero.
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Current value.
    pub const fn value(self) -> i64 {
        self.value
    }

    /// Add one and return the new value.
    pub const fn increment(&mut self) -> i64 {
        self.value = self.value.saturating_add(1);
        self.value
    }

    /// Subtract one and return the new value.
    pub const fn decrement(&mut self) -> i64 {
        self.value = self.value.saturating_sub(1);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(Counter::new().value(), 0);
        assert_eq!(Counter::default(), Counter::new());
    }

    #[test]
    fn increment_then_decrement() {
        let mut c = Counter::new();
        assert_eq!(c.increment(), 1);
        assert_eq!(c.decrement(), 0);
    }

    #[test]
    fn no_floor_below_zero() {
        let mut c = Counter::new();
        assert_eq!(c.decrement(), -1);
        assert_eq!(c.decrement(), -2);
    }

    #[test]
    fn saturates_at_limits() {
        let mut c = Counter { value: i64::MAX };
        assert_eq!(c.increment(), i64::MAX);
        let mut c = Counter { value: i64::MIN };
        assert_eq!(c.decrement(), i64::MIN);
    }
}
