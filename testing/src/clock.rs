use cwfcore::clock::Clock;
use std::sync::atomic::{
    AtomicI64,
    Ordering,
};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) -> i64 {
        self.0.fetch_add(secs, Ordering::SeqCst) + secs
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(1234567890)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed() {
        let clock = FixedClock::default();
        assert_eq!(clock.now(), 1234567890);
        assert_eq!(clock.advance(86400), 1234654290);
        assert_eq!(clock.now(), 1234654290);
        clock.set(0);
        assert_eq!(clock.now(), 0);
    }
}
