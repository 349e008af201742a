//! Client-side rate limiting

use std::time::Duration;
use tokio::time::Instant;

/// Admits at most one event per interval
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last: None,
        }
    }

    /// Whether an event arriving now should be delivered
    pub fn admit(&mut self) -> bool {
        self.admit_at(Instant::now())
    }

    pub fn admit_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn drops_events_inside_interval() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        assert!(throttle.admit());
        tokio::time::advance(Duration::from_millis(40)).await;
        assert!(!throttle.admit());
        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(throttle.admit());
        assert!(!throttle.admit());
    }

    #[test]
    fn zero_interval_admits_everything() {
        let mut throttle = Throttle::new(Duration::ZERO);
        let now = Instant::now();
        assert!(throttle.admit_at(now));
        assert!(throttle.admit_at(now));
    }
}
