//! Pulse animation for robot markers

/// Growth factor applied per tick while pulsing
pub const PULSE_STEP: f64 = 1.035;
/// Ticks spent growing before shrinking back
pub const PULSE_TICKS: u32 = 20;

/// Grow/shrink cycle expressed as a scale multiplier
#[derive(Debug, Clone, Default)]
pub struct PulseAnimation {
    enabled: bool,
    grow_count: u32,
    growing: bool,
}

impl PulseAnimation {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.grow_count = 0;
        self.growing = true;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Advance one animation frame
    pub fn tick(&mut self) {
        if !self.enabled {
            return;
        }
        if self.growing {
            self.grow_count += 1;
            self.growing = self.grow_count < PULSE_TICKS;
        } else {
            self.grow_count -= 1;
            self.growing = self.grow_count == 0;
        }
    }

    /// Multiplier for the marker's rendered scale
    pub fn factor(&self) -> f64 {
        PULSE_STEP.powi(self.grow_count as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_pulse_is_identity() {
        let mut pulse = PulseAnimation::default();
        pulse.tick();
        assert_eq!(pulse.factor(), 1.0);
    }

    #[test]
    fn full_cycle_returns_to_identity() {
        let mut pulse = PulseAnimation::default();
        pulse.set_enabled(true);
        for _ in 0..PULSE_TICKS {
            pulse.tick();
        }
        assert!((pulse.factor() - PULSE_STEP.powi(PULSE_TICKS as i32)).abs() < 1e-12);
        for _ in 0..PULSE_TICKS {
            pulse.tick();
        }
        assert_eq!(pulse.factor(), 1.0);
        // growing again
        pulse.tick();
        assert!(pulse.factor() > 1.0);
    }
}
