//! Drift-corrected fixed-rate timer
//!
//! Each firing measures how far it overshot its own deadline and schedules
//! the next one at `spacing - overshoot`, clamped at zero. While lateness
//! stays under one spacing the deadlines hold an absolute schedule, so
//! per-firing lag never accumulates and the long-run rate converges to the
//! nominal spacing. The winit loop parks on the deadline with
//! `ControlFlow::WaitUntil`; because firings happen on the event-loop
//! thread, at most one step is ever in flight.

use std::time::{Duration, Instant};

/// Nominal simulation rate.
pub const GENERATIONS_PER_SECOND: u32 = 60;

pub struct Scheduler {
    spacing: Duration,
    last_fire: Option<Instant>,
    deadline: Instant,
}

impl Scheduler {
    pub fn new(rate_hz: u32) -> Self {
        Self {
            spacing: Duration::from_secs(1) / rate_hz,
            last_fire: None,
            deadline: Instant::now(),
        }
    }

    /// Whether the next firing is due at `now`
    pub fn due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// When the next firing is scheduled
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Records a firing at `now` and schedules the next one
    ///
    /// The caller executes exactly one step per call. Overshoot is measured
    /// against the firing's own deadline, not the previous firing, so a
    /// firing that is always a little late cannot drag the schedule with it.
    pub fn fire(&mut self, now: Instant) {
        let delay = match self.last_fire {
            Some(_) => {
                let overshoot = now.saturating_duration_since(self.deadline);
                self.spacing.saturating_sub(overshoot)
            }
            None => self.spacing,
        };
        self.last_fire = Some(now);
        self.deadline = now + delay;
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_spacing_at_60hz() {
        let scheduler = Scheduler::new(60);
        assert_eq!(scheduler.spacing(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn test_first_fire_schedules_one_spacing_ahead() {
        let mut scheduler = Scheduler::new(60);
        let t0 = Instant::now();
        scheduler.fire(t0);
        assert_eq!(scheduler.deadline(), t0 + scheduler.spacing());
        assert!(!scheduler.due(t0));
        assert!(scheduler.due(t0 + scheduler.spacing()));
    }

    #[test]
    fn test_on_time_fire_keeps_full_spacing() {
        let mut scheduler = Scheduler::new(60);
        let spacing = scheduler.spacing();
        let t0 = Instant::now();
        scheduler.fire(t0);
        scheduler.fire(t0 + spacing);
        assert_eq!(scheduler.deadline(), t0 + spacing * 2);
    }

    #[test]
    fn test_late_fire_shortens_next_delay() {
        let mut scheduler = Scheduler::new(60);
        let spacing = scheduler.spacing();
        let t0 = Instant::now();
        scheduler.fire(t0);

        // 5ms overshoot comes straight off the next delay.
        let late = t0 + spacing + 5 * MS;
        scheduler.fire(late);
        assert_eq!(scheduler.deadline(), late + spacing - 5 * MS);
    }

    #[test]
    fn test_overshoot_beyond_spacing_clamps_to_zero() {
        let mut scheduler = Scheduler::new(60);
        let spacing = scheduler.spacing();
        let t0 = Instant::now();
        scheduler.fire(t0);

        let very_late = t0 + spacing * 3;
        scheduler.fire(very_late);
        assert_eq!(scheduler.deadline(), very_late);
        assert!(scheduler.due(very_late));
    }

    #[test]
    fn test_constant_lag_holds_nominal_rate() {
        let mut scheduler = Scheduler::new(60);
        let spacing = scheduler.spacing();
        let lag = 3 * MS;
        let t0 = Instant::now();
        scheduler.fire(t0);

        let mut last_fire = t0;
        for _ in 0..100 {
            last_fire = scheduler.deadline() + lag;
            scheduler.fire(last_fire);
        }

        // Lateness never accumulates: the deadlines stay on the absolute
        // schedule, so the average inter-fire interval is the nominal
        // spacing (here 100 intervals cover 100 spacings plus one lag).
        assert_eq!(scheduler.deadline(), t0 + spacing * 101);
        assert_eq!(last_fire - t0, spacing * 100 + lag);
    }

    #[test]
    fn test_single_late_firing_does_not_shift_the_train() {
        let mut scheduler = Scheduler::new(60);
        let spacing = scheduler.spacing();
        let t0 = Instant::now();
        scheduler.fire(t0);

        // One firing lands 4ms late; firing at each subsequent deadline
        // puts the train back on the nominal spacing immediately.
        let late = t0 + spacing + 4 * MS;
        scheduler.fire(late);
        let next = scheduler.deadline();
        scheduler.fire(next);
        assert_eq!(scheduler.deadline(), t0 + spacing * 3);
    }
}
