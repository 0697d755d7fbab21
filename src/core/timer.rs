//! Periodic timer, driven by the application's event loop

use std::time::Duration;

use crate::core::time::Timestamp;

/// Tracks the deadline of a periodic task.
///
/// The timer does not sleep or spawn anything: the event loop asks it when the next tick is due
/// and reports back when the tick has been fired.
#[derive(Debug)]
pub struct IntervalTimer {
    period: Duration,
    next_deadline: Option<Timestamp>,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.next_deadline
    }

    /// Schedules the first deadline one period after `now`
    pub fn arm(&mut self, now: Timestamp) {
        self.next_deadline = Some(now + self.period);
    }

    /// Removes any pending deadline
    pub fn cancel(&mut self) {
        self.next_deadline = None;
    }

    /// Changes the period of the timer.
    ///
    /// If the timer is armed, the pending deadline is dropped and a new one is scheduled one
    /// new period after `now`.
    pub fn reschedule(&mut self, period: Duration, now: Timestamp) {
        self.period = period;

        if self.is_armed() {
            self.arm(now);
        }
    }

    /// Returns true if the timer is armed and its deadline has been reached
    pub fn is_due(&self, now: Timestamp) -> bool {
        matches!(self.next_deadline, Some(deadline) if deadline <= now)
    }

    /// Moves the deadline to the next period, after a tick has been fired at `now`.
    ///
    /// Periods missed because the tick fired late are skipped rather than fired in a burst.
    pub fn advance(&mut self, now: Timestamp) {
        if let Some(deadline) = self.next_deadline {
            let next = deadline + self.period;
            self.next_deadline = Some(if next <= now { now + self.period } else { next });
        }
    }

    /// Time left before the deadline, zero if it has passed, `None` if the timer is not armed
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        self.next_deadline.map(|deadline| deadline.duration_since(&now))
    }
}

#[cfg(test)]
mod test_interval_timer {
    use std::time::Duration;

    use rstest::*;

    use crate::core::time::Timestamp;
    use crate::core::timer::IntervalTimer;

    #[fixture]
    fn timer() -> IntervalTimer {
        IntervalTimer::new(Duration::from_millis(1000))
    }

    #[rstest]
    fn test_should_not_be_due_when_not_armed(timer: IntervalTimer) {
        let now = Timestamp::now();

        assert!(!timer.is_armed());
        assert!(!timer.is_due(now + Duration::from_secs(10)));
        assert_eq!(timer.remaining(now), None);
    }

    #[rstest]
    fn test_should_be_due_one_period_after_arming(mut timer: IntervalTimer) {
        let now = Timestamp::now();
        timer.arm(now);

        assert!(!timer.is_due(now + Duration::from_millis(999)));
        assert!(timer.is_due(now + Duration::from_millis(1000)));
    }

    #[rstest]
    fn test_should_advance_by_one_period_when_on_time(mut timer: IntervalTimer) {
        let now = Timestamp::now();
        timer.arm(now);

        let tick = now + Duration::from_millis(1010);
        timer.advance(tick);

        assert_eq!(timer.next_deadline(), Some(now + Duration::from_millis(2000)));
    }

    #[rstest]
    fn test_should_skip_missed_periods_when_late(mut timer: IntervalTimer) {
        let now = Timestamp::now();
        timer.arm(now);

        let late_tick = now + Duration::from_millis(3500);
        timer.advance(late_tick);

        assert_eq!(timer.next_deadline(), Some(late_tick + Duration::from_millis(1000)));
    }

    #[rstest]
    fn test_should_rearm_with_new_period_when_rescheduled(mut timer: IntervalTimer) {
        let now = Timestamp::now();
        timer.arm(now);

        let later = now + Duration::from_millis(300);
        timer.reschedule(Duration::from_millis(5000), later);

        assert_eq!(timer.period(), Duration::from_millis(5000));
        assert_eq!(timer.next_deadline(), Some(later + Duration::from_millis(5000)));
    }

    #[rstest]
    fn test_should_stay_unarmed_when_rescheduled_while_cancelled(mut timer: IntervalTimer) {
        timer.reschedule(Duration::from_millis(5000), Timestamp::now());

        assert!(!timer.is_armed());
    }

    #[rstest]
    fn test_should_not_be_due_after_cancel(mut timer: IntervalTimer) {
        let now = Timestamp::now();
        timer.arm(now);
        timer.cancel();

        assert!(!timer.is_due(now + Duration::from_secs(60)));
    }

    #[rstest]
    fn test_remaining_should_be_zero_once_deadline_passed(mut timer: IntervalTimer) {
        let now = Timestamp::now();
        timer.arm(now);

        assert_eq!(timer.remaining(now), Some(Duration::from_millis(1000)));
        assert_eq!(timer.remaining(now + Duration::from_secs(5)), Some(Duration::ZERO));
    }
}
