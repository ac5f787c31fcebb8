//! Debounced change notification.
//!
//! The notifier never spawns threads or timers of its own: arming it stores
//! a deadline, and the host event loop calls [`ChangeNotifier::poll`] to let
//! an expired deadline fire.

use crate::error::EditorError;
use crate::events::{EventTarget, Notification};
use log::debug;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ChangeNotifier {
    target: Weak<EventTarget>,
    interval: Duration,
    deadline: Option<Instant>,
    pending: bool,
}

impl ChangeNotifier {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(target: &Rc<EventTarget>) -> Self {
        Self {
            target: Rc::downgrade(target),
            interval: Self::DEFAULT_INTERVAL,
            deadline: None,
            pending: false,
        }
    }

    /// The target must still be alive and the interval a positive whole
    /// number of milliseconds.
    pub fn with_interval(target: Weak<EventTarget>, interval: Duration) -> Result<Self, EditorError> {
        if target.upgrade().is_none() {
            return Err(EditorError::InvalidArgument(
                "change target is not a live event target".into(),
            ));
        }
        if interval.is_zero() || interval.subsec_nanos() % 1_000_000 != 0 {
            return Err(EditorError::InvalidArgument(format!(
                "debounce interval must be a positive integer of milliseconds, got {interval:?}"
            )));
        }
        Ok(Self {
            target,
            interval,
            deadline: None,
            pending: false,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a debounced notification was requested. Firing does not clear
    /// it; only [`ChangeNotifier::notify_immediately`] does.
    pub fn has_pending_changes(&self) -> bool {
        self.pending
    }

    /// When the armed notification is due, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn notify_debounced(&mut self) {
        self.notify_debounced_at(Instant::now());
    }

    /// (Re)arms the single-shot deadline `interval` after `now`.
    pub fn notify_debounced_at(&mut self, now: Instant) {
        self.pending = true;
        self.deadline = Some(now + self.interval);
        debug!(target: "editor.change", "change debounced for {:?}", self.interval);
    }

    /// Cancels any armed deadline and dispatches `change` right away.
    pub fn notify_immediately(&mut self) {
        self.deadline = None;
        self.pending = false;
        self.dispatch();
    }

    /// Fires the armed notification if it is due at `now`. Returns whether
    /// it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.dispatch();
                true
            }
            _ => false,
        }
    }

    fn dispatch(&self) {
        match self.target.upgrade() {
            Some(target) => {
                target.dispatch(Notification::Change);
            }
            None => debug!(target: "editor.change", "change target is gone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting(target: &Rc<EventTarget>) -> Rc<Cell<usize>> {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        target.subscribe(Notification::Change, move |_| counter.set(counter.get() + 1));
        hits
    }

    #[test]
    fn bursts_coalesce_into_one_change_timed_from_the_last_call() {
        let target = EventTarget::new();
        let hits = counting(&target);
        let mut notifier = ChangeNotifier::new(&target);
        let start = Instant::now();
        let ms = Duration::from_millis;

        notifier.notify_debounced_at(start);
        notifier.notify_debounced_at(start + ms(200));
        notifier.notify_debounced_at(start + ms(400));

        assert!(!notifier.poll(start + ms(600)));
        assert_eq!(hits.get(), 0);
        assert!(notifier.poll(start + ms(900)));
        assert_eq!(hits.get(), 1);
        assert!(!notifier.poll(start + ms(5000)));
        assert_eq!(hits.get(), 1);
        assert!(notifier.has_pending_changes());
    }

    #[test]
    fn immediate_cancels_the_armed_deadline() {
        let target = EventTarget::new();
        let hits = counting(&target);
        let mut notifier = ChangeNotifier::new(&target);
        let start = Instant::now();

        notifier.notify_debounced_at(start);
        notifier.notify_immediately();
        assert_eq!(hits.get(), 1);
        assert!(notifier.deadline().is_none());
        assert!(!notifier.poll(start + Duration::from_secs(10)));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn immediate_does_not_need_pending_changes() {
        let target = EventTarget::new();
        let hits = counting(&target);
        let mut notifier = ChangeNotifier::new(&target);
        assert!(!notifier.has_pending_changes());
        notifier.notify_immediately();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn construction_checks_target_and_interval() {
        let target = EventTarget::new();
        let weak = Rc::downgrade(&target);
        assert!(ChangeNotifier::with_interval(weak.clone(), Duration::from_millis(250)).is_ok());
        assert!(matches!(
            ChangeNotifier::with_interval(weak.clone(), Duration::ZERO),
            Err(EditorError::InvalidArgument(_))
        ));
        assert!(matches!(
            ChangeNotifier::with_interval(weak.clone(), Duration::from_micros(1500)),
            Err(EditorError::InvalidArgument(_))
        ));
        drop(target);
        assert!(matches!(
            ChangeNotifier::with_interval(weak, Duration::from_millis(250)),
            Err(EditorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn default_interval_is_half_a_second() {
        let target = EventTarget::new();
        assert_eq!(ChangeNotifier::new(&target).interval(), Duration::from_millis(500));
    }
}
