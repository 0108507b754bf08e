use std::time::Duration;
use voxstage_common::MountId;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due during `TimerQueue::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub id: TimerId,
    /// Mount that scheduled the timer; receivers drop fires for other mounts.
    pub owner: MountId,
    /// Virtual time at which the timer was due.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    owner: MountId,
    due: Duration,
    interval: Option<Duration>,
}

/// Deterministic virtual-time scheduler.
///
/// Nothing runs on its own: the owner calls `advance` with the frame delta
/// and dispatches the returned fires. Tests drive it with synthetic deltas.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a single fire `delay` from now.
    pub fn schedule_once(&mut self, owner: MountId, delay: Duration) -> TimerId {
        self.insert(owner, delay, None)
    }

    /// Schedule a fire every `interval`, first one `interval` from now.
    /// A zero interval is raised to one microsecond.
    pub fn schedule_repeating(&mut self, owner: MountId, interval: Duration) -> TimerId {
        let interval = interval.max(Duration::from_micros(1));
        self.insert(owner, interval, Some(interval))
    }

    fn insert(&mut self, owner: MountId, delay: Duration, interval: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            owner,
            due: self.now + delay,
            interval,
        });
        tracing::trace!(?id, ?delay, repeating = interval.is_some(), "timer scheduled");
        id
    }

    /// Cancel one timer. Returns false if it was not scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Cancel every timer scheduled by `owner`. Returns how many were removed.
    pub fn cancel_owner(&mut self, owner: MountId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of scheduled timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Move virtual time forward by `dt` and return every fire that came due,
    /// in due order (ties by scheduling order). A repeating timer fires once
    /// per elapsed interval.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerFired> {
        let target = self.now + dt;
        let mut fired = Vec::new();
        loop {
            let next = self
                .timers
                .iter_mut()
                .filter(|t| t.due <= target)
                .min_by_key(|t| (t.due, t.id));
            let Some(timer) = next else {
                break;
            };
            let fire = TimerFired {
                id: timer.id,
                owner: timer.owner,
                at: timer.due,
            };
            self.now = timer.due;
            match timer.interval {
                Some(interval) => timer.due += interval,
                None => {
                    let id = timer.id;
                    self.timers.retain(|t| t.id != id);
                }
            }
            fired.push(fire);
        }
        self.now = target;
        fired
    }
}
