//! Completion dissolve: an inside-out ripple that replaces blocks with a
//! rising glow, one cell per timer interval.

use crate::clock::{TimerFired, TimerId, TimerQueue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;
use voxstage_common::{GridCoord, MountId};
use voxstage_scene::LevelScene;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DissolveConfig {
    /// Time between two dequeued cells.
    pub interval_ms: u64,
    /// Length of one rising-glow animation.
    pub rise_duration_ms: u64,
    /// Total float distance, in tile sizes.
    pub rise_height: f32,
    /// Extra scale reached at the end of the rise.
    pub glow_scale: f32,
}

impl DissolveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn rise_duration(&self) -> Duration {
        Duration::from_millis(self.rise_duration_ms)
    }
}

impl Default for DissolveConfig {
    fn default() -> Self {
        Self {
            interval_ms: 50,
            rise_duration_ms: 1500,
            rise_height: 1.5,
            glow_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DissolvePhase {
    Idle,
    Sequencing,
    Done,
}

/// One cell leaving the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DissolveEvent {
    pub coord: GridCoord,
    pub at: Duration,
    /// Cells still queued after this one.
    pub remaining: usize,
}

/// Sampled state of a rising glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowFrame {
    /// Normalized time in `[0, 1)`.
    pub progress: f32,
    pub opacity: f32,
    pub scale: f32,
    /// Float distance in tile sizes.
    pub rise: f32,
}

/// Dissolvable cells ordered by distance from the grid centre, ties in scan
/// order.
pub fn dissolve_order(scene: &LevelScene) -> Vec<GridCoord> {
    let center = scene.center();
    let mut cells: Vec<(GridCoord, f32)> = scene
        .cells()
        .filter(|(_, code)| code.is_dissolvable())
        .map(|(coord, _)| (coord, coord.distance_to(center)))
        .collect();
    // stable: equal distances keep scan order
    cells.sort_by(|a, b| a.1.total_cmp(&b.1));
    cells.into_iter().map(|(coord, _)| coord).collect()
}

/// `Idle -> Sequencing -> Done` state machine for one mount.
#[derive(Debug)]
pub struct DissolveSequencer {
    config: DissolveConfig,
    owner: MountId,
    phase: DissolvePhase,
    queue: VecDeque<GridCoord>,
    /// Dissolved cells with the time their glow started.
    dissolved: BTreeMap<GridCoord, Duration>,
    emitted: Vec<GridCoord>,
    timer: Option<TimerId>,
}

impl DissolveSequencer {
    pub fn new(config: DissolveConfig, owner: MountId) -> Self {
        Self {
            config,
            owner,
            phase: DissolvePhase::Idle,
            queue: VecDeque::new(),
            dissolved: BTreeMap::new(),
            emitted: Vec::new(),
            timer: None,
        }
    }

    pub fn phase(&self) -> DissolvePhase {
        self.phase
    }

    /// Start the sequence. Only acts from `Idle`; returns whether it did.
    pub fn trigger(&mut self, scene: &LevelScene, timers: &mut TimerQueue) -> bool {
        if self.phase != DissolvePhase::Idle {
            tracing::trace!(phase = ?self.phase, "dissolve trigger ignored");
            return false;
        }
        self.queue = dissolve_order(scene).into();
        if self.queue.is_empty() {
            tracing::debug!("dissolve: nothing to dissolve, idle -> done");
            self.phase = DissolvePhase::Done;
            return true;
        }
        tracing::debug!(cells = self.queue.len(), "dissolve: idle -> sequencing");
        self.timer = Some(timers.schedule_repeating(self.owner, self.config.interval()));
        self.phase = DissolvePhase::Sequencing;
        true
    }

    /// Handle a timer fire. Fires for other timers or mounts are ignored.
    pub fn on_timer(
        &mut self,
        fired: &TimerFired,
        timers: &mut TimerQueue,
    ) -> Option<DissolveEvent> {
        if fired.owner != self.owner
            || self.phase != DissolvePhase::Sequencing
            || self.timer != Some(fired.id)
        {
            return None;
        }
        let coord = self.queue.pop_front()?;
        self.dissolved.insert(coord, fired.at);
        self.emitted.push(coord);
        let remaining = self.queue.len();
        tracing::trace!(%coord, remaining, "dissolve step");

        if remaining == 0 {
            if let Some(id) = self.timer.take() {
                timers.cancel(id);
            }
            self.phase = DissolvePhase::Done;
            tracing::debug!(cells = self.dissolved.len(), "dissolve: sequencing -> done");
        }
        Some(DissolveEvent {
            coord,
            at: fired.at,
            remaining,
        })
    }

    /// Cancel the pending timer (teardown). State is left as is.
    pub fn cancel(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
            tracing::debug!(pending = self.queue.len(), "dissolve cancelled");
        }
    }

    pub fn is_dissolved(&self, coord: GridCoord) -> bool {
        self.dissolved.contains_key(&coord)
    }

    pub fn dissolved_count(&self) -> usize {
        self.dissolved.len()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Cells in the order they dissolved.
    pub fn emitted(&self) -> &[GridCoord] {
        &self.emitted
    }

    /// Glow for a dissolved cell at `now`, or `None` once the rise is over.
    pub fn glow_at(&self, coord: GridCoord, now: Duration) -> Option<GlowFrame> {
        let started = *self.dissolved.get(&coord)?;
        let duration = self.config.rise_duration().as_secs_f32();
        if duration <= 0.0 {
            return None;
        }
        let t = now.saturating_sub(started).as_secs_f32() / duration;
        if t >= 1.0 {
            return None;
        }
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        Some(GlowFrame {
            progress: t,
            opacity: 1.0 - t,
            scale: 1.0 + self.config.glow_scale * t,
            rise: self.config.rise_height * eased,
        })
    }

    /// All glows still animating at `now`, in grid order.
    pub fn active_glows(&self, now: Duration) -> impl Iterator<Item = (GridCoord, GlowFrame)> + '_ {
        self.dissolved
            .keys()
            .filter_map(move |&coord| self.glow_at(coord, now).map(|g| (coord, g)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(50);

    fn scene(grid: Vec<Vec<i32>>) -> LevelScene {
        LevelScene::new(grid, "meadow").unwrap()
    }

    fn run(seq: &mut DissolveSequencer, timers: &mut TimerQueue, dt: Duration) -> Vec<DissolveEvent> {
        timers
            .advance(dt)
            .iter()
            .filter_map(|f| seq.on_timer(f, timers))
            .collect()
    }

    #[test]
    fn order_is_inside_out() {
        let mut grid = vec![vec![1; 8]; 8];
        grid[0][0] = 3;
        grid[7][7] = 0;
        let s = scene(grid);
        let order = dissolve_order(&s);
        assert_eq!(order.len(), 62);
        let center = s.center();
        for pair in order.windows(2) {
            assert!(pair[0].distance_to(center) <= pair[1].distance_to(center));
        }
        assert!(!order.contains(&GridCoord::new(0, 0)));
    }

    #[test]
    fn ties_keep_scan_order() {
        let s = scene(vec![vec![2, 0, 2], vec![0, 0, 0], vec![2, 0, 2]]);
        assert_eq!(
            dissolve_order(&s),
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 2),
                GridCoord::new(2, 0),
                GridCoord::new(2, 2)
            ]
        );
    }

    #[test]
    fn single_centre_cell_finishes_after_one_interval() {
        let mut grid = vec![vec![0; 8]; 8];
        grid[4][4] = 2;
        let s = scene(grid);
        let mut timers = TimerQueue::new();
        let mut seq = DissolveSequencer::new(DissolveConfig::default(), MountId::new());

        assert!(seq.trigger(&s, &mut timers));
        assert_eq!(seq.phase(), DissolvePhase::Sequencing);
        assert!(run(&mut seq, &mut timers, STEP - Duration::from_millis(1)).is_empty());

        let events = run(&mut seq, &mut timers, Duration::from_millis(1));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].coord, GridCoord::new(4, 4));
        assert_eq!(seq.phase(), DissolvePhase::Done);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn every_dissolvable_cell_dissolves_once() {
        let s = scene(vec![vec![1, 2, 3, 0], vec![2, 2, 1, 3]]);
        let mut timers = TimerQueue::new();
        let mut seq = DissolveSequencer::new(DissolveConfig::default(), MountId::new());
        seq.trigger(&s, &mut timers);
        let events = run(&mut seq, &mut timers, Duration::from_secs(2));
        assert_eq!(events.len(), 5);
        assert_eq!(seq.dissolved_count(), 5);
        assert_eq!(seq.pending_count(), 0);
        assert_eq!(seq.phase(), DissolvePhase::Done);
        assert_eq!(seq.emitted(), dissolve_order(&s).as_slice());
    }

    #[test]
    fn retrigger_is_a_no_op() {
        let s = scene(vec![vec![1, 1, 1]]);
        let mut timers = TimerQueue::new();
        let mut seq = DissolveSequencer::new(DissolveConfig::default(), MountId::new());
        assert!(seq.trigger(&s, &mut timers));
        run(&mut seq, &mut timers, STEP);
        let (dissolved, pending) = (seq.dissolved_count(), seq.pending_count());

        assert!(!seq.trigger(&s, &mut timers));
        assert_eq!(timers.pending(), 1);
        assert_eq!((seq.dissolved_count(), seq.pending_count()), (dissolved, pending));

        run(&mut seq, &mut timers, STEP * 10);
        assert_eq!(seq.phase(), DissolvePhase::Done);
        assert!(!seq.trigger(&s, &mut timers));
        assert_eq!(seq.dissolved_count(), 3);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn empty_grid_goes_straight_to_done() {
        let s = scene(vec![vec![0, 3], vec![3, 0]]);
        let mut timers = TimerQueue::new();
        let mut seq = DissolveSequencer::new(DissolveConfig::default(), MountId::new());
        assert!(seq.trigger(&s, &mut timers));
        assert_eq!(seq.phase(), DissolvePhase::Done);
        assert_eq!(timers.pending(), 0);
        assert_eq!(seq.dissolved_count(), 0);
    }

    #[test]
    fn cancel_stops_the_sequence() {
        let s = scene(vec![vec![1; 4]; 4]);
        let mut timers = TimerQueue::new();
        let mut seq = DissolveSequencer::new(DissolveConfig::default(), MountId::new());
        seq.trigger(&s, &mut timers);
        run(&mut seq, &mut timers, STEP * 2);
        seq.cancel(&mut timers);
        let before = seq.dissolved_count();
        assert!(run(&mut seq, &mut timers, Duration::from_secs(5)).is_empty());
        assert_eq!(seq.dissolved_count(), before);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn foreign_fires_are_ignored() {
        let s = scene(vec![vec![1, 1]]);
        let mut timers = TimerQueue::new();
        let mut seq = DissolveSequencer::new(DissolveConfig::default(), MountId::new());
        seq.trigger(&s, &mut timers);
        let other = timers.schedule_once(MountId::new(), Duration::from_millis(1));
        let fired = timers.advance(Duration::from_millis(1));
        assert_eq!(fired[0].id, other);
        assert!(seq.on_timer(&fired[0], &mut timers).is_none());
        assert_eq!(seq.dissolved_count(), 0);
    }

    #[test]
    fn glow_rises_and_expires() {
        let s = scene(vec![vec![2]]);
        let mut timers = TimerQueue::new();
        let mut seq = DissolveSequencer::new(DissolveConfig::default(), MountId::new());
        seq.trigger(&s, &mut timers);
        run(&mut seq, &mut timers, STEP);
        let c = GridCoord::new(0, 0);

        let start = seq.glow_at(c, STEP).unwrap();
        assert_eq!(start.opacity, 1.0);
        assert_eq!(start.rise, 0.0);

        let mid = seq.glow_at(c, STEP + Duration::from_millis(750)).unwrap();
        assert!(mid.opacity < 1.0 && mid.rise > 0.0 && mid.scale > 1.0);

        assert!(seq.glow_at(c, STEP + Duration::from_millis(1500)).is_none());
        assert_eq!(seq.active_glows(Duration::from_secs(10)).count(), 0);
        // the cell stays dissolved after its glow ends
        assert!(seq.is_dissolved(c));
    }
}
