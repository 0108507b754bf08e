/// Token for one acquired per-frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopHandle(pub u64);

#[derive(Debug, thiserror::Error)]
pub enum FrameLoopError {
    #[error("no display surface available")]
    NoSurface,
}

/// Host-provided animation-frame loop.
///
/// The composer acquires one loop per interactive mount and releases it on
/// unmount. Without a loop, `tick` is a no-op and the scene keeps its first
/// frame.
pub trait FrameSource {
    fn acquire(&mut self) -> Result<LoopHandle, FrameLoopError>;
    fn release(&mut self, handle: LoopHandle);
}

/// Always-available loop for headless hosts and tests. Tracks which loops
/// are live so leaks are observable.
#[derive(Debug, Default)]
pub struct HeadlessFrameSource {
    next: u64,
    active: Vec<LoopHandle>,
    acquired_total: u64,
}

impl HeadlessFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loops acquired and not yet released.
    pub fn active_loops(&self) -> usize {
        self.active.len()
    }

    pub fn acquired_total(&self) -> u64 {
        self.acquired_total
    }
}

impl FrameSource for HeadlessFrameSource {
    fn acquire(&mut self) -> Result<LoopHandle, FrameLoopError> {
        let handle = LoopHandle(self.next);
        self.next += 1;
        self.acquired_total += 1;
        self.active.push(handle);
        tracing::trace!(?handle, "frame loop acquired");
        Ok(handle)
    }

    fn release(&mut self, handle: LoopHandle) {
        self.active.retain(|h| *h != handle);
        tracing::trace!(?handle, "frame loop released");
    }
}

/// A host with no display surface: every acquisition fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSurface;

impl FrameSource for NoSurface {
    fn acquire(&mut self) -> Result<LoopHandle, FrameLoopError> {
        Err(FrameLoopError::NoSurface)
    }

    fn release(&mut self, _handle: LoopHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_tracks_live_loops() {
        let mut source = HeadlessFrameSource::new();
        let a = source.acquire().unwrap();
        let b = source.acquire().unwrap();
        assert_ne!(a, b);
        assert_eq!(source.active_loops(), 2);
        source.release(a);
        assert_eq!(source.active_loops(), 1);
        // releasing twice is harmless
        source.release(a);
        assert_eq!(source.active_loops(), 1);
        assert_eq!(source.acquired_total(), 2);
    }

    #[test]
    fn no_surface_never_acquires() {
        assert!(matches!(NoSurface.acquire(), Err(FrameLoopError::NoSurface)));
    }
}
