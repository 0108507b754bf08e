use std::cell::RefCell;
use std::rc::Rc;
use voxstage_common::GridCoord;
use voxstage_scene::TileCode;

/// The pointer started hovering a block. Hosts typically play a tap cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverCue {
    pub coord: GridCoord,
    pub code: TileCode,
}

#[derive(Debug, thiserror::Error)]
#[error("observer hook failed: {0}")]
pub struct HookError(pub String);

/// Outbound side effects of a mounted scene.
///
/// Hooks are fire-and-forget: the composer logs a returned error and
/// carries on.
pub trait SceneObserver {
    fn on_hover(&mut self, cue: HoverCue) -> Result<(), HookError>;

    /// The dissolve finished. Fires at most once per mount.
    fn on_finished(&mut self) -> Result<(), HookError> {
        Ok(())
    }
}

/// Everything a `RecordingObserver` has seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObserverLog {
    pub hovers: Vec<HoverCue>,
    pub finished: usize,
}

/// Observer that records hooks into a shared log. Clones share the log, so
/// one copy can be handed to the composer and another kept for reading.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    log: Rc<RefCell<ObserverLog>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> ObserverLog {
        self.log.borrow().clone()
    }
}

impl SceneObserver for RecordingObserver {
    fn on_hover(&mut self, cue: HoverCue) -> Result<(), HookError> {
        self.log.borrow_mut().hovers.push(cue);
        Ok(())
    }

    fn on_finished(&mut self) -> Result<(), HookError> {
        self.log.borrow_mut().finished += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let reader = RecordingObserver::new();
        let mut writer = reader.clone();
        writer
            .on_hover(HoverCue {
                coord: GridCoord::new(1, 1),
                code: TileCode::PATH,
            })
            .unwrap();
        writer.on_finished().unwrap();
        let log = reader.log();
        assert_eq!(log.hovers.len(), 1);
        assert_eq!(log.finished, 1);
    }
}
