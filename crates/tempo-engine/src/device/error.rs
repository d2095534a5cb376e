use std::fmt;

/// High-level response after a failed present.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error or nothing to present to; skip the current frame.
    SkipFrame,
    /// Unrecoverable (commonly OOM); the frame loop must stop.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}

impl fmt::Display for SurfaceErrorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SurfaceErrorAction::Reconfigured => "surface reconfigured",
            SurfaceErrorAction::SkipFrame => "frame skipped",
            SurfaceErrorAction::Fatal => "fatal surface error",
        };
        f.write_str(text)
    }
}

impl std::error::Error for SurfaceErrorAction {}
