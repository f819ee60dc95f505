//! Loop error types

use thiserror::Error;

/// Error type returned by host callbacks and surfaces
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that end a loop run
///
/// Every variant except `InvalidConfig` is raised after the loop started and
/// is only returned once the surface has been released.
#[derive(Debug, Error)]
pub enum LoopError {
    /// Configuration rejected before the loop started
    #[error("invalid loop configuration: {0}")]
    InvalidConfig(String),

    /// `Game::update` failed
    #[error("update failed on tick {tick}")]
    Tick {
        tick: u64,
        #[source]
        source: BoxError,
    },

    /// `Game::render` failed
    #[error("render failed on frame {frame}")]
    Render {
        frame: u64,
        #[source]
        source: BoxError,
    },

    /// The surface could not present a frame
    #[error("frame presentation failed")]
    Present(#[source] BoxError),

    /// The surface could not be released after a normal exit
    #[error("failed to release display resources")]
    Release(#[source] BoxError),

    /// A fatal error occurred and releasing the surface failed as well
    #[error("{cause}; releasing display resources also failed: {release}")]
    Teardown {
        cause: Box<LoopError>,
        release: BoxError,
    },
}

impl LoopError {
    /// The error that stopped the loop, looking through a teardown failure
    pub fn cause(&self) -> &LoopError {
        match self {
            LoopError::Teardown { cause, .. } => cause,
            other => other,
        }
    }

    /// Whether releasing the surface failed
    pub fn release_failed(&self) -> bool {
        matches!(self, LoopError::Release(_) | LoopError::Teardown { .. })
    }

    /// Attach a release failure without hiding the original error
    pub(crate) fn with_release_failure(self, release: BoxError) -> Self {
        LoopError::Teardown {
            cause: Box::new(self),
            release,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn boxed(msg: &str) -> BoxError {
        msg.to_string().into()
    }

    #[test]
    fn test_tick_error_keeps_source() {
        let err = LoopError::Tick {
            tick: 7,
            source: boxed("physics exploded"),
        };
        assert_eq!(err.to_string(), "update failed on tick 7");
        assert_eq!(err.source().unwrap().to_string(), "physics exploded");
    }

    #[test]
    fn test_teardown_reports_both() {
        let cause = LoopError::Render {
            frame: 3,
            source: boxed("shader missing"),
        };
        let err = cause.with_release_failure(boxed("device lost"));
        let msg = err.to_string();
        assert!(msg.contains("render failed on frame 3"));
        assert!(msg.contains("device lost"));
        assert!(err.release_failed());
        assert!(matches!(err.cause(), LoopError::Render { frame: 3, .. }));
    }

    #[test]
    fn test_cause_of_plain_error_is_itself() {
        let err = LoopError::InvalidConfig("bad".to_string());
        assert!(matches!(err.cause(), LoopError::InvalidConfig(_)));
        assert!(!err.release_failed());
    }
}
