//! Display capability required by the loop

/// What a successful [`FrameSurface::present_frame`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// A frame reached the display
    Shown,
    /// Nothing was shown and the call did not wait on the display
    /// (minimised window, transient swap-chain error). The loop waits for the
    /// next tick instead.
    Skipped,
}

/// What the loop needs from a window: present, poll for close, release.
///
/// Implementations own their native resources exclusively and are driven from
/// the thread that created them.
pub trait FrameSurface {
    /// Error raised by presentation or release
    type Error: std::error::Error + Send + Sync + 'static;

    /// Non-blocking. Returns true once the user has asked to close, and keeps
    /// returning true afterwards.
    fn poll_close_requested(&mut self) -> bool;

    /// Make the most recently drawn frame visible
    fn present_frame(&mut self) -> Result<Presentation, Self::Error>;

    /// Release all native resources. Consumes the surface so it runs at most once.
    fn destroy(self) -> Result<(), Self::Error>;
}
