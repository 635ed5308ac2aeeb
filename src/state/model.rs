/// Lifecycle phase of the single overlay session hosted by a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    /// A save hand-off is in flight; further save triggers are ignored.
    Saving,
    /// Save succeeded; the overlay stays up until the close delay elapses.
    Closing,
}

impl SessionPhase {
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub const fn accepts_edits(self) -> bool {
        matches!(self, Self::Active | Self::Saving)
    }
}
