//! Transient status toasts shown inside the overlay.

use std::time::{Duration, Instant};

use crate::overlay::OverlayHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Failure,
        }
    }
}

#[derive(Debug)]
struct VisibleToast {
    toast: Toast,
    sequence: u64,
    hide_at: Instant,
}

/// Holds at most one visible toast. A newer toast replaces the old one and
/// restarts the dismissal timer.
#[derive(Debug)]
pub struct ToastSlot {
    duration: Duration,
    sequence: u64,
    visible: Option<VisibleToast>,
}

impl ToastSlot {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            sequence: 0,
            visible: None,
        }
    }

    pub fn show(&mut self, host: &mut dyn OverlayHost, toast: Toast, now: Instant) -> u64 {
        if self.visible.take().is_some() {
            host.remove_toast();
        }
        host.show_toast(&toast);
        self.sequence = self.sequence.saturating_add(1);
        tracing::debug!(kind = ?toast.kind, message = %toast.message, "toast shown");
        self.visible = Some(VisibleToast {
            toast,
            sequence: self.sequence,
            hide_at: now + self.duration,
        });
        self.sequence
    }

    /// Dismisses the toast once its display time is over.
    pub fn tick(&mut self, host: &mut dyn OverlayHost, now: Instant) {
        if self
            .visible
            .as_ref()
            .is_some_and(|visible| now >= visible.hide_at)
        {
            self.visible = None;
            host.remove_toast();
        }
    }

    /// Forgets the toast without touching the host, for when the overlay
    /// that contained it is already gone.
    pub fn forget(&mut self) {
        self.visible = None;
    }

    pub fn current(&self) -> Option<&Toast> {
        self.visible.as_ref().map(|visible| &visible.toast)
    }

    pub fn current_sequence(&self) -> Option<u64> {
        self.visible.as_ref().map(|visible| visible.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Viewport;
    use crate::overlay::HeadlessHost;

    fn host() -> HeadlessHost {
        HeadlessHost::new(Viewport::new(800, 600))
    }

    #[test]
    fn toast_hides_after_duration() {
        let mut host = host();
        let mut slot = ToastSlot::new(Duration::from_millis(3000));
        let now = Instant::now();
        slot.show(&mut host, Toast::success("Annotation saved!"), now);
        assert_eq!(
            host.toast().map(|toast| toast.kind),
            Some(ToastKind::Success)
        );

        slot.tick(&mut host, now + Duration::from_millis(2999));
        assert!(slot.current().is_some());
        slot.tick(&mut host, now + Duration::from_millis(3000));
        assert!(slot.current().is_none());
        assert!(host.toast().is_none());
    }

    #[test]
    fn newer_toast_replaces_older_and_restarts_timer() {
        let mut host = host();
        let mut slot = ToastSlot::new(Duration::from_millis(3000));
        let now = Instant::now();
        let first = slot.show(&mut host, Toast::failure("Failed to save annotation: io"), now);
        let second = slot.show(
            &mut host,
            Toast::success("Annotation saved!"),
            now + Duration::from_millis(2000),
        );
        assert!(second > first);
        assert_eq!(slot.current_sequence(), Some(second));
        assert_eq!(host.toasts_shown(), 2);
        assert_eq!(
            host.toast().map(|toast| toast.message.as_str()),
            Some("Annotation saved!")
        );

        slot.tick(&mut host, now + Duration::from_millis(3500));
        assert!(host.toast().is_some());
        slot.tick(&mut host, now + Duration::from_millis(5000));
        assert!(host.toast().is_none());
    }
}
