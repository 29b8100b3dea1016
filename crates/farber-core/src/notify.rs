//! Toast notifications
//!
//! A toast is a short message with a kind. Its lifecycle is a pure function
//! of the time elapsed since it was raised, so each toast runs its own
//! timeline and overlapping toasts never affect one another. There is no
//! queue and no cap.

use std::time::{Duration, Instant};

/// Delay before a new toast becomes visible
pub const SHOW_AFTER: Duration = Duration::from_millis(20);
/// Time a toast stays up before it starts leaving
pub const HIDE_AFTER: Duration = Duration::from_millis(2400);
/// Time a toast takes to leave before it is removed
pub const LEAVE_FOR: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Default,
    Success,
    Error,
}

/// Where a toast is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Raised but not shown yet
    Entering,
    Visible,
    /// Fading out, still drawn
    Leaving,
    /// Gone; safe to drop
    Expired,
}

impl ToastPhase {
    pub fn after(elapsed: Duration) -> Self {
        if elapsed < SHOW_AFTER {
            ToastPhase::Entering
        } else if elapsed < HIDE_AFTER {
            ToastPhase::Visible
        } else if elapsed < HIDE_AFTER + LEAVE_FOR {
            ToastPhase::Leaving
        } else {
            ToastPhase::Expired
        }
    }

    /// Whether a toast in this phase should be drawn
    pub fn is_shown(self) -> bool {
        matches!(self, ToastPhase::Visible | ToastPhase::Leaving)
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    pub fn phase_at(&self, now: Instant) -> ToastPhase {
        ToastPhase::after(now.saturating_duration_since(self.created_at))
    }
}

/// Capability for raising user feedback
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: ToastKind);

    fn success(&mut self, message: &str) {
        self.notify(message, ToastKind::Success);
    }

    fn error(&mut self, message: &str) {
        self.notify(message, ToastKind::Error);
    }
}

/// Live toasts, oldest first
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        self.items.push(toast);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop toasts whose lifecycle has ended
    pub fn prune(&mut self, now: Instant) {
        self.items
            .retain(|toast| toast.phase_at(now) != ToastPhase::Expired);
    }

    /// Toasts to draw at `now`, with their phase
    pub fn shown(&self, now: Instant) -> impl Iterator<Item = (&Toast, ToastPhase)> {
        self.items
            .iter()
            .map(move |toast| (toast, toast.phase_at(now)))
            .filter(|(_, phase)| phase.is_shown())
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, message: &str, kind: ToastKind) {
        self.push(Toast::new(message, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        let ms = Duration::from_millis;
        assert_eq!(ToastPhase::after(ms(0)), ToastPhase::Entering);
        assert_eq!(ToastPhase::after(ms(19)), ToastPhase::Entering);
        assert_eq!(ToastPhase::after(ms(20)), ToastPhase::Visible);
        assert_eq!(ToastPhase::after(ms(2399)), ToastPhase::Visible);
        assert_eq!(ToastPhase::after(ms(2400)), ToastPhase::Leaving);
        assert_eq!(ToastPhase::after(ms(2799)), ToastPhase::Leaving);
        assert_eq!(ToastPhase::after(ms(2800)), ToastPhase::Expired);
    }

    #[test]
    fn test_overlapping_toasts_are_independent() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push(Toast {
            message: "first".to_string(),
            kind: ToastKind::Success,
            created_at: start,
        });
        toasts.push(Toast {
            message: "second".to_string(),
            kind: ToastKind::Error,
            created_at: start + Duration::from_millis(1000),
        });

        let now = start + Duration::from_millis(2500);
        let shown: Vec<_> = toasts.shown(now).collect();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].1, ToastPhase::Leaving);
        assert_eq!(shown[1].1, ToastPhase::Visible);

        toasts.prune(start + Duration::from_millis(3000));
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].message, "second");

        toasts.prune(start + Duration::from_millis(4000));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_notifier_helpers() {
        let mut toasts = Toasts::new();
        toasts.success("Saved");
        toasts.error("Failed");
        toasts.notify("Plain", ToastKind::Default);

        let kinds: Vec<_> = toasts.items().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![ToastKind::Success, ToastKind::Error, ToastKind::Default]
        );
    }
}
