use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + NOTIFICATION_TTL
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at()
    }

    /// CSS class of the rendered element, e.g. `notification error`.
    pub fn css_class(&self) -> String {
        format!("notification {}", self.kind)
    }
}

/// Notifications in the order they were raised.
#[derive(Debug, Default, Clone)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    /// Raise a notification at `now`, first dismissing any that have timed
    /// out by then.
    pub fn push_at(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        self.dismiss_expired(now);
        self.items.push(Notification {
            kind,
            message: message.into(),
            shown_at: now,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message);
    }

    /// Notifications that have not timed out at `now`.
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(move |n| n.is_visible(now))
    }

    /// Drop every notification whose timeout has passed.
    pub fn dismiss_expired(&mut self, now: Instant) {
        self.items.retain(|n| n.is_visible(now));
    }

    /// Most recently raised notification, expired or not.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Remove and return every notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
