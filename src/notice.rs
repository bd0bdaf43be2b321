//! Dismissible banners shown above the dashboard content

use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

pub type NoticeId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
}

/// Banners in insertion order. Each one expires `ttl` after it was raised,
/// whether or not anybody looked at it.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    next_id: NoticeId,
    ttl: Duration,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            notices: Vec::new(),
            next_id: 1,
            ttl,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> NoticeId {
        self.notify_at(message, severity, Instant::now())
    }

    pub fn notify_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> NoticeId {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            message: message.into(),
            severity,
            created_at: now,
        });
        id
    }

    /// Removes a banner before it expires. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }

    /// Removes the most recently raised banner.
    pub fn dismiss_latest(&mut self) -> bool {
        match self.notices.last().map(|notice| notice.id) {
            Some(id) => self.dismiss(id),
            None => false,
        }
    }

    /// Drops every banner whose time on screen has run out.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.notices
            .retain(|notice| now.saturating_duration_since(notice.created_at) < ttl);
    }

    pub fn visible(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(5);

    #[test]
    fn test_notify_inserts_exactly_one_banner() {
        let mut board = NoticeBoard::new(TTL);
        let id = board.notify("msg", Severity::Danger);

        assert_eq!(board.visible().len(), 1);
        assert_eq!(board.visible()[0].id, id);
        assert_eq!(board.visible()[0].message, "msg");
        assert_eq!(board.visible()[0].severity, Severity::Danger);
    }

    #[test]
    fn test_banner_expires_after_fixed_delay() {
        let mut board = NoticeBoard::new(TTL);
        let start = Instant::now();
        board.notify_at("msg", Severity::Danger, start);

        board.expire(start + Duration::from_millis(4_999));
        assert_eq!(board.visible().len(), 1);

        board.expire(start + TTL);
        assert!(board.is_empty());
    }

    #[test]
    fn test_manual_dismiss_removes_immediately() {
        let mut board = NoticeBoard::new(TTL);
        let start = Instant::now();
        let id = board.notify_at("msg", Severity::Danger, start);

        assert!(board.dismiss(id));
        assert!(board.is_empty());
        assert!(!board.dismiss(id));

        // Expiry of an already dismissed banner is a no-op
        board.expire(start + TTL);
        assert!(board.is_empty());
    }

    #[test]
    fn test_banners_expire_independently() {
        let mut board = NoticeBoard::new(TTL);
        let start = Instant::now();
        board.notify_at("first", Severity::Info, start);
        board.notify_at("second", Severity::Warning, start + Duration::from_secs(3));

        board.expire(start + Duration::from_secs(6));

        assert_eq!(board.visible().len(), 1);
        assert_eq!(board.visible()[0].message, "second");
        assert!(board.dismiss_latest());
        assert!(!board.dismiss_latest());
    }
}
