//! User-facing notices
//!
//! A notice is a message plus an optional expiry instant. Nothing clears a
//! notice on a timer; whoever renders asks [`NoticeBoard::active`] with the
//! current instant and expired notices simply stop showing.

use std::time::{Duration, Instant};

/// How long success and delete-error notices stay visible
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// `None` for notices that persist until replaced or cleared
    pub expires_at: Option<Instant>,
}

impl Notice {
    /// Notice that expires [`NOTICE_TTL`] after `now`
    pub fn transient(kind: NoticeKind, message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: Some(now + NOTICE_TTL),
        }
    }

    pub fn persistent(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: None,
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// The notice slots shown around the user list
///
/// - `success`: transient, after a create, import or delete
/// - `delete_error`: transient, after a failed delete
/// - `form_error`: persistent, next to the entry form; cleared on next submit
/// - `page_error`: persistent, the list itself could not be loaded
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    pub success: Option<Notice>,
    pub delete_error: Option<Notice>,
    pub form_error: Option<Notice>,
    pub page_error: Option<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_success(&mut self, message: impl Into<String>, now: Instant) {
        self.success = Some(Notice::transient(NoticeKind::Success, message, now));
    }

    pub fn post_delete_error(&mut self, message: impl Into<String>, now: Instant) {
        self.delete_error = Some(Notice::transient(NoticeKind::Error, message, now));
    }

    pub fn set_form_error(&mut self, message: impl Into<String>) {
        self.form_error = Some(Notice::persistent(NoticeKind::Error, message));
    }

    pub fn set_page_error(&mut self, message: impl Into<String>) {
        self.page_error = Some(Notice::persistent(NoticeKind::Error, message));
    }

    /// Clear the slots a new form submission or import starts from
    pub fn clear_for_submit(&mut self) {
        self.success = None;
        self.form_error = None;
    }

    /// Notices still visible at `now`, page error first
    pub fn active(&self, now: Instant) -> Vec<&Notice> {
        [
            &self.page_error,
            &self.success,
            &self.delete_error,
            &self.form_error,
        ]
        .into_iter()
        .flatten()
        .filter(|notice| notice.is_active(now))
        .collect()
    }

    /// Drop expired notices
    pub fn expire(&mut self, now: Instant) {
        for slot in [
            &mut self.success,
            &mut self.delete_error,
            &mut self.form_error,
            &mut self.page_error,
        ] {
            if slot.as_ref().is_some_and(|notice| !notice.is_active(now)) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_notice_expires() {
        let now = Instant::now();
        let notice = Notice::transient(NoticeKind::Success, "done", now);

        assert!(notice.is_active(now));
        assert!(notice.is_active(now + Duration::from_millis(2_999)));
        assert!(!notice.is_active(now + NOTICE_TTL));
    }

    #[test]
    fn test_persistent_notice_never_expires() {
        let now = Instant::now();
        let notice = Notice::persistent(NoticeKind::Error, "broken");
        assert!(notice.is_active(now + Duration::from_secs(3_600)));
    }

    #[test]
    fn test_board_active_and_expire() {
        let now = Instant::now();
        let mut board = NoticeBoard::new();
        board.post_success("Successfully deleted 2 users", now);
        board.set_form_error("All fields are required");

        assert_eq!(board.active(now).len(), 2);

        let later = now + Duration::from_secs(4);
        let active = board.active(later);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "All fields are required");

        board.expire(later);
        assert!(board.success.is_none());
        assert!(board.form_error.is_some());
    }

    #[test]
    fn test_clear_for_submit_keeps_other_slots() {
        let now = Instant::now();
        let mut board = NoticeBoard::new();
        board.post_success("ok", now);
        board.post_delete_error("Failed to delete users", now);
        board.set_form_error("bad");

        board.clear_for_submit();
        assert!(board.success.is_none());
        assert!(board.form_error.is_none());
        assert!(board.delete_error.is_some());
    }
}
