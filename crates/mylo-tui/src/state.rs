//! Application state.
//!
//! ```text
//! AppState
//! ├── nav: Navigator        (route back-stack, owns the session)
//! ├── screen: Screen        (input state for the route on top)
//! ├── notice: Option<Notice> (transient message in the status line)
//! ├── task_seq: TaskSeq     (async task id generator)
//! └── tasks: Tasks          (task lifecycle state)
//! ```
//!
//! `screen` is rebuilt whenever the top route changes, so input never leaks
//! from one visit of a screen to the next.

use std::time::{Duration, Instant};

use crate::common::{TaskKind, TaskSeq, Tasks};
use crate::navigation::{Navigator, RouteKind};
use crate::screens::Screen;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            expires_at: now + NOTICE_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct AppState {
    pub should_quit: bool,
    pub nav: Navigator,
    pub screen: Screen,
    pub notice: Option<Notice>,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub spinner_frame: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let nav = Navigator::new();
        let screen = Screen::for_route(nav.current());
        Self {
            should_quit: false,
            nav,
            screen,
            notice: None,
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
        }
    }

    pub fn route_kind(&self) -> RouteKind {
        self.nav.current().kind()
    }

    /// The task whose completion the current screen is waiting on before
    /// accepting another submit.
    pub fn submit_task(&self) -> TaskKind {
        match self.route_kind() {
            RouteKind::Login => TaskKind::SignIn,
            RouteKind::Register => TaskKind::SignUp,
            RouteKind::Home => TaskKind::ProfileSave,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.tasks.state(self.submit_task()).is_running()
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::new(text, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_login() {
        let app = AppState::new();
        assert_eq!(app.route_kind(), RouteKind::Login);
        assert!(matches!(app.screen, Screen::Login(_)));
        assert!(!app.is_submitting());
    }

    #[test]
    fn test_notice_expires() {
        let now = Instant::now();
        let notice = Notice::new("Login successful", now);
        assert!(!notice.is_expired(now));
        assert!(notice.is_expired(now + NOTICE_TTL));
    }
}
