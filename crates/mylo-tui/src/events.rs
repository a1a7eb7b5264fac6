//! UI event types.
//!
//! All inputs to the TUI (terminal input, timer ticks, client results) are
//! converted to `UiEvent` before the reducer sees them.
//!
//! ## Inbox Pattern
//!
//! Async client calls run as tasks on the tokio runtime and send their result
//! into the runtime's inbox wrapped in `TaskCompleted`. The reducer is the only
//! place that mutates `TaskState`, so a completion whose id is no longer the
//! active one (screen left, task superseded) is dropped there.

use crossterm::event::Event as CrosstermEvent;
use mylo_core::clients::{AuthError, ProfileError};
use mylo_core::profile::Profile;
use mylo_core::session::Session;

use crate::common::{TaskCompleted, TaskKind};

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (spinner animation, notice expiry).
    Tick,

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// Sign-in finished with a resolved session or the provider's rejection.
    SignInFinished(Result<Session, AuthError>),

    /// Sign-up finished with a resolved session or the provider's rejection.
    SignUpFinished(Result<Session, AuthError>),

    /// Profile fetch finished; `Ok(None)` means no profile yet.
    ProfileLoaded(Result<Option<Profile>, ProfileError>),

    /// Profile save finished. Carries the profile that was written.
    ProfileSaved {
        profile: Profile,
        result: Result<(), ProfileError>,
    },
}
