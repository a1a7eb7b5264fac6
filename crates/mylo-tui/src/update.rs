//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mylo_core::clients::{AuthError, ProfileError};
use mylo_core::profile::Profile;
use mylo_core::session::Session;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::navigation::{NavEvent, Route};
use crate::screens::{Screen, ScreenIntent};
use crate::state::AppState;

pub const LOGIN_SUCCESS: &str = "Login successful";

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            if app
                .notice
                .as_ref()
                .is_some_and(|notice| notice.is_expired(Instant::now()))
            {
                app.notice = None;
            }
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "Dropping stale task result");
                vec![]
            }
        }
        UiEvent::SignInFinished(result) => handle_auth_result(app, result, NavEvent::SignedIn),
        UiEvent::SignUpFinished(result) => handle_auth_result(app, result, NavEvent::SignedUp),
        UiEvent::ProfileLoaded(result) => handle_profile_loaded(app, result),
        UiEvent::ProfileSaved { profile, result } => handle_profile_saved(app, profile, result),
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Applies a navigation event and rebuilds the screen for the new top route.
///
/// Every in-flight task is dropped so results for the old screen are inert.
fn navigate(app: &mut AppState, event: NavEvent) -> Vec<UiEffect> {
    if !app.nav.apply(event) {
        return vec![];
    }
    app.tasks.clear_all();
    enter_current_route(app)
}

/// Builds fresh screen state for the top route. Entering Home issues the
/// one profile load for that visit.
fn enter_current_route(app: &mut AppState) -> Vec<UiEffect> {
    app.screen = Screen::for_route(app.nav.current());
    match app.nav.current() {
        Route::Home(session) => {
            let task = app.tasks.profile_load.begin(&mut app.task_seq);
            vec![UiEffect::LoadProfile {
                task,
                user_id: session.user_id().clone(),
            }]
        }
        Route::Login | Route::Register => vec![],
    }
}

// ============================================================================
// Client Results
// ============================================================================

fn handle_auth_result(
    app: &mut AppState,
    result: Result<Session, AuthError>,
    on_success: fn(Session) -> NavEvent,
) -> Vec<UiEffect> {
    match result {
        Ok(session) => {
            let signed_in = matches!(app.screen, Screen::Login(_));
            let effects = navigate(app, on_success(session));
            if signed_in {
                app.set_notice(LOGIN_SUCCESS);
            }
            effects
        }
        Err(err) => {
            let message = err.to_string();
            match &mut app.screen {
                Screen::Login(screen) => screen.error = Some(message),
                Screen::Register(screen) => screen.error = Some(message),
                Screen::Home(_) => {}
            }
            vec![]
        }
    }
}

fn handle_profile_loaded(
    app: &mut AppState,
    result: Result<Option<Profile>, ProfileError>,
) -> Vec<UiEffect> {
    if let Screen::Home(home) = &mut app.screen
        && let Some(err) = home.apply_loaded(result)
    {
        tracing::warn!(error = %err, "Showing empty profile form after load failure");
    }
    vec![]
}

fn handle_profile_saved(
    app: &mut AppState,
    profile: Profile,
    result: Result<(), ProfileError>,
) -> Vec<UiEffect> {
    if let Screen::Home(home) = &mut app.screen {
        home.apply_saved(profile, result);
    }
    vec![]
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            if !app.is_submitting() {
                app.screen.handle_paste(&text);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return vec![UiEffect::Quit];
    }

    let busy = app.is_submitting();
    let intent = app.screen.handle_key(key, busy);
    handle_intent(app, intent)
}

fn handle_intent(app: &mut AppState, intent: ScreenIntent) -> Vec<UiEffect> {
    match intent {
        ScreenIntent::None => vec![],
        ScreenIntent::SignIn(credentials) => {
            if app.tasks.sign_in.is_running() {
                return vec![];
            }
            let task = app.tasks.sign_in.begin(&mut app.task_seq);
            vec![UiEffect::SignIn { task, credentials }]
        }
        ScreenIntent::SignUp(credentials) => {
            if app.tasks.sign_up.is_running() {
                return vec![];
            }
            let task = app.tasks.sign_up.begin(&mut app.task_seq);
            vec![UiEffect::SignUp { task, credentials }]
        }
        ScreenIntent::GoToRegister => navigate(app, NavEvent::GoToRegister),
        ScreenIntent::GoToLogin => navigate(app, NavEvent::GoToLogin),
        ScreenIntent::Back => {
            if !app.nav.back() {
                return vec![];
            }
            app.tasks.clear_all();
            enter_current_route(app)
        }
        ScreenIntent::SaveProfile(profile) => {
            if app.tasks.profile_save.is_running() {
                return vec![];
            }
            let Route::Home(session) = app.nav.current() else {
                return vec![];
            };
            let user_id = session.user_id().clone();
            let task = app.tasks.profile_save.begin(&mut app.task_seq);
            vec![UiEffect::SaveProfile {
                task,
                user_id,
                profile,
            }]
        }
        ScreenIntent::SignOut => {
            let mut effects = vec![UiEffect::SignOut];
            effects.extend(navigate(app, NavEvent::SignedOut));
            app.notice = None;
            effects
        }
    }
}
