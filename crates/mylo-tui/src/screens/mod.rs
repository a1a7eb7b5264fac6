//! Screens for the three routes.
//!
//! Each screen owns its transient input state, a key handler that returns a
//! `ScreenIntent`, and a render function. Screens never call clients or touch
//! navigation; the reducer turns intents into effects and route changes.
//!
//! - `login.rs`: email/password sign-in
//! - `register.rs`: account creation with password confirmation
//! - `home.rs`: profile load, edit form and read-only summary

pub mod home;
pub mod login;
pub mod register;

use crossterm::event::KeyEvent;
pub use home::HomeScreen;
pub use login::LoginScreen;
use mylo_core::profile::Profile;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use register::RegisterScreen;

use crate::common::TextField;
use crate::common::render_utils::render_field;
use crate::effects::Credentials;
use crate::navigation::Route;

/// What a screen asks the reducer to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenIntent {
    /// Input was consumed (or ignored); nothing else to do.
    None,
    SignIn(Credentials),
    SignUp(Credentials),
    GoToRegister,
    GoToLogin,
    /// Pop the top route, if it is not the last one.
    Back,
    SaveProfile(Profile),
    SignOut,
}

/// The screen for the route on top of the stack.
#[derive(Debug, Clone)]
pub enum Screen {
    Login(LoginScreen),
    Register(RegisterScreen),
    Home(HomeScreen),
}

impl Screen {
    /// Fresh screen state for `route`. Input from a previous visit is not kept.
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Login => Screen::Login(LoginScreen::new()),
            Route::Register => Screen::Register(RegisterScreen::new()),
            Route::Home(session) => Screen::Home(HomeScreen::new(session.clone())),
        }
    }

    /// `busy` is true while the screen's own submit task is in flight.
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> ScreenIntent {
        match self {
            Screen::Login(screen) => screen.handle_key(key, busy),
            Screen::Register(screen) => screen.handle_key(key, busy),
            Screen::Home(screen) => screen.handle_key(key, busy),
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self {
            Screen::Login(screen) => screen.handle_paste(text),
            Screen::Register(screen) => screen.handle_paste(text),
            Screen::Home(screen) => screen.handle_paste(text),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, busy: bool, spinner: &str) {
        match self {
            Screen::Login(screen) => screen.render(frame, area, busy, spinner),
            Screen::Register(screen) => screen.render(frame, area, busy, spinner),
            Screen::Home(screen) => screen.render(frame, area, busy, spinner),
        }
    }
}

/// Renders `fields` top-down from `y_offset`, two rows each plus a gap.
/// Returns the row after the last field.
pub(crate) fn render_fields(
    frame: &mut Frame,
    body: Rect,
    fields: &[TextField],
    focus: usize,
    y_offset: u16,
) -> u16 {
    let mut y = y_offset;
    for (index, field) in fields.iter().enumerate() {
        if y + 1 >= body.height {
            break;
        }
        let area = Rect::new(body.x, body.y + y, body.width, 2);
        render_field(frame, area, field, index == focus);
        y += 3;
    }
    y
}

pub(crate) fn paste_into(fields: &mut [TextField], focus: usize, text: &str) {
    if let Some(field) = fields.get_mut(focus) {
        field.paste(text);
    }
}
