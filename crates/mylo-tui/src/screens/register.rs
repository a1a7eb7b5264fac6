//! Register screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::{ScreenIntent, paste_into, render_fields};
use crate::common::render_utils::{CardConfig, InputHint, render_card, render_status};
use crate::common::{FormKey, TextField, handle_form_key};
use crate::effects::Credentials;

const EMAIL: usize = 0;
const PASSWORD: usize = 1;
const CONFIRM: usize = 2;

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

#[derive(Debug, Clone)]
pub struct RegisterScreen {
    pub fields: [TextField; 3],
    pub focus: usize,
    pub error: Option<String>,
}

impl Default for RegisterScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterScreen {
    pub fn new() -> Self {
        Self {
            fields: [
                TextField::new("Email"),
                TextField::masked("Password"),
                TextField::masked("Confirm password"),
            ],
            focus: EMAIL,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> ScreenIntent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc {
            return ScreenIntent::Back;
        }
        if ctrl && key.code == KeyCode::Char('l') {
            return ScreenIntent::GoToLogin;
        }
        if busy {
            return ScreenIntent::None;
        }

        match handle_form_key(&mut self.fields, &mut self.focus, key) {
            FormKey::Submit => self.submit(),
            FormKey::Handled => {
                self.error = None;
                ScreenIntent::None
            }
            FormKey::Ignored => ScreenIntent::None,
        }
    }

    /// Checks the confirmation locally; a mismatch never reaches the auth client.
    fn submit(&mut self) -> ScreenIntent {
        if self.fields[PASSWORD].value != self.fields[CONFIRM].value {
            self.error = Some(PASSWORD_MISMATCH.to_string());
            return ScreenIntent::None;
        }
        ScreenIntent::SignUp(Credentials {
            email: self.fields[EMAIL].value.clone(),
            password: self.fields[PASSWORD].value.clone(),
        })
    }

    pub fn handle_paste(&mut self, text: &str) {
        paste_into(&mut self.fields, self.focus, text);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, busy: bool, spinner: &str) {
        let hints = [
            InputHint::new("Enter", "create account"),
            InputHint::new("Tab", "next field"),
            InputHint::new("Esc", "back"),
            InputHint::new("Ctrl+L", "login"),
        ];
        let layout = render_card(
            frame,
            area,
            &CardConfig {
                title: "Register",
                border_color: Color::Magenta,
                width: 68,
                height: 13,
                hints: &hints,
            },
        );

        let y = render_fields(frame, layout.body, &self.fields, self.focus, 0);
        if busy {
            render_status(
                frame,
                layout.body,
                y,
                &format!("{spinner} Creating account..."),
                Color::Yellow,
            );
        } else if let Some(error) = &self.error {
            render_status(frame, layout.body, y, error, Color::Red);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fill(screen: &mut RegisterScreen, email: &str, password: &str, confirm: &str) {
        screen.fields[EMAIL].value = email.into();
        screen.fields[PASSWORD].value = password.into();
        screen.fields[CONFIRM].value = confirm.into();
    }

    #[test]
    fn test_mismatch_sets_error_without_intent() {
        let mut screen = RegisterScreen::new();
        fill(&mut screen, "ana@example.com", "secret1", "secret2");

        assert_eq!(
            screen.handle_key(key(KeyCode::Enter), false),
            ScreenIntent::None
        );
        assert_eq!(screen.error.as_deref(), Some(PASSWORD_MISMATCH));
        assert_eq!(screen.fields[PASSWORD].value, "secret1");
    }

    #[test]
    fn test_matching_passwords_sign_up() {
        let mut screen = RegisterScreen::new();
        fill(&mut screen, "ana@example.com", "secret1", "secret1");

        assert_eq!(
            screen.handle_key(key(KeyCode::Enter), false),
            ScreenIntent::SignUp(Credentials {
                email: "ana@example.com".into(),
                password: "secret1".into(),
            })
        );
    }

    #[test]
    fn test_esc_and_ctrl_l_leave_even_when_busy() {
        let mut screen = RegisterScreen::new();
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc), true),
            ScreenIntent::Back
        );
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL), true),
            ScreenIntent::GoToLogin
        );
    }
}
