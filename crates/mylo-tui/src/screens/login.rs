//! Login screen.

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

#[derive(Debug, Clone)]
pub struct LoginScreen {
    pub fields: [TextField; 2],
    pub focus: usize,
    /// Last sign-in rejection, shown until the next edit.
    pub error: Option<String>,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            fields: [TextField::new("Email"), TextField::masked("Password")],
            focus: EMAIL,
            error: None,
        }
    }

    pub fn email(&self) -> &str {
        &self.fields[EMAIL].value
    }

    pub fn password(&self) -> &str {
        &self.fields[PASSWORD].value
    }

    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> ScreenIntent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('r') {
            return ScreenIntent::GoToRegister;
        }
        if busy {
            return ScreenIntent::None;
        }

        match handle_form_key(&mut self.fields, &mut self.focus, key) {
            FormKey::Submit => ScreenIntent::SignIn(Credentials {
                email: self.email().to_string(),
                password: self.password().to_string(),
            }),
            FormKey::Handled => {
                self.error = None;
                ScreenIntent::None
            }
            FormKey::Ignored => ScreenIntent::None,
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        paste_into(&mut self.fields, self.focus, text);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, busy: bool, spinner: &str) {
        let hints = [
            InputHint::new("Enter", "sign in"),
            InputHint::new("Tab", "next field"),
            InputHint::new("Ctrl+R", "register"),
        ];
        let layout = render_card(
            frame,
            area,
            &CardConfig {
                title: "Login",
                border_color: Color::Cyan,
                width: 56,
                height: 10,
                hints: &hints,
            },
        );

        let y = render_fields(frame, layout.body, &self.fields, self.focus, 0);
        if busy {
            render_status(
                frame,
                layout.body,
                y,
                &format!("{spinner} Signing in..."),
                Color::Yellow,
            );
        } else if let Some(error) = &self.error {
            render_status(frame, layout.body, y, error, Color::Red);
        }
    }
}
