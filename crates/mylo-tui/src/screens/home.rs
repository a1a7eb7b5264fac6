//! Home screen: profile form and read-only summary for the signed-in user.
//!
//! The screen starts in the loading state. Once the load resolves it shows
//! either the saved profile (read-only, no edit path) or an editable form.
//! A failed load is treated as "no profile yet".

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mylo_core::clients::ProfileError;
use mylo_core::profile::{Profile, ProfileDraft};
use mylo_core::session::Session;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{ScreenIntent, paste_into, render_fields};
use crate::common::render_utils::{
    CardConfig, InputHint, render_card, render_separator, render_status,
};
use crate::common::{FormKey, TextField, handle_form_key};

const NAME: usize = 0;
const AGE: usize = 1;
const CITY: usize = 2;

pub const SAVE_FAILED: &str = "Could not save profile. Press Enter to retry.";

#[derive(Debug, Clone)]
pub struct HomeScreen {
    pub session: Session,
    pub fields: [TextField; 3],
    pub focus: usize,
    /// True until the entry load resolves.
    pub loading: bool,
    /// The stored profile once loaded or saved. `Some` means read-only.
    pub saved: Option<Profile>,
    pub save_error: Option<String>,
}

impl HomeScreen {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            fields: [
                TextField::new("Name"),
                TextField::new("Age"),
                TextField::new("City"),
            ],
            focus: NAME,
            loading: true,
            saved: None,
            save_error: None,
        }
    }

    pub fn profile_saved(&self) -> bool {
        self.saved.is_some()
    }

    pub fn draft(&self) -> ProfileDraft {
        ProfileDraft {
            name: self.fields[NAME].value.clone(),
            age: self.fields[AGE].value.clone(),
            city: self.fields[CITY].value.clone(),
        }
    }

    fn set_draft(&mut self, draft: ProfileDraft) {
        self.fields[NAME].value = draft.name;
        self.fields[AGE].value = draft.age;
        self.fields[CITY].value = draft.city;
    }

    /// Applies the entry load. Returns the error, if any, for the caller to log.
    pub fn apply_loaded(
        &mut self,
        result: Result<Option<Profile>, ProfileError>,
    ) -> Option<ProfileError> {
        self.loading = false;
        match result {
            Ok(Some(profile)) => {
                self.set_draft(ProfileDraft::from_profile(&profile));
                self.saved = Some(profile);
                None
            }
            Ok(None) => None,
            Err(err) => Some(err),
        }
    }

    /// Applies a save result. On failure the form keeps its input.
    pub fn apply_saved(&mut self, profile: Profile, result: Result<(), ProfileError>) -> bool {
        match result {
            Ok(()) => {
                self.save_error = None;
                self.set_draft(ProfileDraft::from_profile(&profile));
                self.saved = Some(profile);
                true
            }
            Err(_) => {
                self.save_error = Some(SAVE_FAILED.to_string());
                false
            }
        }
    }

    /// `busy` is true while a save is in flight.
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> ScreenIntent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('x') {
            return ScreenIntent::SignOut;
        }
        if busy || self.loading || self.profile_saved() {
            return ScreenIntent::None;
        }

        match handle_form_key(&mut self.fields, &mut self.focus, key) {
            FormKey::Submit => ScreenIntent::SaveProfile(self.draft().to_profile()),
            FormKey::Handled | FormKey::Ignored => ScreenIntent::None,
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.loading || self.profile_saved() {
            return;
        }
        paste_into(&mut self.fields, self.focus, text);
    }

    /// Rows of the read-only summary.
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        match &self.saved {
            Some(profile) => vec![
                ("Name", profile.name.clone()),
                ("Age", profile.age_display()),
                ("City", profile.city.clone()),
            ],
            None => Vec::new(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, busy: bool, spinner: &str) {
        let read_only = self.profile_saved();
        let form_hints = [
            InputHint::new("Enter", "save"),
            InputHint::new("Tab", "next field"),
            InputHint::new("Ctrl+X", "sign out"),
        ];
        let summary_hints = [InputHint::new("Ctrl+X", "sign out")];
        let hints: &[InputHint] = if read_only || self.loading {
            &summary_hints
        } else {
            &form_hints
        };

        let layout = render_card(
            frame,
            area,
            &CardConfig {
                title: "Home",
                border_color: Color::Green,
                width: 60,
                height: 16,
                hints,
            },
        );
        let body = layout.body;

        let welcome = Line::from(vec![
            Span::styled("Signed in as ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.session.email().to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(welcome),
            Rect::new(body.x, body.y, body.width, 1),
        );
        render_separator(frame, body, 1);

        if self.loading {
            render_status(
                frame,
                body,
                3,
                &format!("{spinner} Loading profile..."),
                Color::Yellow,
            );
            return;
        }

        if read_only {
            let mut y = 3;
            for (label, value) in self.summary_lines() {
                if y >= body.height {
                    break;
                }
                let line = Line::from(vec![
                    Span::styled(format!("{label:<6}"), Style::default().fg(Color::Gray)),
                    Span::styled(value, Style::default().fg(Color::White)),
                ]);
                frame.render_widget(
                    Paragraph::new(line),
                    Rect::new(body.x, body.y + y, body.width, 1),
                );
                y += 1;
            }
            render_status(frame, body, y + 1, "Profile saved", Color::Green);
            return;
        }

        let y = render_fields(frame, body, &self.fields, self.focus, 2);
        if busy {
            render_status(
                frame,
                body,
                y,
                &format!("{spinner} Saving profile..."),
                Color::Yellow,
            );
        } else if let Some(error) = &self.save_error {
            render_status(frame, body, y, error, Color::Red);
        }
    }
}
