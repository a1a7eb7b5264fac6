//! Single-line text fields and focus handling for screen forms.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A labelled single-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    /// Rendered as bullets (passwords).
    pub masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    /// Applies an editing key. Returns true if the value changed.
    pub fn edit(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                let changed = !self.value.is_empty();
                self.value.clear();
                changed
            }
            KeyCode::Char(c) if !ctrl => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }

    /// Inserts pasted text, dropping line breaks and other control characters.
    pub fn paste(&mut self, text: &str) {
        self.value.extend(text.chars().filter(|c| !c.is_control()));
    }
}

/// Result of routing a key through a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    /// Focus moved or a field was edited.
    Handled,
    /// Enter was pressed.
    Submit,
    /// Not a form key; the screen decides.
    Ignored,
}

/// Moves focus between `len` fields and edits the focused one.
pub fn handle_form_key(fields: &mut [TextField], focus: &mut usize, key: KeyEvent) -> FormKey {
    let len = fields.len();
    if len == 0 {
        return FormKey::Ignored;
    }
    match key.code {
        KeyCode::Enter => FormKey::Submit,
        KeyCode::Tab | KeyCode::Down => {
            *focus = (*focus + 1) % len;
            FormKey::Handled
        }
        KeyCode::BackTab | KeyCode::Up => {
            *focus = (*focus + len - 1) % len;
            FormKey::Handled
        }
        _ => match fields.get_mut(*focus) {
            Some(field) => {
                if field.edit(key) {
                    FormKey::Handled
                } else {
                    FormKey::Ignored
                }
            }
            None => FormKey::Ignored,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::new("Email");
        assert!(field.edit(key(KeyCode::Char('a'))));
        assert!(field.edit(key(KeyCode::Char('b'))));
        assert!(field.edit(key(KeyCode::Backspace)));
        assert_eq!(field.value, "a");
        assert!(field.edit(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(field.value, "");
        assert!(!field.edit(key(KeyCode::Backspace)));
    }

    #[test]
    fn test_ctrl_chars_are_not_inserted() {
        let mut field = TextField::new("Email");
        assert!(!field.edit(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert_eq!(field.value, "");
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut field = TextField::new("Email");
        field.paste("ana@example.com\r\n");
        assert_eq!(field.value, "ana@example.com");
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut fields = vec![TextField::new("a"), TextField::new("b"), TextField::new("c")];
        let mut focus = 0;
        assert_eq!(
            handle_form_key(&mut fields, &mut focus, key(KeyCode::Up)),
            FormKey::Handled
        );
        assert_eq!(focus, 2);
        handle_form_key(&mut fields, &mut focus, key(KeyCode::Tab));
        assert_eq!(focus, 0);
    }

    #[test]
    fn test_edit_goes_to_focused_field() {
        let mut fields = vec![TextField::new("a"), TextField::masked("b")];
        let mut focus = 1;
        handle_form_key(&mut fields, &mut focus, key(KeyCode::Char('x')));
        assert_eq!(fields[0].value, "");
        assert_eq!(fields[1].value, "x");
        assert_eq!(
            handle_form_key(&mut fields, &mut focus, key(KeyCode::Enter)),
            FormKey::Submit
        );
    }

    #[test]
    fn test_unchanged_edit_is_ignored() {
        let mut fields = vec![TextField::new("a")];
        let mut focus = 0;
        assert_eq!(
            handle_form_key(&mut fields, &mut focus, key(KeyCode::Backspace)),
            FormKey::Ignored
        );
        assert_eq!(
            handle_form_key(&mut fields, &mut focus, key(KeyCode::Char('y'))),
            FormKey::Handled
        );
        assert_eq!(fields[0].value, "y");

        let mut focus = 5;
        assert_eq!(
            handle_form_key(&mut fields, &mut focus, key(KeyCode::Char('z'))),
            FormKey::Ignored
        );
    }
}
