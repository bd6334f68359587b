use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::{Component, Handled, Result};

pub enum TextInputEvent {
    /// The value was edited.
    Changed(String),
    Submitted(String),
    Cancelled,
}

/// Single-line input rendered inline, e.g. `/query_`.
///
/// The cursor is a char index, not a byte index.
pub struct TextInput {
    prompt: String,
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            value: String::new(),
            cursor: 0,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.value.chars().count();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_char_at_cursor(&mut self) -> bool {
        if self.cursor >= self.value.chars().count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_word_before_cursor(&mut self) -> bool {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        if pos == self.cursor {
            return false;
        }
        let start = self.byte_index(pos);
        let end = self.byte_index(self.cursor);
        self.value.drain(start..end);
        self.cursor = pos;
        true
    }

    fn changed(&self, edited: bool) -> Handled<TextInputEvent> {
        if edited {
            TextInputEvent::Changed(self.value.clone()).into()
        } else {
            Handled::Consumed
        }
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<Handled<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted(self.value.clone()).into(),
            (KeyCode::Esc, _) => TextInputEvent::Cancelled.into(),

            (KeyCode::Backspace, KeyModifiers::ALT) | (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                let edited = self.delete_word_before_cursor();
                self.changed(edited)
            }
            (KeyCode::Backspace, _) => {
                let edited = self.delete_char_before_cursor();
                self.changed(edited)
            }
            (KeyCode::Delete, _) => {
                let edited = self.delete_char_at_cursor();
                self.changed(edited)
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let edited = !self.value.is_empty();
                self.value.clear();
                self.cursor = 0;
                self.changed(edited)
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                Handled::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                Handled::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                Handled::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.chars().count();
                Handled::Consumed
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                self.changed(true)
            }

            // Consume all other keys to prevent propagation
            _ => Handled::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let before: String = self.value.chars().take(self.cursor).collect();
        let at = self.value.chars().nth(self.cursor).unwrap_or(' ');
        let after: String = self.value.chars().skip(self.cursor + 1).collect();

        let input_style = Style::default().fg(theme.yellow());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.yellow())
            .add_modifier(Modifier::BOLD);

        let line = Line::from(vec![
            Span::styled(self.prompt.clone(), Style::default().fg(theme.overlay1())),
            Span::styled(before, input_style),
            Span::styled(at.to_string(), cursor_style),
            Span::styled(after, input_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_typing_emits_changed() {
        let mut input = TextInput::new("/");
        let result = input.handle_key(key(KeyCode::Char('a'))).unwrap();
        assert!(matches!(result, Handled::Event(TextInputEvent::Changed(v)) if v == "a"));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new("/");
        type_str(&mut input, "zü");
        input.handle_key(key(KeyCode::Left)).unwrap();
        type_str(&mut input, "ö");
        assert_eq!(input.value(), "zöü");

        input.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(input.value(), "zü");
    }

    #[test]
    fn test_backspace_on_empty_is_not_a_change() {
        let mut input = TextInput::new("/");
        let result = input.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(result.event().map(|_| ()), None);
    }

    #[test]
    fn test_delete_word() {
        let mut input = TextInput::new("/").with_value("web prod");
        let result = input
            .handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(matches!(result, Handled::Event(TextInputEvent::Changed(v)) if v == "web "));
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = TextInput::new("/").with_value("db");
        assert!(matches!(
            input.handle_key(key(KeyCode::Enter)).unwrap(),
            Handled::Event(TextInputEvent::Submitted(v)) if v == "db"
        ));
        assert!(matches!(
            input.handle_key(key(KeyCode::Esc)).unwrap(),
            Handled::Event(TextInputEvent::Cancelled)
        ));
    }
}
