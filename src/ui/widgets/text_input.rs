//! Single-line text entry and the prompt dialogs built on it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear},
};

/// Single-line text input widget
pub struct TextInputWidget<'a> {
    /// Current input value
    value: &'a str,
    /// Cursor position (character index)
    cursor: usize,
    /// Placeholder text when empty
    placeholder: &'a str,
    /// Title for the input box
    title: &'a str,
    /// Whether the input is focused
    focused: bool,
}

impl<'a> TextInputWidget<'a> {
    /// Create a new text input widget
    pub fn new(value: &'a str, cursor: usize) -> Self {
        Self {
            value,
            cursor,
            placeholder: "",
            title: "Input",
            focused: true,
        }
    }

    /// Set placeholder text
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set title
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Set focused state
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", self.title));

        let inner = block.inner(area);
        block.render(area, buf);

        let cursor_style = Style::default().fg(Color::Black).bg(Color::White);

        if self.value.is_empty() {
            let mut x = inner.x;
            if self.focused {
                buf.set_string(x, inner.y, " ", cursor_style);
                x += 1;
            }
            buf.set_string(
                x,
                inner.y,
                self.placeholder,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        if !self.focused {
            buf.set_string(inner.x, inner.y, self.value, Style::default());
            return;
        }

        let before_cursor: String = self.value.chars().take(self.cursor).collect();
        let cursor_char: String = self.value.chars().skip(self.cursor).take(1).collect();
        let after_cursor: String = self.value.chars().skip(self.cursor + 1).collect();

        let mut x = inner.x;
        buf.set_string(x, inner.y, &before_cursor, Style::default());
        x += before_cursor.chars().count() as u16;

        let cursor_text = if cursor_char.is_empty() {
            " "
        } else {
            &cursor_char
        };
        buf.set_string(x, inner.y, cursor_text, cursor_style);
        x += 1;

        buf.set_string(x, inner.y, &after_cursor, Style::default());
    }
}

/// State for text input
#[derive(Debug, Default, Clone)]
pub struct TextInputState {
    /// Current value
    pub value: String,
    /// Cursor position (character index)
    pub cursor: usize,
}

impl TextInputState {
    /// Create a new text input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial value
    pub fn with_value(value: String) -> Self {
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> TextInputAction {
        match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return TextInputAction::None;
                }
                let offset = self.byte_offset(self.cursor);
                self.value.insert(offset, c);
                self.cursor += 1;
                TextInputAction::Changed
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let offset = self.byte_offset(self.cursor);
                    self.value.remove(offset);
                    TextInputAction::Changed
                } else {
                    TextInputAction::None
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let offset = self.byte_offset(self.cursor);
                    self.value.remove(offset);
                    TextInputAction::Changed
                } else {
                    TextInputAction::None
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                TextInputAction::None
            }
            KeyCode::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
                TextInputAction::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                TextInputAction::None
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                TextInputAction::None
            }
            KeyCode::Enter => TextInputAction::Submit,
            KeyCode::Esc => TextInputAction::Cancel,
            _ => TextInputAction::None,
        }
    }

    /// Clear the input
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Get the current value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check if empty after trimming
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Actions that can result from text input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputAction {
    /// No action
    None,
    /// Value changed
    Changed,
    /// User submitted (Enter)
    Submit,
    /// User cancelled (Esc)
    Cancel,
}

/// Modal dialog asking for one line of text
pub struct InputDialog<'a> {
    input: &'a TextInputState,
    title: &'a str,
    prompt: &'a str,
    field: &'a str,
    placeholder: &'a str,
    error: Option<&'a str>,
    accent: Color,
}

impl<'a> InputDialog<'a> {
    pub fn new(input: &'a TextInputState, title: &'a str) -> Self {
        Self {
            input,
            title,
            prompt: "",
            field: "",
            placeholder: "",
            error: None,
            accent: Color::Cyan,
        }
    }

    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn field(mut self, field: &'a str, placeholder: &'a str) -> Self {
        self.field = field;
        self.placeholder = placeholder;
        self
    }

    /// Set error message
    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Border color; destructive prompts use red
    pub fn accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }
}

impl Widget for InputDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent))
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        buf.set_stringn(
            inner.x + 1,
            inner.y + 1,
            self.prompt,
            usize::from(inner.width.saturating_sub(2)),
            Style::default().fg(Color::White),
        );

        let input_area = Rect {
            x: inner.x + 1,
            y: inner.y + 3,
            width: inner.width.saturating_sub(2),
            height: 3,
        };
        TextInputWidget::new(&self.input.value, self.input.cursor)
            .title(self.field)
            .placeholder(self.placeholder)
            .render(input_area, buf);

        if let Some(error) = self.error {
            buf.set_stringn(
                inner.x + 1,
                inner.y + 7,
                error,
                usize::from(inner.width.saturating_sub(2)),
                Style::default().fg(Color::Red),
            );
        }

        let help_y = inner.y + inner.height.saturating_sub(2);
        buf.set_string(
            inner.x + 1,
            help_y,
            "Enter: Confirmar | Esc: Cancelar",
            Style::default().fg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_input_state() {
        let mut state = TextInputState::new();
        assert!(state.is_blank());

        state.handle_key(key(KeyCode::Char('h')));
        state.handle_key(key(KeyCode::Char('i')));
        assert_eq!(state.value(), "hi");
        assert_eq!(state.cursor, 2);

        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(state.value(), "h");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = TextInputState::with_value("Diseño".to_string());
        assert_eq!(state.cursor, 6);

        state.handle_key(key(KeyCode::Left));
        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(state.value(), "Diseo");

        state.handle_key(key(KeyCode::Char('ñ')));
        assert_eq!(state.value(), "Diseño");
        assert_eq!(state.cursor, 5);

        state.handle_key(key(KeyCode::Delete));
        assert_eq!(state.value(), "Diseñ");
    }

    #[test]
    fn test_text_input_navigation() {
        let mut state = TextInputState::with_value("hello".to_string());
        assert_eq!(state.cursor, 5);

        state.handle_key(key(KeyCode::Home));
        assert_eq!(state.cursor, 0);

        state.handle_key(key(KeyCode::End));
        assert_eq!(state.cursor, 5);

        state.handle_key(key(KeyCode::Left));
        assert_eq!(state.cursor, 4);
    }

    #[test]
    fn test_text_input_actions() {
        let mut state = TextInputState::new();
        assert_eq!(state.handle_key(key(KeyCode::Enter)), TextInputAction::Submit);
        assert_eq!(state.handle_key(key(KeyCode::Esc)), TextInputAction::Cancel);

        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(state.handle_key(ctrl_a), TextInputAction::None);
        assert!(state.is_blank());
    }

    #[test]
    fn test_dialog_renders_prompt() {
        let state = TextInputState::with_value("Sala".to_string());
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        InputDialog::new(&state, "Nuevo proyecto")
            .prompt("Nombre del proyecto:")
            .field("Nombre", "")
            .render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains("Nuevo proyecto"));
        assert!(row(2).contains("Nombre del proyecto:"));
        assert!(row(5).contains("Sala"));
    }
}
