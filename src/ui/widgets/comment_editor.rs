//! Multi-line comment editor backed by tui-textarea.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear},
};
use tui_textarea::{Input, Key, TextArea};

/// Actions that can result from editor key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// No action needed
    None,
    /// Post the comment
    Submit,
    /// Close the editor without posting
    Cancel,
}

/// Comment being written on a project
pub struct CommentEditor {
    textarea: TextArea<'static>,
    project_name: String,
}

impl CommentEditor {
    pub fn new(project_name: &str) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("Escribe un comentario. Usa @usuario para mencionar.");
        Self {
            textarea,
            project_name: project_name.to_string(),
        }
    }

    /// Current text with trailing whitespace trimmed
    pub fn content(&self) -> String {
        self.textarea.lines().join("\n").trim_end().to_string()
    }

    pub fn is_blank(&self) -> bool {
        self.content().trim().is_empty()
    }

    /// Handle a key event; Ctrl+S posts and Esc cancels
    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return EditorAction::Submit;
        }
        if key.code == KeyCode::Esc {
            return EditorAction::Cancel;
        }

        self.textarea.input(convert_key_event(key));
        EditorAction::None
    }
}

impl Widget for &CommentEditor {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Comentario: {} ", self.project_name))
            .title_bottom(Line::from(" Ctrl+S: Publicar | Esc: Cancelar ").right_aligned());
        let inner = block.inner(area);
        block.render(area, buf);

        Widget::render(&self.textarea, inner, buf);
    }
}

/// Convert crossterm KeyEvent to tui-textarea Input
fn convert_key_event(key: KeyEvent) -> Input {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let key = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Esc => Key::Esc,
        KeyCode::F(n) => Key::F(n),
        _ => Key::Null,
    };

    Input {
        key,
        ctrl,
        alt,
        shift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(editor: &mut CommentEditor, text: &str) {
        for c in text.chars() {
            let code = if c == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(c)
            };
            editor.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_editor_collects_lines() {
        let mut editor = CommentEditor::new("Aulas");
        assert!(editor.is_blank());

        type_text(&mut editor, "Listo @ana\nrevisar planos  ");
        assert_eq!(editor.content(), "Listo @ana\nrevisar planos");
        assert!(!editor.is_blank());
    }

    #[test]
    fn test_editor_actions() {
        let mut editor = CommentEditor::new("Aulas");
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(ctrl_s), EditorAction::Submit);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(editor.handle_key(esc), EditorAction::Cancel);
    }
}
