//! Keyboard input handling with vim-style navigation support.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions that can be triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Home,
    End,
    NextTab,
    PrevTab,
    GoToTab(usize),

    // Selection
    Select,
    Back,

    // Projects
    NewItem,
    Save,
    Delete,
    Comment,
    CyclePriority,
    CycleDevelopmentType,
    Promote,

    // Table
    CycleSort,
    ReverseSort,

    // Misc
    Export,
    Help,
    Quit,
    Refresh,
}

/// Keyboard bindings configuration
pub struct KeyBindings {
    pub vim_navigation: bool,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            vim_navigation: true,
        }
    }
}

/// Input handler for list and board screens
pub struct InputHandler {
    bindings: KeyBindings,
}

impl InputHandler {
    /// Create a new input handler
    pub fn new(vim_navigation: bool) -> Self {
        Self {
            bindings: KeyBindings { vim_navigation },
        }
    }

    /// Handle a key event and return the corresponding action
    pub fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                KeyCode::Char('s') => Some(Action::Save),
                _ => None,
            };
        }

        match key.code {
            // Navigation - arrow keys always work
            KeyCode::Up => Some(Action::MoveUp),
            KeyCode::Down => Some(Action::MoveDown),
            KeyCode::Left => Some(Action::MoveLeft),
            KeyCode::Right => Some(Action::MoveRight),
            KeyCode::Home => Some(Action::Home),
            KeyCode::End => Some(Action::End),
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),

            // Vim-style navigation (j/k/h/l)
            KeyCode::Char('j') if self.bindings.vim_navigation => Some(Action::MoveDown),
            KeyCode::Char('k') if self.bindings.vim_navigation => Some(Action::MoveUp),
            KeyCode::Char('h') if self.bindings.vim_navigation => Some(Action::MoveLeft),
            KeyCode::Char('l') if self.bindings.vim_navigation => Some(Action::MoveRight),
            KeyCode::Char('g') if self.bindings.vim_navigation => Some(Action::Home),
            KeyCode::Char('G') if self.bindings.vim_navigation => Some(Action::End),

            KeyCode::Char(c @ '1'..='6') => Some(Action::GoToTab(c as usize - '1' as usize)),

            // Selection
            KeyCode::Enter => Some(Action::Select),
            KeyCode::Char(' ') => Some(Action::Select),

            // Back/Quit
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Char('q') => Some(Action::Quit),

            // Actions
            KeyCode::Char('n') => Some(Action::NewItem),
            KeyCode::Char('s') => Some(Action::Save),
            KeyCode::Char('d') => Some(Action::Delete),
            KeyCode::Char('c') => Some(Action::Comment),
            KeyCode::Char('p') => Some(Action::CyclePriority),
            KeyCode::Char('t') => Some(Action::CycleDevelopmentType),
            KeyCode::Char('P') => Some(Action::Promote),
            KeyCode::Char('o') => Some(Action::CycleSort),
            KeyCode::Char('O') => Some(Action::ReverseSort),
            KeyCode::Char('x') => Some(Action::Export),

            // Misc
            KeyCode::Char('?') => Some(Action::Help),
            KeyCode::F(5) => Some(Action::Refresh),

            _ => None,
        }
    }
}
