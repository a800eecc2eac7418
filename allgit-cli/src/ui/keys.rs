//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Dashboard panes, numbered as shown in their titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Table,
    Errors,
    Working,
    Local,
    Remote,
}

impl Pane {
    pub const DETAIL: [Pane; 4] = [Pane::Errors, Pane::Working, Pane::Local, Pane::Remote];

    pub fn number(&self) -> u8 {
        match self {
            Pane::Table => 1,
            Pane::Errors => 2,
            Pane::Working => 3,
            Pane::Local => 4,
            Pane::Remote => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Pane::Table => "Repositories",
            Pane::Errors => "Errors",
            Pane::Working => "Working Changes",
            Pane::Local => "Local Changes",
            Pane::Remote => "Remote Changes",
        }
    }

    fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Pane::Table),
            '2' => Some(Pane::Errors),
            '3' => Some(Pane::Working),
            '4' => Some(Pane::Local),
            '5' => Some(Pane::Remote),
            _ => None,
        }
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Refresh,
    RefreshAll,
    Pull,
    Push,
    ClearErrors,
    Focus(Pane),
    Quit,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('R') => Action::RefreshAll,
        KeyCode::Char('p') => Action::Pull,
        KeyCode::Char('P') => Action::Push,
        KeyCode::Char('X') => Action::ClearErrors,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(c) => Action::Focus(Pane::from_digit(c)?),
        _ => return None,
    };

    Some(action)
}
