use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    CloseHelp,
    Like,
    Reset,
    NextImage,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::CloseHelp,
        KeyCode::Right | KeyCode::Enter => InputAction::Like,
        KeyCode::Char('l') => InputAction::Like,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('r') => InputAction::Reset,
        KeyCode::Char(' ') | KeyCode::Char('n') => InputAction::NextImage,
        _ => InputAction::None,
    }
}
