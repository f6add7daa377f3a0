//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Grid navigation
    SelectLeft,
    SelectRight,
    SelectUp,
    SelectDown,
    PageUp,
    PageDown,
    SelectFirst,
    SelectLast,

    // Screen actions
    OpenSelected,
    Back,
    Refresh,

    // Details screen
    DetailScrollUp,
    DetailScrollDown,

    /// Number of card rows that fit in the grid area
    ViewportResized(u16),

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, on_details: bool, show_help: bool) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    // Keys shared by both screens
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        _ => {}
    }

    if on_details {
        handle_details_keys(key)
    } else {
        handle_grid_keys(key)
    }
}

/// Handle keys for the product grid
fn handle_grid_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => Some(UiEvent::SelectLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(UiEvent::SelectRight),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectDown),
        KeyCode::PageUp => Some(UiEvent::PageUp),
        KeyCode::PageDown => Some(UiEvent::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(UiEvent::SelectFirst),
        KeyCode::End | KeyCode::Char('G') => Some(UiEvent::SelectLast),
        KeyCode::Enter => Some(UiEvent::OpenSelected),
        KeyCode::Char('r') | KeyCode::F(5) => Some(UiEvent::Refresh),
        _ => None,
    }
}

/// Handle keys for the product details screen
fn handle_details_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            Some(UiEvent::Back)
        }
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::DetailScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::DetailScrollDown),
        _ => None,
    }
}
