use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What a terminal event means to the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Start, flap or restart. Pointer, touch and keys all land here.
    ImpulseOrAdvance,
    Quit,
    /// New terminal size in columns and rows.
    Resize(u16, u16),
}

pub fn map_event(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(cols, rows) => Some(Action::Resize(*cols, *rows)),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Action> {
    // Some terminals report releases and repeats too; only a fresh press counts.
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(Action::ImpulseOrAdvance)
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

// Terminals deliver taps on touch screens as left-button presses.
fn map_mouse(mouse: &MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::ImpulseOrAdvance),
        _ => None,
    }
}
