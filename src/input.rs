use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    ToggleMenu,
    CloseMenu,
    MoveUp,
    MoveDown,
    Select,
    QuickSelect(usize),
    Confirm,
    CancelConfirm,
    RefreshBadge,
    StopPolling,
    None,
}

/// Which overlay (if any) is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMode {
    #[default]
    None,
    Confirm,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    pub has_error: bool,
    pub menu_open: bool,
    pub overlay: OverlayMode,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if ctx.overlay == OverlayMode::Confirm {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Action::Confirm,
            KeyCode::Char('n' | 'q') | KeyCode::Esc => Action::CancelConfirm,
            _ => Action::None,
        };
    }

    if ctx.menu_open {
        return match key.code {
            KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Action::Select,
            KeyCode::Char('d' | ' ') => Action::ToggleMenu,
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => Action::CloseMenu,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                Action::QuickSelect((c as u8 - b'0') as usize)
            }
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => {
            if ctx.has_error {
                Action::DismissError
            } else {
                Action::Quit
            }
        }
        KeyCode::Char('d' | ' ') | KeyCode::Enter => Action::ToggleMenu,
        KeyCode::Char('r') => Action::RefreshBadge,
        KeyCode::Char('s') => Action::StopPolling,
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            Action::QuickSelect((c as u8 - b'0') as usize)
        }
        _ => Action::None,
    }
}
