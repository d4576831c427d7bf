use crossterm::event::{KeyCode, KeyModifiers};

use billed_core::BillsCommand;

use super::state::{App, View};

/// Actions the TUI can perform in response to input.
#[derive(Debug, PartialEq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    Up,
    Down,
    Back,
    ToggleHelp,
    Command(BillsCommand),
}

/// Map a key press to an Action.
pub fn handle_key(app: &App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if app.show_help {
        return match code {
            KeyCode::Char('?') | KeyCode::Esc => Action::ToggleHelp,
            _ => Action::None,
        };
    }

    // The receipt modal only closes.
    if app.modal_open() {
        return match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Action::Back,
            _ => Action::None,
        };
    }

    match code {
        // ── Quit ────────────────────────────────────────────
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

        KeyCode::Esc if app.view == View::NewBill => Action::Back,
        KeyCode::Char('?') => Action::ToggleHelp,

        // Everything below acts on the bills page.
        _ if app.view != View::Bills => Action::None,

        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('j') | KeyCode::Down => Action::Down,
        KeyCode::Char('k') | KeyCode::Up => Action::Up,

        // ── Bills page intents ──────────────────────────────
        KeyCode::Char('n') => Action::Command(BillsCommand::OpenNewBillForm),
        KeyCode::Enter => match app.selected_bill() {
            Some(bill) => Action::Command(BillsCommand::PreviewReceipt(bill.id.clone())),
            None => Action::None,
        },

        _ => Action::None,
    }
}
