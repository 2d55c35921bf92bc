use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use skyfind_core::{PassengerKind, Side};

use crate::app::{App, Focus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Validate the form and spawn the search job.
    Search,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App, now: Instant) -> Action {
    use KeyCode::{BackTab, Char, Tab};

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return handle_shortcut(key.code, app);
    }

    match key.code {
        Tab => {
            app.focus = app.focus.next();
            return Action::None;
        }
        BackTab => {
            app.focus = app.focus.previous();
            return Action::None;
        }
        Char(_) if key.modifiers.contains(KeyModifiers::ALT) => return Action::None,
        _ => {}
    }

    match app.focus {
        Focus::Origin => handle_location_key(key.code, Side::Origin, app, now),
        Focus::Destination => handle_location_key(key.code, Side::Destination, app, now),
        focus @ (Focus::Departure | Focus::Return) => handle_date_key(key.code, focus, app),
        Focus::Passengers => {
            handle_passenger_key(key.code, app);
            Action::None
        }
        Focus::Results => handle_results_key(key.code, app),
    }
}

fn handle_shortcut(code: KeyCode, app: &mut App) -> Action {
    match code {
        KeyCode::Char('c' | 'q') => Action::Quit,
        KeyCode::Char('s') => Action::Search,
        KeyCode::Char('x') => {
            app.swap();
            Action::None
        }
        KeyCode::Char('t') => {
            app.toggle_trip_type();
            Action::None
        }
        KeyCode::Char('b') => {
            let next = app.trip().cabin_class().next();
            app.form.trip_mut().set_cabin_class(next);
            Action::None
        }
        KeyCode::Char('d') => {
            app.theme = app.theme.toggled();
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_location_key(code: KeyCode, side: Side, app: &mut App, now: Instant) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Up};

    match code {
        Char(character) => {
            let ticket = app.form.push_char(side, character);
            app.schedule_lookup(side, ticket, now);
        }
        Backspace => {
            let ticket = app.form.pop_char(side);
            app.schedule_lookup(side, ticket, now);
        }
        Up => app.form.highlight(side, false),
        Down => app.form.highlight(side, true),
        Enter => {
            if app.form.select_highlighted(side).is_some() {
                app.focus = app.focus.next();
            } else if app.form.field(side).resolved().is_some() {
                return Action::Search;
            }
        }
        Esc => {
            app.form.dismiss(side);
            app.schedule_lookup(side, None, now);
        }
        _ => {}
    }
    Action::None
}

fn handle_date_key(code: KeyCode, focus: Focus, app: &mut App) -> Action {
    match code {
        KeyCode::Char(character) if character.is_ascii_digit() || character == '-' => {
            app.edit_date(focus, |text| text.push(character));
        }
        KeyCode::Backspace => app.edit_date(focus, |text| {
            text.pop();
        }),
        KeyCode::Enter => return Action::Search,
        _ => {}
    }
    Action::None
}

fn handle_passenger_key(code: KeyCode, app: &mut App) {
    use KeyCode::{Char, Down, Left, Right, Up};

    match code {
        Left => {
            app.passenger_kind = match app.passenger_kind {
                PassengerKind::Adult | PassengerKind::Child => PassengerKind::Adult,
                PassengerKind::Infant => PassengerKind::Child,
            };
        }
        Right => {
            app.passenger_kind = match app.passenger_kind {
                PassengerKind::Adult => PassengerKind::Child,
                PassengerKind::Child | PassengerKind::Infant => PassengerKind::Infant,
            };
        }
        Up | Char('+') => app.form.trip_mut().passengers_mut().increment(app.passenger_kind),
        Down | Char('-') => app.form.trip_mut().passengers_mut().decrement(app.passenger_kind),
        _ => {}
    }
}

fn handle_results_key(code: KeyCode, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Enter, Up};

    match code {
        Up | Char('k') => {
            app.result_index = app.result_index.saturating_sub(1);
        }
        Down | Char('j') => {
            if app.result_index + 1 < app.result_count() {
                app.result_index += 1;
            }
        }
        Enter => return Action::Search,
        _ => {}
    }
    Action::None
}
