//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Usage
//!
//! In the main event loop, call [`to_app_event`] on every [`crossterm::event::Event`]
//! and match on the returned [`AppEvent`] instead of crossterm types.
//!
//! # Keybindings
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab`                   | `FocusNext`                |
//! | `/`                     | `QueryFocus`               |
//! | `n`, `→`                | `NextMatch`                |
//! | `p`, `←`                | `PreviousMatch`            |
//! | `l`                     | `ScrollRight`              |
//! | `h`                     | `ScrollLeft`               |
//! | `PageDown`, `Ctrl+d`    | `PageRight`                |
//! | `PageUp`, `Ctrl+u`      | `PageLeft`                 |
//! | `j`, `↓`                | `SelectNext`               |
//! | `k`, `↑`                | `SelectPrevious`           |
//! | `g`, `Home`             | `ScrollToStart`            |
//! | `G`, `End`              | `ScrollToEnd`              |
//! | `m`                     | `ToggleOnlyMatches`        |
//! | `e`                     | `Export`                   |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! When a text-input widget (query bar, command bar) is focused, the event
//! loop calls [`to_app_event_insert`] instead. Every printable character is
//! forwarded as `Char`, `←`/`→` move the text cursor, and only `Ctrl+c`,
//! `Escape`, `Enter`, `Tab` and `Backspace` keep their special bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Exit the application.
    Quit,
    /// Move keyboard focus between the timeline and the query bar.
    FocusNext,
    /// Transfer focus to the query bar.
    QueryFocus,
    NextMatch,
    PreviousMatch,
    /// Scroll the timeline by one slot.
    ScrollLeft,
    ScrollRight,
    /// Scroll the timeline by one viewport.
    PageLeft,
    PageRight,
    /// Move the selection to the neighbouring record in the view.
    SelectNext,
    SelectPrevious,
    ScrollToStart,
    ScrollToEnd,
    ToggleOnlyMatches,
    /// Write the current view to an export file.
    Export,
    /// Move the text cursor in the active input.
    CursorLeft,
    CursorRight,
    /// A printable character forwarded to the active text input.
    Char(char),
    /// Delete the character before the cursor in the active text input.
    Backspace,
    /// Confirm the active input.
    Enter,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
    /// Dismiss the active modal (query bar focus, help popup, selection).
    Escape,
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal / navigation mode).
///
/// Returns `None` for events that carry no meaning for the application
/// (mouse events, unbound keys).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input ("insert") mode.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),
        Char('/') if key.modifiers == Mod::NONE => Some(AppEvent::QueryFocus),

        // Match navigation
        Right | Char('n') if key.modifiers == Mod::NONE => Some(AppEvent::NextMatch),
        Left | Char('p') if key.modifiers == Mod::NONE => Some(AppEvent::PreviousMatch),

        // Timeline scrolling
        Char('l') if key.modifiers == Mod::NONE => Some(AppEvent::ScrollRight),
        Char('h') if key.modifiers == Mod::NONE => Some(AppEvent::ScrollLeft),
        PageDown => Some(AppEvent::PageRight),
        PageUp => Some(AppEvent::PageLeft),
        Char('d') if key.modifiers == Mod::CONTROL => Some(AppEvent::PageRight),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::PageLeft),
        Home | Char('g') if key.modifiers == Mod::NONE => Some(AppEvent::ScrollToStart),
        // Uppercase: SHIFT may or may not be set depending on the terminal
        Char('G') | End => Some(AppEvent::ScrollToEnd),

        // Selection
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::SelectNext),
        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::SelectPrevious),

        Char('m') if key.modifiers == Mod::NONE => Some(AppEvent::ToggleOnlyMatches),
        Char('e') if key.modifiers == Mod::NONE => Some(AppEvent::Export),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Ctrl+c always quits, even while typing
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Left => Some(AppEvent::CursorLeft),
        Right => Some(AppEvent::CursorRight),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
