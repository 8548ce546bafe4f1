// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use crate::{app::AppState, theme::Theme};
use hitline_core::{Action, TimeRange};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Set or clear the start of the time range
    From(Option<String>),
    // Set or clear the end of the time range
    To(Option<String>),
    // Apply the time range and the query bar text as a filter
    Filter,
    // Clear filter, search and matches
    Reset,
    // Jump to the nth match, 1-based
    GoTo(usize),
    // Toggle only-matches view
    Only,
    // Export the current view, into the given directory or the working one
    Export(Option<PathBuf>),
    // Change theme
    Theme(String),
    // Display help
    Help,
    Quit,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        let optional = |rest: &str| (!rest.is_empty()).then(|| rest.to_string());

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "from" => Ok(Command::From(optional(rest))),
            "to" => Ok(Command::To(optional(rest))),
            "filter" => Ok(Command::Filter),
            "reset" => Ok(Command::Reset),
            "only" => Ok(Command::Only),
            "export" => Ok(Command::Export(optional(rest).map(PathBuf::from))),
            "goto" => match rest.parse::<usize>() {
                Ok(n) => Ok(Command::GoTo(n)),
                Err(_) => Err("usage: goto <n>".to_string()),
            },
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => {
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
        }
        Command::From(bound) => {
            let end = s.viewer.filter().time_range.end;
            match TimeRange::parse(bound.as_deref(), None) {
                Ok(range) => {
                    s.dispatch(Action::SetTimeRange(TimeRange::new(range.start, end)));
                    s.status = Some("start bound set (:filter to apply)".to_string());
                }
                Err(e) => s.status = Some(e.to_string()),
            }
        }
        Command::To(bound) => {
            let start = s.viewer.filter().time_range.start;
            match TimeRange::parse(None, bound.as_deref()) {
                Ok(range) => {
                    s.dispatch(Action::SetTimeRange(TimeRange::new(start, range.end)));
                    s.status = Some("end bound set (:filter to apply)".to_string());
                }
                Err(e) => s.status = Some(e.to_string()),
            }
        }
        Command::Filter => {
            s.dispatch(Action::SetQuery(s.query.query.clone()));
            s.dispatch(Action::ApplyFilter);
            s.status = Some(format!("{} records in view", s.viewer.view().len()));
        }
        Command::Reset => {
            s.query.set("");
            s.dispatch(Action::ResetFilter);
            s.timeline.scroll = 0;
            s.status = None;
        }
        Command::GoTo(n) => {
            s.dispatch(Action::GoToMatch(n));
        }
        Command::Only => {
            s.dispatch(Action::ToggleShowOnlyMatches);
        }
        Command::Export(dir) => {
            s.export(dir.unwrap_or_else(|| PathBuf::from(".")));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("q", Command::Quit)]
    #[case("  quit  ", Command::Quit)]
    #[case("help", Command::Help)]
    #[case("filter", Command::Filter)]
    #[case("reset", Command::Reset)]
    #[case("only", Command::Only)]
    #[case("goto 3", Command::GoTo(3))]
    #[case("from 2025-10-15T07:00", Command::From(Some("2025-10-15T07:00".into())))]
    #[case("from", Command::From(None))]
    #[case("to   2025-10-15 ", Command::To(Some("2025-10-15".into())))]
    #[case("export", Command::Export(None))]
    #[case("export /tmp/out", Command::Export(Some(PathBuf::from("/tmp/out"))))]
    #[case("theme gruvbox", Command::Theme("gruvbox".into()))]
    fn parses(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(Command::parse(input), Ok(expected));
    }

    #[rstest]
    #[case("goto")]
    #[case("goto x")]
    #[case("theme")]
    fn usage_errors(#[case] input: &str) {
        let err = Command::parse(input).unwrap_err();
        assert!(err.starts_with("usage:"), "{err}");
    }

    #[test]
    fn parse_empty_returns_sentinel_err() {
        assert_eq!(Command::parse(""), Err(String::new()));
        assert_eq!(Command::parse("  "), Err(String::new()));
    }

    #[test]
    fn parse_unknown() {
        let err = Command::parse("frobnicate").unwrap_err();
        assert!(err.contains("frobnicate"));
    }
}
