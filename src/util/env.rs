//! Terminal detection.

use std::io::IsTerminal;

/// Whether colored output should be produced.
///
/// `no_color` is the already-resolved flag (CLI, `NO_COLOR`, config). Color is
/// additionally suppressed on dumb terminals and when stdout is not a TTY.
#[must_use]
pub fn should_use_color(no_color: bool) -> bool {
    if no_color {
        return false;
    }

    if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
        return false;
    }

    std::io::stdout().is_terminal()
}
