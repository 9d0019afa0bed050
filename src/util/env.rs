//! Terminal capability detection.

use std::io::IsTerminal;

/// Whether stdout is attached to a terminal.
#[must_use]
pub fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Whether stderr is attached to a terminal.
#[must_use]
pub fn stderr_is_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Whether ANSI color is appropriate.
///
/// An explicit no-color flag wins outright; `NO_COLOR` and `TERM=dumb`
/// follow the usual conventions; otherwise color tracks whether stdout is
/// a terminal.
#[must_use]
pub fn should_use_color(no_color_flag: bool) -> bool {
    !no_color_flag && !color_suppressed_by_env() && stdout_is_tty()
}

fn color_suppressed_by_env() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return true;
    }
    std::env::var("TERM").is_ok_and(|term| term == "dumb")
}
