//! Terminal teardown.

use crossterm::{cursor, event::PopKeyboardEnhancementFlags, execute, terminal};
use std::io::{self, Write};

/// Undoes everything the game changed on the terminal. Every step runs even
/// when an earlier one fails; the first error is returned.
pub fn restore(
    out: &mut impl Write,
    releases: bool,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let pop = if releases {
        execute!(out, PopKeyboardEnhancementFlags)
    } else {
        Ok(())
    };
    let screen = execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    );
    let raw = disable_raw_mode();
    pop.and(screen).and(raw)
}
