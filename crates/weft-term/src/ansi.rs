// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; that belongs to the diff renderer. This
// module only knows the byte-level encoding of the handful of terminal
// commands the renderer needs.
//
// Cursor positions are 0-indexed in our API and converted to the 1-indexed
// form the terminal expects.
use std::io::{self, Write};

use crate::cell::{Attr, CellStyle, Rgb};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using CUP (Cursor Position).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor to the top-left corner.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Emit one SGR sequence that fully establishes `style`.
///
/// The sequence always starts with `0` so nothing from the previous run
/// leaks through, then lists attribute codes and 24-bit colors:
/// `\x1b[0;1;38;2;255;0;0m` is bold red on the default background. Absent
/// colors and unset flags contribute nothing, so a plain style is `\x1b[0m`.
pub fn style(w: &mut impl Write, style: &CellStyle) -> io::Result<()> {
    w.write_all(b"\x1b[0")?;

    const CODES: [(Attr, &[u8]); 5] = [
        (Attr::BOLD, b";1"),
        (Attr::DIM, b";2"),
        (Attr::ITALIC, b";3"),
        (Attr::UNDERLINE, b";4"),
        (Attr::REVERSE, b";7"),
    ];
    for (flag, code) in CODES {
        if style.attrs.contains(flag) {
            w.write_all(code)?;
        }
    }

    if let Some(Rgb(r, g, b)) = style.fg {
        write!(w, ";38;2;{r};{g};{b}")?;
    }
    if let Some(Rgb(r, g, b)) = style.bg {
        write!(w, ";48;2;{r};{g};{b}")?;
    }

    w.write_all(b"m")
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC Private Mode 2026).
///
/// The terminal holds everything up to [`end_sync`] and paints it at once.
/// Terminals without support ignore the sequence.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
