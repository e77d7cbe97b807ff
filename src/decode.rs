// SPDX-License-Identifier: MIT
//
// `weft decode`: turn mouse reports into readable events.
//
// Arguments are written the way a shell user can type them, with `\x1b`
// or `\e` for ESC. Without arguments the raw bytes come from stdin, e.g.
// piped from `cat -v`-free captures of a terminal session.

use std::fmt::Write as _;
use std::io::{self, Read, Write};

use tracing::{debug, trace};
use weft_term::{Modifiers, MouseButton, MouseEvent, MouseEventKind, MouseEventParser, ScrollDirection};

use crate::error::{CliError, Result};

// ─── Unescaping ──────────────────────────────────────────────────────────────

/// Expand `\x1b`, `\e`, `\\`, `\n`, `\r` and `\t` in `input`. Any other
/// character is taken literally as UTF-8.
pub fn unescape(input: &str) -> Result<Vec<u8>> {
    let bad = |offset: usize, reason: &'static str| CliError::BadEscape {
        input: input.to_owned(),
        offset,
        reason,
    };

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let Some(&kind) = bytes.get(i + 1) else {
            return Err(bad(i, "trailing backslash"));
        };
        match kind {
            b'e' => out.push(0x1b),
            b'\\' => out.push(b'\\'),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'x' => {
                let hex = bytes
                    .get(i + 2..i + 4)
                    .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| bad(i, "expected two hex digits after \\x"))?;
                out.push(hex);
                i += 4;
                continue;
            }
            _ => return Err(bad(i, "unknown escape")),
        }
        i += 2;
    }

    Ok(out)
}

// ─── Scanning ────────────────────────────────────────────────────────────────

/// Every mouse event in `bytes`, in order. Bytes that do not start a valid
/// report are skipped one at a time.
pub fn scan(parser: &mut MouseEventParser, bytes: &[u8]) -> Vec<MouseEvent> {
    let mut events = Vec::new();
    let mut pos = 0;
    let mut skipped = 0usize;

    while pos < bytes.len() {
        if let Some((event, used)) = parser.next_event(&bytes[pos..]) {
            trace!(pos, used, "decoded report");
            events.push(event);
            pos += used;
        } else {
            skipped += 1;
            pos += 1;
        }
    }

    debug!(events = events.len(), skipped, "scan finished");
    events
}

// ─── Formatting ──────────────────────────────────────────────────────────────

const fn button_name(button: MouseButton) -> &'static str {
    match button {
        MouseButton::Left => "left",
        MouseButton::Middle => "middle",
        MouseButton::Right => "right",
        MouseButton::None => "none",
        MouseButton::ScrollUp => "wheel-up",
        MouseButton::ScrollDown => "wheel-down",
    }
}

/// One line per event: `click left at 9,4`, plus held modifiers and the
/// click count where there is one.
#[must_use]
pub fn describe(event: &MouseEvent) -> String {
    let mut line = match event.kind {
        MouseEventKind::Press(b) => format!("press {}", button_name(b)),
        MouseEventKind::Release(b) => format!("release {}", button_name(b)),
        MouseEventKind::Click(b) => format!("click {}", button_name(b)),
        MouseEventKind::DoubleClick(b) => format!("double-click {}", button_name(b)),
        MouseEventKind::Drag(b) => format!("drag {}", button_name(b)),
        MouseEventKind::Move => "move".to_owned(),
        MouseEventKind::Scroll(ScrollDirection::Up) => "scroll up".to_owned(),
        MouseEventKind::Scroll(ScrollDirection::Down) => "scroll down".to_owned(),
    };
    let _ = write!(line, " at {},{}", event.x, event.y);

    for (flag, name) in [
        (Modifiers::SHIFT, "shift"),
        (Modifiers::ALT, "alt"),
        (Modifiers::CTRL, "ctrl"),
    ] {
        if event.modifiers.contains(flag) {
            let _ = write!(line, " +{name}");
        }
    }
    if event.click_count() > 0 {
        let _ = write!(line, " (count {})", event.click_count());
    }
    line
}

// ─── Command ─────────────────────────────────────────────────────────────────

/// Decode `seqs` (or stdin when empty) and print one line per event.
pub fn run(parser: &mut MouseEventParser, seqs: &[String], out: &mut impl Write) -> Result<()> {
    let mut input = Vec::new();
    if seqs.is_empty() {
        io::stdin().lock().read_to_end(&mut input)?;
    } else {
        for seq in seqs {
            input.extend(unescape(seq)?);
        }
    }

    for event in scan(parser, &input) {
        writeln!(out, "{}", describe(&event))?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
