// SPDX-License-Identifier: MIT
//
// Mouse input parser.
//
// Turns raw terminal mouse reports into semantic pointer events. Two wire
// formats are understood:
//
// - SGR (DEC 1006): `ESC [ < Cb ; Cx ; Cy M` for press and motion, the same
//   with a trailing `m` for release. Decimal fields, 1-based coordinates.
// - Legacy X10/normal: `ESC [ M b x y`, three raw bytes offset by 32 (the
//   coordinates by 33, to fold in the 1-based origin). No release button.
//
// On top of the raw press/release stream the parser synthesizes gestures.
// A release that lands near its press becomes a Click; a click that
// follows another click of the same button, nearby and soon enough,
// becomes a DoubleClick. The parser remembers at most one pending press
// and one previous click, so its state never grows.
//
// Every parse method has an `_at` twin taking the event time explicitly.
// The plain versions read `Instant::now()`.
//
// Number parsing works directly on `&[u8]`, no intermediate strings.

use std::time::Instant;

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::config::ParserConfig;

// ─── Event Types ────────────────────────────────────────────────────────────

bitflags! {
    /// Modifier keys held during a mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// No button: plain motion, or a legacy release with no pending press.
    None,
    ScrollUp,
    ScrollDown,
}

/// Wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    /// A press and release close together.
    Click(MouseButton),
    /// A second click soon after and near the first.
    DoubleClick(MouseButton),
    /// Motion with a button held.
    Drag(MouseButton),
    /// Motion with no button held.
    Move,
    Scroll(ScrollDirection),
}

impl MouseEventKind {
    /// The button involved. Scrolls map to the wheel pseudo-buttons and
    /// plain motion to [`MouseButton::None`].
    #[must_use]
    pub const fn button(self) -> MouseButton {
        match self {
            Self::Press(b)
            | Self::Release(b)
            | Self::Click(b)
            | Self::DoubleClick(b)
            | Self::Drag(b) => b,
            Self::Move => MouseButton::None,
            Self::Scroll(ScrollDirection::Up) => MouseButton::ScrollUp,
            Self::Scroll(ScrollDirection::Down) => MouseButton::ScrollDown,
        }
    }
}

/// A decoded mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// 0-indexed column.
    pub x: u16,
    /// 0-indexed row.
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    #[inline]
    #[must_use]
    pub const fn button(&self) -> MouseButton {
        self.kind.button()
    }

    /// 1 for a click, 2 for a double-click, 0 for everything else.
    #[inline]
    #[must_use]
    pub const fn click_count(&self) -> u8 {
        match self.kind {
            MouseEventKind::Click(_) => 1,
            MouseEventKind::DoubleClick(_) => 2,
            _ => 0,
        }
    }
}

// ─── Wire Decoding ──────────────────────────────────────────────────────────

/// `ESC [ <`
const SGR_PREFIX: &[u8] = b"\x1b[<";
/// `ESC [ M`
const NORMAL_PREFIX: &[u8] = b"\x1b[M";
/// Prefix plus the three payload bytes.
const NORMAL_LEN: usize = 6;

const BIT_SHIFT: u16 = 4;
const BIT_ALT: u16 = 8;
const BIT_CTRL: u16 = 16;
const BIT_MOTION: u16 = 32;
const BIT_WHEEL: u16 = 64;

const fn decode_modifiers(cb: u16) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if cb & BIT_SHIFT != 0 {
        modifiers = modifiers.union(Modifiers::SHIFT);
    }
    if cb & BIT_ALT != 0 {
        modifiers = modifiers.union(Modifiers::ALT);
    }
    if cb & BIT_CTRL != 0 {
        modifiers = modifiers.union(Modifiers::CTRL);
    }
    modifiers
}

const fn decode_button(base: u16) -> MouseButton {
    match base {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::None,
    }
}

/// Classify a button byte. `release` is the SGR `m` terminator; legacy
/// reports never set it and signal release with button bits 3 instead.
const fn decode_kind(cb: u16, release: bool, legacy: bool) -> MouseEventKind {
    let base = cb & 3;
    if cb & BIT_WHEEL != 0 {
        if base & 1 == 0 {
            MouseEventKind::Scroll(ScrollDirection::Up)
        } else {
            MouseEventKind::Scroll(ScrollDirection::Down)
        }
    } else if cb & BIT_MOTION != 0 {
        match decode_button(base) {
            MouseButton::None => MouseEventKind::Move,
            button => MouseEventKind::Drag(button),
        }
    } else if release || (legacy && base == 3) {
        MouseEventKind::Release(decode_button(base))
    } else {
        MouseEventKind::Press(decode_button(base))
    }
}

/// Parse a u16 from the start of a byte slice, saturating on overflow.
/// Returns `(value, remaining_bytes)`.
fn parse_u16_from(buf: &[u8]) -> (u16, &[u8]) {
    let mut val: u16 = 0;
    let mut pos = 0;
    while pos < buf.len() && buf[pos].is_ascii_digit() {
        val = val
            .saturating_mul(10)
            .saturating_add(u16::from(buf[pos] - b'0'));
        pos += 1;
    }
    (val, &buf[pos..])
}

/// Skip a leading byte if it matches `expected`.
fn skip_byte(buf: &[u8], expected: u8) -> &[u8] {
    if buf.first() == Some(&expected) {
        &buf[1..]
    } else {
        buf
    }
}

// ─── Gesture Memory ─────────────────────────────────────────────────────────

/// A remembered press or click.
#[derive(Debug, Clone, Copy)]
struct Mark {
    button: MouseButton,
    x: u16,
    y: u16,
    at: Instant,
}

impl Mark {
    const fn near(&self, x: u16, y: u16, distance: u16) -> bool {
        self.x.abs_diff(x) <= distance && self.y.abs_diff(y) <= distance
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Stateful mouse-report decoder with click and double-click synthesis.
///
/// ```
/// use weft_term::mouse::{MouseButton, MouseEventKind, MouseEventParser};
///
/// let mut parser = MouseEventParser::new();
/// let press = parser.parse(b"\x1b[<0;10;5M").unwrap();
/// assert_eq!(press.kind, MouseEventKind::Press(MouseButton::Left));
/// assert_eq!((press.x, press.y), (9, 4));
///
/// let release = parser.parse(b"\x1b[<0;10;5m").unwrap();
/// assert_eq!(release.kind, MouseEventKind::Click(MouseButton::Left));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MouseEventParser {
    config: ParserConfig,
    pending_press: Option<Mark>,
    last_click: Option<Mark>,
}

impl MouseEventParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            pending_press: None,
            last_click: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> ParserConfig {
        self.config
    }

    /// Forget any pending press and the last click.
    pub fn reset(&mut self) {
        self.pending_press = None;
        self.last_click = None;
    }

    // ── Sequence Matching ───────────────────────────────────────────────

    /// Length of the SGR mouse report at the start of `buf`, if there is a
    /// complete one. Bytes after it are ignored.
    ///
    /// Only the grammar is checked: a report with a zero coordinate still
    /// matches here even though [`parse_sgr`](Self::parse_sgr) rejects it.
    #[must_use]
    pub fn get_sgr_match_length(buf: &[u8]) -> Option<usize> {
        let rest = buf.strip_prefix(SGR_PREFIX)?;
        let mut pos = 0;

        for field in 0..3 {
            let digits = rest[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            pos += digits;

            let sep = *rest.get(pos)?;
            let ok = if field < 2 {
                sep == b';'
            } else {
                sep == b'M' || sep == b'm'
            };
            if !ok {
                return None;
            }
            pos += 1;
        }

        Some(SGR_PREFIX.len() + pos)
    }

    // ── Parsing ─────────────────────────────────────────────────────────

    /// Decode an SGR report at the start of `buf`.
    pub fn parse_sgr(&mut self, buf: &[u8]) -> Option<MouseEvent> {
        self.parse_sgr_at(buf, Instant::now())
    }

    /// [`parse_sgr`](Self::parse_sgr) with an explicit event time.
    pub fn parse_sgr_at(&mut self, buf: &[u8], now: Instant) -> Option<MouseEvent> {
        let Some(len) = Self::get_sgr_match_length(buf) else {
            trace!(len = buf.len(), "not an SGR mouse report");
            return None;
        };

        // Grammar already checked: digits ; digits ; digits (M|m).
        let params = &buf[SGR_PREFIX.len()..len - 1];
        let (cb, rest) = parse_u16_from(params);
        let rest = skip_byte(rest, b';');
        let (cx, rest) = parse_u16_from(rest);
        let rest = skip_byte(rest, b';');
        let (cy, _) = parse_u16_from(rest);

        if cx == 0 || cy == 0 {
            trace!(cx, cy, "SGR mouse report with zero coordinate");
            return None;
        }

        let release = buf[len - 1] == b'm';
        let raw = MouseEvent {
            kind: decode_kind(cb, release, false),
            x: cx - 1,
            y: cy - 1,
            modifiers: decode_modifiers(cb),
        };
        Some(self.synthesize(raw, now, false))
    }

    /// Decode a legacy `ESC [ M b x y` report at the start of `buf`.
    pub fn parse_normal(&mut self, buf: &[u8]) -> Option<MouseEvent> {
        self.parse_normal_at(buf, Instant::now())
    }

    /// [`parse_normal`](Self::parse_normal) with an explicit event time.
    pub fn parse_normal_at(&mut self, buf: &[u8], now: Instant) -> Option<MouseEvent> {
        let payload = buf.strip_prefix(NORMAL_PREFIX)?;
        let &[b, x, y, ..] = payload else {
            trace!(len = buf.len(), "truncated legacy mouse report");
            return None;
        };
        if b < 32 || x < 33 || y < 33 {
            trace!(b, x, y, "legacy mouse report below offset");
            return None;
        }

        let cb = u16::from(b - 32);
        let raw = MouseEvent {
            kind: decode_kind(cb, false, true),
            x: u16::from(x - 33),
            y: u16::from(y - 33),
            modifiers: decode_modifiers(cb),
        };
        Some(self.synthesize(raw, now, true))
    }

    /// Decode whichever report format `buf` starts with.
    pub fn parse(&mut self, buf: &[u8]) -> Option<MouseEvent> {
        self.parse_at(buf, Instant::now())
    }

    /// [`parse`](Self::parse) with an explicit event time.
    pub fn parse_at(&mut self, buf: &[u8], now: Instant) -> Option<MouseEvent> {
        self.next_event_at(buf, now).map(|(event, _)| event)
    }

    /// Decode the report at the start of `buf` and say how many bytes it
    /// used. `None` when `buf` does not start with a valid report; callers
    /// scanning a stream skip a byte and try again.
    pub fn next_event(&mut self, buf: &[u8]) -> Option<(MouseEvent, usize)> {
        self.next_event_at(buf, Instant::now())
    }

    /// [`next_event`](Self::next_event) with an explicit event time.
    pub fn next_event_at(&mut self, buf: &[u8], now: Instant) -> Option<(MouseEvent, usize)> {
        if buf.starts_with(SGR_PREFIX) {
            let len = Self::get_sgr_match_length(buf)?;
            self.parse_sgr_at(buf, now).map(|event| (event, len))
        } else if buf.starts_with(NORMAL_PREFIX) {
            self.parse_normal_at(buf, now).map(|event| (event, NORMAL_LEN))
        } else {
            None
        }
    }

    // ── Gesture Synthesis ───────────────────────────────────────────────

    /// `legacy` marks a report that cannot name the released button.
    fn synthesize(&mut self, event: MouseEvent, now: Instant, legacy: bool) -> MouseEvent {
        let kind = match event.kind {
            MouseEventKind::Press(button) => {
                self.pending_press = Some(Mark {
                    button,
                    x: event.x,
                    y: event.y,
                    at: now,
                });
                event.kind
            }
            MouseEventKind::Release(button) => {
                self.on_release(button, event.x, event.y, now, legacy)
            }
            other => other,
        };
        MouseEvent { kind, ..event }
    }

    fn on_release(
        &mut self,
        button: MouseButton,
        x: u16,
        y: u16,
        now: Instant,
        legacy: bool,
    ) -> MouseEventKind {
        let Some(press) = self.pending_press else {
            return MouseEventKind::Release(button);
        };
        // A legacy release does not say which button; it ends whatever
        // press is pending. SGR releases always name theirs.
        let any_button = legacy && button == MouseButton::None;
        if !any_button && button != press.button {
            return MouseEventKind::Release(button);
        }

        self.pending_press = None;
        let button = press.button;
        if !press.near(x, y, self.config.double_click_distance) {
            debug!(?button, x, y, "release too far from press, no click");
            return MouseEventKind::Release(button);
        }

        self.on_click(button, x, y, now)
    }

    fn on_click(&mut self, button: MouseButton, x: u16, y: u16, now: Instant) -> MouseEventKind {
        let is_double = self.last_click.is_some_and(|last| {
            last.button == button
                && last.near(x, y, self.config.double_click_distance)
                && now.saturating_duration_since(last.at) <= self.config.double_click_threshold
        });

        if is_double {
            self.last_click = None;
            debug!(?button, x, y, "double click");
            MouseEventKind::DoubleClick(button)
        } else {
            self.last_click = Some(Mark {
                button,
                x,
                y,
                at: now,
            });
            debug!(?button, x, y, "click");
            MouseEventKind::Click(button)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
