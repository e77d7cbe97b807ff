// SPDX-License-Identifier: MIT
//
// Cell: the atomic unit of terminal rendering.
//
// Every character position on screen is a Cell. It holds one character,
// optional 24-bit foreground and background colors, and a small set of
// text attributes. The whole pipeline exists to produce, compare, and
// output these.
//
// Equality is plain structural comparison over every field. The diff
// renderer and the buffer's dirty tracking both rely on it, so there is
// no notion of "visually equivalent" cells: a bold space and a plain space
// are different cells even though most terminals draw them identically.

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A 24-bit `TrueColor` value.
///
/// Cells carry `Option<Rgb>`: `None` means "terminal default", and emits
/// no color code at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);

    /// Create a color from its red, green and blue channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// Each flag maps to one SGR parameter. Combine with bitwise OR:
    ///
    /// ```
    /// use weft_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1: increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2: decreased intensity (faint).
        const DIM       = 1 << 1;
        /// SGR 3: italic.
        const ITALIC    = 1 << 2;
        /// SGR 4: straight underline.
        const UNDERLINE = 1 << 3;
        /// SGR 7: swap foreground and background.
        const REVERSE   = 1 << 4;
    }
}

// ─── CellStyle ───────────────────────────────────────────────────────────────

/// The styling half of a [`Cell`]: colors and attributes, no character.
///
/// This is what style resolution produces and what the diff renderer groups
/// runs by. Two cells with equal `CellStyle` can share one SGR emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub attrs: Attr,
}

impl CellStyle {
    /// Terminal defaults: no colors, no attributes.
    pub const PLAIN: Self = Self {
        fg: None,
        bg: None,
        attrs: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: Rgb) -> Self {
        Self {
            fg: Some(fg),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Rgb) -> Self {
        Self {
            bg: Some(bg),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Whether this style emits nothing beyond a reset.
    #[inline]
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_empty()
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
///
/// Every character position on the screen is one `Cell`. The rendering
/// pipeline's job is to produce a grid of these, diff it against the
/// previous frame, and emit escape sequences for the changes.
///
/// `Cell` is `Copy`: 16 bytes, cheap to pass around by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Character to display. A space is a blank cell.
    pub ch: char,

    /// Foreground (text) color. `None` = terminal default.
    pub fg: Option<Rgb>,

    /// Background color. `None` = terminal default.
    pub bg: Option<Rgb>,

    /// Text attributes (bold, italic, underline, reverse, dim).
    pub attrs: Attr,
}

impl Cell {
    /// A blank cell: space character, default colors, no attributes.
    pub const BLANK: Self = Self {
        ch: ' ',
        fg: None,
        bg: None,
        attrs: Attr::empty(),
    };

    /// Create a cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self { ch, ..Self::BLANK }
    }

    /// Create a cell from a character and a resolved style.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, style: CellStyle) -> Self {
        Self {
            ch,
            fg: style.fg,
            bg: style.bg,
            attrs: style.attrs,
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// Whether this cell is indistinguishable from [`Cell::BLANK`].
    #[inline]
    #[must_use]
    pub fn is_blank(self) -> bool {
        self == Self::BLANK
    }

    /// The styling of this cell, without its character.
    #[inline]
    #[must_use]
    pub const fn style(self) -> CellStyle {
        CellStyle {
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }

    /// Whether two cells share colors and attributes, ignoring characters.
    #[inline]
    #[must_use]
    pub fn same_style(self, other: &Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.attrs == other.attrs
    }

    // ─── Builders ─────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: Rgb) -> Self {
        Self {
            fg: Some(fg),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: Rgb) -> Self {
        Self {
            bg: Some(bg),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Reset this cell to blank.
    #[inline]
    pub const fn reset(&mut self) {
        *self = Self::BLANK;
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({:?}", self.ch)?;
        if let Some(Rgb(r, g, b)) = self.fg {
            write!(f, ", fg=#{r:02x}{g:02x}{b:02x}")?;
        }
        if let Some(Rgb(r, g, b)) = self.bg {
            write!(f, ", bg=#{r:02x}{g:02x}{b:02x}")?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
