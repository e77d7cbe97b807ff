// SPDX-License-Identifier: MIT
//
// PaintContext: the drawing API widgets use.
//
// A PaintContext is a window onto one ScreenBuffer: a rectangle (`bounds`)
// plus the collaborators needed to turn a widget's style into cells. Every
// coordinate a widget passes in is relative to that rectangle; the context
// translates to buffer coordinates before writing.
//
// Nesting: `sub_context` hands a child widget its own rectangle, carved out
// of the parent's coordinate space, by reborrowing the same buffer. The
// parent is unusable while the child context is alive, which is exactly
// the single-writer rule painting needs.
//
// Styles are opaque here. The context asks its `StyleResolver` to turn a
// widget's style value into a `CellStyle`, then asks the `CellPool` for the
// finished cell. What a style *means* (themes, inheritance, classes) is the
// resolver's business.

use crate::buffer::{Bounds, ScreenBuffer};
use crate::cell::{Cell, CellStyle};
use crate::pool::CellPool;

// ─── Style Resolution ────────────────────────────────────────────────────────

/// Turns a widget-level style value into concrete cell styling.
pub trait StyleResolver {
    /// The style value widgets hand to paint calls.
    type Style;

    /// Resolve `style`, or the default style when `None`.
    fn resolve(&self, style: Option<&Self::Style>) -> CellStyle;
}

/// The identity resolver: widgets pass `CellStyle` directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyles;

impl StyleResolver for PlainStyles {
    type Style = CellStyle;

    fn resolve(&self, style: Option<&CellStyle>) -> CellStyle {
        style.copied().unwrap_or_default()
    }
}

// ─── Border Characters ───────────────────────────────────────────────────────

/// Glyphs for [`PaintContext::draw_border_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderChars {
    /// `┌─┐│└┘`, the default.
    pub const SINGLE: Self = Self {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    };

    /// `╭─╮│╰╯`
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        ..Self::SINGLE
    };

    /// `╔═╗║╚╝`
    pub const DOUBLE: Self = Self {
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
    };

    /// `┏━┓┃┗┛`
    pub const HEAVY: Self = Self {
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        horizontal: '━',
        vertical: '┃',
    };

    /// `+-+|++` for terminals without box-drawing glyphs.
    pub const ASCII: Self = Self {
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
    };
}

impl Default for BorderChars {
    fn default() -> Self {
        Self::SINGLE
    }
}

// ─── PaintContext ────────────────────────────────────────────────────────────

/// Drawing façade over one region of a [`ScreenBuffer`].
///
/// ```
/// use weft_term::buffer::{Bounds, ScreenBuffer};
/// use weft_term::cell::{Cell, CellStyle};
/// use weft_term::paint::{PaintContext, PlainStyles};
/// use weft_term::pool::CellPool;
///
/// let mut buf = ScreenBuffer::new(20, 5);
/// let mut pool = CellPool::new();
/// let mut ctx = PaintContext::new(&mut buf, &PlainStyles, &mut pool, Bounds::new(4, 1, 10, 3));
///
/// ctx.write_text(0, 0, "hi", None, true);
/// assert_eq!(buf.get_cell(4, 1), Some(Cell::new('h')));
/// ```
pub struct PaintContext<'a, R: StyleResolver> {
    buffer: &'a mut ScreenBuffer,
    resolver: &'a R,
    pool: &'a mut CellPool,
    bounds: Bounds,
}

impl<'a, R: StyleResolver> PaintContext<'a, R> {
    pub const fn new(
        buffer: &'a mut ScreenBuffer,
        resolver: &'a R,
        pool: &'a mut CellPool,
        bounds: Bounds,
    ) -> Self {
        Self {
            buffer,
            resolver,
            pool,
            bounds,
        }
    }

    /// The region this context paints, in buffer coordinates.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.bounds.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.bounds.height
    }

    // ─── Cell Placement ──────────────────────────────────────────────────

    /// Write one cell at a relative position. Positions whose absolute
    /// coordinate would overflow `u16` are dropped, as are positions outside
    /// the buffer.
    fn put(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        let cell = self.pool.get(ch, style);
        self.place(x, y, cell);
    }

    fn place(&mut self, x: u16, y: u16, cell: Cell) {
        let (Some(ax), Some(ay)) = (self.bounds.x.checked_add(x), self.bounds.y.checked_add(y))
        else {
            return;
        };
        self.buffer.set_cell(ax, ay, cell);
    }

    /// Like [`put`](Self::put), but only inside this context's bounds.
    fn put_clipped(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if x < self.bounds.width && y < self.bounds.height {
            self.put(x, y, ch, style);
        }
    }

    // ─── Text ────────────────────────────────────────────────────────────

    /// Write `text` left to right from `(x, y)`, one character per cell.
    ///
    /// With `clip`, writing stops at the right edge of the bounds and the
    /// remaining characters are dropped. Text never wraps. Returns the
    /// number of cells written.
    pub fn write_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: Option<&R::Style>,
        clip: bool,
    ) -> u16 {
        let resolved = self.resolver.resolve(style);
        let mut col = x;
        let mut written = 0;

        for ch in text.chars() {
            if clip && col >= self.bounds.width {
                break;
            }
            self.put(col, y, ch, resolved);
            written += 1;
            let Some(next) = col.checked_add(1) else {
                break;
            };
            col = next;
        }

        written
    }

    /// Write `text` word-wrapped to `max_width` columns, starting at
    /// `(x, y)` and moving down one row per line.
    ///
    /// Existing line breaks are honored first; each resulting line is then
    /// wrapped at spaces, and words longer than `max_width` are broken
    /// mid-word. Writing stops when the next row would fall below the
    /// bounds. Returns the number of lines actually written, which may be
    /// fewer than the wrapped text has.
    pub fn write_text_wrapped(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: Option<&R::Style>,
        max_width: u16,
    ) -> usize {
        let mut row = y;
        let mut written = 0;

        for line in wrap_text(text, usize::from(max_width)) {
            if row >= self.bounds.height {
                break;
            }
            self.write_text(x, row, &line, style, true);
            written += 1;
            row += 1;
        }

        written
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Fill a rectangle with `ch`, clipped to the bounds.
    pub fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        ch: char,
        style: Option<&R::Style>,
    ) {
        let local = Bounds::new(0, 0, self.bounds.width, self.bounds.height);
        let Some(area) = Bounds::new(x, y, width, height).intersect(local) else {
            return;
        };
        let resolved = self.resolver.resolve(style);
        for row in area.y..area.bottom() {
            for col in area.x..area.right() {
                self.put(col, row, ch, resolved);
            }
        }
    }

    /// Draw a box outline with the default single-line glyphs.
    pub fn draw_border(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        style: Option<&R::Style>,
    ) {
        self.draw_border_with(x, y, width, height, style, &BorderChars::SINGLE);
    }

    /// Draw a box outline with the given glyphs, clipped to the bounds.
    ///
    /// Degenerate boxes draw only what fits: corners need both dimensions
    /// of at least 2, horizontal edges need a width above 2, vertical edges
    /// need a height above 2.
    pub fn draw_border_with(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        style: Option<&R::Style>,
        chars: &BorderChars,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        let resolved = self.resolver.resolve(style);
        let right = x.saturating_add(width - 1);
        let bottom = y.saturating_add(height - 1);

        if width >= 2 && height >= 2 {
            self.put_clipped(x, y, chars.top_left, resolved);
            self.put_clipped(right, y, chars.top_right, resolved);
            self.put_clipped(x, bottom, chars.bottom_left, resolved);
            self.put_clipped(right, bottom, chars.bottom_right, resolved);
        }

        if width > 2 {
            for col in x.saturating_add(1)..right {
                self.put_clipped(col, y, chars.horizontal, resolved);
                self.put_clipped(col, bottom, chars.horizontal, resolved);
            }
        }

        if height > 2 {
            for row in y.saturating_add(1)..bottom {
                self.put_clipped(x, row, chars.vertical, resolved);
                self.put_clipped(right, row, chars.vertical, resolved);
            }
        }
    }

    /// Fill the whole bounds with spaces.
    pub fn clear(&mut self, style: Option<&R::Style>) {
        let blank = self.pool.blank(self.resolver.resolve(style));
        for row in 0..self.bounds.height {
            for col in 0..self.bounds.width {
                self.place(col, row, blank);
            }
        }
    }

    // ─── Nesting ─────────────────────────────────────────────────────────

    /// A context for a child region at `(x, y)` relative to this one.
    ///
    /// The child shares this context's buffer, pool and resolver. Its
    /// bounds are not clipped to the parent's; a child placed partly
    /// outside its parent can paint there.
    pub fn sub_context(&mut self, x: u16, y: u16, width: u16, height: u16) -> PaintContext<'_, R> {
        PaintContext {
            buffer: self.buffer,
            resolver: self.resolver,
            pool: self.pool,
            bounds: self.bounds.offset(x, y, width, height),
        }
    }
}

// ─── Word Wrapping ───────────────────────────────────────────────────────────

/// Split `text` into lines of at most `max_width` characters.
///
/// Line breaks in `text` always start a new line (an empty input line stays
/// an empty output line). Within a line, words are separated by whitespace
/// and packed greedily with single spaces between them. A word longer than
/// `max_width` is cut into `max_width`-sized pieces; the last piece can
/// share its line with following words. A `max_width` of 0 yields nothing.
///
/// ```
/// use weft_term::paint::wrap_text;
///
/// assert_eq!(wrap_text("the quick brown fox", 10), vec!["the quick", "brown fox"]);
/// assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
/// ```
#[must_use]
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if max_width == 0 {
        return lines;
    }

    for raw in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in raw.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();

            if chars.len() > max_width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = chars.chunks(max_width).peekable();
                while let Some(piece) = pieces.next() {
                    if pieces.peek().is_some() {
                        lines.push(piece.iter().collect());
                    } else {
                        current = piece.iter().collect();
                        current_len = piece.len();
                    }
                }
                continue;
            }

            if current_len == 0 {
                current.push_str(word);
                current_len = chars.len();
            } else if current_len + 1 + chars.len() <= max_width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + chars.len();
            } else {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
                current_len = chars.len();
            }
        }

        lines.push(current);
    }

    lines
}

// ─── Tests ───────────────────────────────────────────────────────────────────
