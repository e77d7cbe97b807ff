// SPDX-License-Identifier: MIT
//
// End-to-end frame pipeline: paint → diff → bytes → a minimal terminal
// emulator. The emulator understands exactly the sequences the renderer
// emits, so "the emulated screen equals the painted frame" checks that
// the diff output is complete and correctly positioned.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use weft_term::diff::{self, DiffRenderer, FrameSwap};
use weft_term::{
    Attr, Bounds, Cell, CellPool, CellStyle, PaintContext, PlainStyles, RenderConfig, Rgb,
    ScreenBuffer,
};

// ─── Emulator ────────────────────────────────────────────────────────────────

struct Term {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cx: u16,
    cy: u16,
    style: CellStyle,
}

impl Term {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
            cx: 0,
            cy: 0,
            style: CellStyle::PLAIN,
        }
    }

    fn feed(&mut self, bytes: &[u8]) {
        let text = std::str::from_utf8(bytes).expect("renderer output is UTF-8");
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '\x1b' {
                self.put(c);
                continue;
            }
            assert_eq!(chars.next(), Some('['), "only CSI sequences expected");
            let mut params = String::new();
            let fin = loop {
                let c = chars.next().expect("unterminated CSI");
                if c.is_ascii_alphabetic() {
                    break c;
                }
                params.push(c);
            };
            match fin {
                'J' => self.cells.fill(Cell::BLANK),
                'H' => self.cursor(&params),
                'm' => self.sgr(&params),
                'h' | 'l' => assert!(params == "?2026", "unexpected mode {params}"),
                other => panic!("unexpected CSI final {other:?}"),
            }
        }
    }

    fn put(&mut self, ch: char) {
        if self.cx < self.width && self.cy < self.height {
            let idx = usize::from(self.cy) * usize::from(self.width) + usize::from(self.cx);
            self.cells[idx] = Cell::styled(ch, self.style);
        }
        self.cx += 1;
    }

    fn cursor(&mut self, params: &str) {
        if params.is_empty() {
            (self.cx, self.cy) = (0, 0);
            return;
        }
        let (row, col) = params.split_once(';').expect("row;col");
        self.cy = row.parse::<u16>().unwrap() - 1;
        self.cx = col.parse::<u16>().unwrap() - 1;
    }

    fn sgr(&mut self, params: &str) {
        let nums: Vec<u16> = params.split(';').map(|n| n.parse().unwrap()).collect();
        let rgb = |i: usize| {
            Rgb(
                u8::try_from(nums[i]).unwrap(),
                u8::try_from(nums[i + 1]).unwrap(),
                u8::try_from(nums[i + 2]).unwrap(),
            )
        };
        let mut i = 0;
        while i < nums.len() {
            match nums[i] {
                0 => self.style = CellStyle::PLAIN,
                1 => self.style.attrs |= Attr::BOLD,
                2 => self.style.attrs |= Attr::DIM,
                3 => self.style.attrs |= Attr::ITALIC,
                4 => self.style.attrs |= Attr::UNDERLINE,
                7 => self.style.attrs |= Attr::REVERSE,
                38 => {
                    assert_eq!(nums[i + 1], 2);
                    self.style.fg = Some(rgb(i + 2));
                    i += 4;
                }
                48 => {
                    assert_eq!(nums[i + 1], 2);
                    self.style.bg = Some(rgb(i + 2));
                    i += 4;
                }
                other => panic!("unexpected SGR parameter {other}"),
            }
            i += 1;
        }
    }

    fn shows(&self, buf: &ScreenBuffer) -> bool {
        self.width == buf.width()
            && self.height == buf.height()
            && buf.iter().map(|(_, _, c)| c).eq(self.cells.iter().copied())
    }
}

fn row_text(term: &Term, y: u16) -> String {
    let w = usize::from(term.width);
    let start = usize::from(y) * w;
    term.cells[start..start + w].iter().map(|c| c.ch).collect()
}

// ─── Painting ────────────────────────────────────────────────────────────────

const ACCENT: CellStyle = CellStyle {
    fg: Some(Rgb(120, 200, 255)),
    bg: None,
    attrs: Attr::BOLD,
};

fn paint_panel(buf: &mut ScreenBuffer, pool: &mut CellPool, title: &str, body: &str) {
    let bounds = buf.bounds();
    let mut ctx = PaintContext::new(buf, &PlainStyles, pool, bounds);
    ctx.draw_border(0, 0, bounds.width, bounds.height, None);
    ctx.write_text(2, 0, title, Some(&ACCENT), true);
    let mut inner = ctx.sub_context(1, 1, bounds.width - 2, bounds.height - 2);
    inner.write_text_wrapped(0, 0, body, None, bounds.width - 2);
}

// ─── Frame Sequences ─────────────────────────────────────────────────────────

#[test]
fn frames_replay_onto_terminal() {
    let mut frames = FrameSwap::new(20, 6);
    let mut pool = CellPool::new();
    let mut term = Term::new(20, 6);

    for (title, body) in [
        ("one", "the quick brown fox jumps over the lazy dog"),
        ("two", "the quick brown fox jumps over the lazy dog"),
        ("two", "a different paragraph entirely"),
        ("three", ""),
    ] {
        paint_panel(frames.current_mut(), &mut pool, title, body);
        let expected = frames.current().clone();
        let mut out = Vec::new();
        frames.present(&mut out).unwrap();
        term.feed(&out);
        assert!(term.shows(&expected), "frame {title:?} / {body:?}");
    }

    assert_eq!(row_text(&term, 0), format!("┌─three{}┐", "─".repeat(12)));
    assert_eq!(row_text(&term, 5), format!("└{}┘", "─".repeat(18)));
}

#[test]
fn title_change_touches_only_title_cells() {
    let mut frames = FrameSwap::new(20, 4);
    let mut pool = CellPool::new();

    paint_panel(frames.current_mut(), &mut pool, "aaa", "body");
    frames.present(&mut Vec::new()).unwrap();

    paint_panel(frames.current_mut(), &mut pool, "aXa", "body");
    let stats = frames.present(&mut Vec::new()).unwrap();
    assert_eq!(stats.cells_rendered, 1);
    assert_eq!(stats.runs, 1);
}

#[test]
fn resize_redraws_at_new_size() {
    let mut frames = FrameSwap::new(10, 3);
    let mut pool = CellPool::new();
    paint_panel(frames.current_mut(), &mut pool, "x", "hi");
    frames.present(&mut Vec::new()).unwrap();

    frames.resize(14, 5);
    paint_panel(frames.current_mut(), &mut pool, "x", "hi there");
    let expected = frames.current().clone();
    let mut out = Vec::new();
    let stats = frames.present(&mut out).unwrap();

    assert!(stats.full_redraw);
    assert!(out.starts_with(b"\x1b[2J\x1b[H"));
    let mut term = Term::new(14, 5);
    term.feed(&out);
    assert!(term.shows(&expected));
}

#[test]
fn synchronized_frames_replay_too() {
    let config = RenderConfig::default().with_synchronized_output(true);
    let mut frames = FrameSwap::with_config(12, 4, config);
    let mut pool = CellPool::new();
    let mut term = Term::new(12, 4);

    for body in ["first", "second line", "second line"] {
        paint_panel(frames.current_mut(), &mut pool, "s", body);
        let expected = frames.current().clone();
        let mut out = Vec::new();
        frames.present(&mut out).unwrap();
        term.feed(&out);
        assert!(term.shows(&expected));
    }
}

#[test]
fn renderer_reuse_across_frames() {
    let mut renderer = DiffRenderer::new();
    let mut pool = CellPool::new();
    let mut a = ScreenBuffer::new(16, 4);
    paint_panel(&mut a, &mut pool, "a", "alpha");
    let mut b = ScreenBuffer::new(16, 4);
    paint_panel(&mut b, &mut pool, "b", "beta");

    let mut term = Term::new(16, 4);
    renderer.render(None, &a);
    let mut out = Vec::new();
    renderer.flush_to(&mut out).unwrap();
    term.feed(&out);
    assert!(term.shows(&a));

    renderer.render(Some(&a), &b);
    out.clear();
    renderer.flush_to(&mut out).unwrap();
    term.feed(&out);
    assert!(term.shows(&b));

    renderer.render(Some(&b), &b);
    assert!(renderer.output_bytes().is_empty());
}

// ─── Properties ──────────────────────────────────────────────────────────────

fn arb_color() -> impl Strategy<Value = Option<Rgb>> {
    prop::option::of(prop::sample::select(vec![Rgb(255, 0, 0), Rgb(0, 0, 0)]))
}

fn arb_cell() -> impl Strategy<Value = Cell> {
    let ch = prop::sample::select(vec![' ', 'a', 'b', '─', 'é']);
    let attrs = (0u8..32).prop_map(Attr::from_bits_truncate);
    (ch, arb_color(), arb_color(), attrs).prop_map(|(ch, fg, bg, attrs)| {
        Cell::styled(ch, CellStyle { fg, bg, attrs })
    })
}

fn arb_buffer(width: u16, height: u16) -> impl Strategy<Value = ScreenBuffer> {
    let n = usize::from(width) * usize::from(height);
    prop::collection::vec(arb_cell(), n).prop_map(move |cells| {
        let mut buf = ScreenBuffer::new(width, height);
        for (i, cell) in cells.into_iter().enumerate() {
            let i = u16::try_from(i).unwrap();
            buf.set_cell(i % width, i / width, cell);
        }
        buf
    })
}

fn arb_pair() -> impl Strategy<Value = (ScreenBuffer, ScreenBuffer)> {
    (1u16..8, 1u16..6).prop_flat_map(|(w, h)| (arb_buffer(w, h), arb_buffer(w, h)))
}

proptest! {
    #[test]
    fn diff_reproduces_target((prev, curr) in arb_pair()) {
        let mut term = Term::new(prev.width(), prev.height());
        term.feed(&diff::render(None, &prev));
        prop_assert!(term.shows(&prev));

        term.feed(&diff::render(Some(&prev), &curr));
        prop_assert!(term.shows(&curr));
    }

    #[test]
    fn diff_of_identical_frames_is_empty((prev, _) in arb_pair()) {
        prop_assert!(diff::render(Some(&prev), &prev.clone()).is_empty());
    }

    #[test]
    fn full_render_always_clears(
        (prev, _) in arb_pair(),
        (curr, _) in arb_pair(),
    ) {
        prop_assume!(!prev.same_size(&curr));
        prop_assert!(diff::render(Some(&prev), &curr).starts_with(b"\x1b[2J"));
    }
}

#[test]
fn painting_outside_bounds_is_harmless() {
    let mut buf = ScreenBuffer::new(4, 2);
    let mut pool = CellPool::new();
    let mut ctx = PaintContext::new(&mut buf, &PlainStyles, &mut pool, Bounds::new(2, 1, 10, 10));
    ctx.write_text(0, 0, "overflowing", None, false);
    ctx.fill_rect(0, 0, 50, 50, '#', None);
    ctx.draw_border(0, 0, 50, 50, None);
    assert_eq!(buf.get_cell(3, 1).map(|c| c.ch), Some('#'));
    assert_eq!(buf.get_cell(0, 0), Some(Cell::BLANK));
}
